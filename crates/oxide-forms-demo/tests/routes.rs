//! End-to-end tests driving the demo router.

use std::sync::Arc;

use oxide_forms_demo::{build_router, AppState};
use oxide_router::{Request, Response, Router};

fn app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new("en"));
    let router = build_router(Arc::clone(&state));
    (state, router)
}

fn body(res: &Response) -> String {
    res.body_string().unwrap()
}

#[tokio::test]
async fn test_index_lists_demos_by_title() {
    let (_, router) = app();
    let res = router.handle(Request::get("/")).await;
    assert_eq!(res.status, 200);

    let html = body(&res);
    let checkbox = html.find("Checkbox Choice Widget").unwrap();
    let text = html.find("Text Input Widget").unwrap();
    assert!(checkbox < text);
    assert!(html.contains(r#"href="/sequence_of_sequences/""#));
}

#[tokio::test]
async fn test_get_renders_empty_form() {
    let (_, router) = app();
    let res = router.handle(Request::get("/textinput/")).await;
    assert_eq!(res.status, 200);

    let html = body(&res);
    assert!(html.contains("<form"));
    assert!(html.contains(r#"name="text""#));
    assert!(html.contains("<pre>None</pre>"));
    assert!(html.contains("pub fn textinput("));
}

#[tokio::test]
async fn test_valid_post_shows_captured() {
    let (_, router) = app();
    let req = Request::post("/textinput/").form(&[("text", "hello"), ("submit", "submit")]);
    let res = router.handle(req).await;
    assert_eq!(res.status, 200);

    let html = body(&res);
    assert!(html.contains("&quot;text&quot;: &quot;hello&quot;"));
    assert!(!html.contains("<pre>None</pre>"));
}

#[tokio::test]
async fn test_invalid_post_shows_errors() {
    let (_, router) = app();
    let long = "x".repeat(101);
    let req = Request::post("/textinput/").form(&[("text", long.as_str()), ("submit", "submit")]);
    let html = body(&router.handle(req).await);

    assert!(html.contains("There was a problem with your submission"));
    assert!(html.contains("Longer than maximum length 100"));
    assert!(html.contains("<pre>None</pre>"));
}

#[tokio::test]
async fn test_post_without_marker_renders() {
    let (_, router) = app();
    let req = Request::post("/textinput/").form(&[("text", "hello")]);
    let html = body(&router.handle(req).await);
    assert!(html.contains("<pre>None</pre>"));
    assert!(!html.contains("There was a problem"));
}

#[tokio::test]
async fn test_unknown_demo_is_not_found() {
    let (_, router) = app();
    assert_eq!(router.handle(Request::get("/nope/")).await.status, 404);
    assert_eq!(router.handle(Request::post("/nope/")).await.status, 404);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (_, router) = app();
    let req = Request::post("/textinput/")
        .header("Content-Type", "application/json")
        .body("{}");
    assert_eq!(router.handle(req).await.status, 400);
}

#[tokio::test]
async fn test_allcode_highlights_range() {
    let (_, router) = app();
    let req = Request::get("/allcode/")
        .query_param("start", "10")
        .query_param("end", "12");
    let res = router.handle(req).await;
    assert_eq!(res.status, 200);

    let html = body(&res);
    assert!(html.contains(r#"<a id="line-10"></a><span class="hll">"#));
    assert!(html.contains(r#"<a id="line-12"></a>"#));
    assert!(!html.contains(r#"<a id="line-12"></a><span class="hll">"#));
}

#[tokio::test]
async fn test_code_css_is_cached() {
    let (_, router) = app();
    let res = router.handle(Request::get("/code.css")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.headers.get("Cache-Control").map(String::as_str), Some("max-age=360"));
    assert!(body(&res).contains(".hll"));
}

#[tokio::test]
async fn test_i18n_locale_from_query() {
    let (_, router) = app();
    let req = Request::get("/i18n/").query_param("_LOCALE_", "fr");
    let html = body(&router.handle(req).await);
    assert!(html.contains("Un nombre entre 1 et 10"));
    assert!(html.contains("Soumettre"));
    assert!(html.contains(r#"href="?_LOCALE_=de""#));
}

#[tokio::test]
async fn test_i18n_locale_from_form_and_cookie() {
    let (_, router) = app();
    let req = Request::post("/i18n/").form(&[("number", "42"), ("_LOCALE_", "de"), ("submit", "submit")]);
    let html = body(&router.handle(req).await);
    assert!(html.contains("42 ist größer als der Höchstwert 10"));

    let req = Request::get("/i18n/").header("Cookie", "_LOCALE_=ru");
    let html = body(&router.handle(req).await);
    assert!(html.contains("Число от 1 до 10"));
}

#[tokio::test]
async fn test_readonly_demo_has_no_form() {
    let (_, router) = app();
    let html = body(&router.handle(Request::get("/readonly_sequence_of_mappings/")).await);
    assert!(!html.contains("<form"));
    assert!(html.contains(r#"class="oxide-form-readonly""#));
    assert!(!html.contains(r#"name="name""#));
}

#[tokio::test]
async fn test_file_upload_clears_store_on_success() {
    let (state, router) = app();
    let boundary = "XBOUNDARYX";
    let part = |name: &str, value: &str| {
        format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    };
    let mut payload = String::new();
    payload.push_str(&part("__start__", "upload:mapping"));
    payload.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"notes.txt\"\r\n\
         Content-Type: text/plain\r\n\r\nhello\r\n"
    ));
    payload.push_str(&part("uid", ""));
    payload.push_str(&part("__end__", "upload:mapping"));
    payload.push_str(&part("submit", "submit"));
    payload.push_str(&format!("--{boundary}--\r\n"));

    let req = Request::post("/file/")
        .header("Content-Type", format!("multipart/form-data; boundary={boundary}"))
        .body(payload);
    let res = router.handle(req).await;
    assert_eq!(res.status, 200);

    let html = body(&res);
    assert!(html.contains("&quot;filename&quot;: &quot;notes.txt&quot;"));
    assert!(html.contains("&quot;size&quot;: 5"));
    assert!(state.tmpstore.is_empty());
}
