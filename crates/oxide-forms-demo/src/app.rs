//! Routes of the demo application.

use std::sync::Arc;

use oxide_forms::{Control, Upload};
use oxide_router::{FormValue, LoggingMiddleware, Method, Request, Response, Router};
use tracing::{error, warn};

use crate::context::DemoContext;
use crate::demos::{self, Demo};
use crate::error::{DemoError, Result};
use crate::locale::Locales;
use crate::source::{self, CSS, CSS_CACHE_CONTROL};
use crate::templates::{self, LocaleLinks};
use crate::tmpstore::MemoryTmpStore;

/// Demos whose page carries locale switch links.
const TRANSLATED: &[&str] = &["i18n"];

/// State shared by every request.
#[derive(Debug)]
pub struct AppState {
    /// Message catalogs and the fallback locale.
    pub locales: Locales,
    /// Upload store shared by the file demos.
    pub tmpstore: Arc<MemoryTmpStore>,
}

impl AppState {
    /// Creates the state with an empty upload store.
    pub fn new(default_locale: &str) -> Self {
        Self {
            locales: Locales::new(default_locale),
            tmpstore: Arc::new(MemoryTmpStore::new()),
        }
    }
}

/// Builds the application router.
///
/// `/allcode/` is registered before `/{name}/` so the listing is not taken
/// for a demo.
pub fn build_router(state: Arc<AppState>) -> Router {
    let get_state = Arc::clone(&state);
    let post_state = state;

    Router::new()
        .middleware(LoggingMiddleware)
        .get("/", |_req| async { Response::html(templates::render_index(&demos::index())) })
        .get("/code.css", |_req| async {
            Response::css(CSS).header("Cache-Control", CSS_CACHE_CONTROL)
        })
        .get("/allcode/", |req| async move { Response::html(allcode(&req)) })
        .get("/{name}/", move |req| demo_page(Arc::clone(&get_state), req))
        .post("/{name}/", move |req| demo_page(Arc::clone(&post_state), req))
}

fn allcode(req: &Request) -> String {
    let bound = |key: &str| req.get_query(key).and_then(|v| v.parse::<usize>().ok());
    let highlight = bound("start").zip(bound("end"));
    templates::render_code(&source::render_listing(highlight))
}

async fn demo_page(state: Arc<AppState>, req: Request) -> Response {
    let name = req.params.get("name").unwrap_or_default().to_string();

    let controls = if req.method == Method::Post {
        match req.form_data().await {
            Ok(pairs) => pairs.into_iter().map(|(k, v)| (k, to_control(v))).collect(),
            Err(e) => return respond(&name, Err(e.into())),
        }
    } else {
        Vec::new()
    };

    respond(&name, run_demo(&state, &name, &req, &controls))
}

fn run_demo(
    state: &AppState,
    name: &str,
    req: &Request,
    controls: &[(String, Control)],
) -> Result<String> {
    let demo: &Demo = demos::find(name).ok_or_else(|| DemoError::UnknownDemo(name.to_string()))?;
    let locale = state.locales.negotiate(req, controls);
    let ctx = DemoContext {
        demo,
        controls,
        locale: &locale,
        translator: state.locales.translator(&locale),
        tmpstore: Arc::clone(&state.tmpstore),
    };

    let result = (demo.build)(&ctx)?;
    let links = TRANSLATED
        .contains(&demo.name)
        .then_some(LocaleLinks { current: &locale });
    Ok(templates::render_demo(&result, links))
}

fn respond(name: &str, result: Result<String>) -> Response {
    match result {
        Ok(html) => Response::html(html),
        Err(DemoError::UnknownDemo(_)) => Response::not_found(),
        Err(DemoError::Router(e)) => {
            warn!(demo = name, error = %e, "Rejected request body");
            Response::bad_request()
        }
        Err(e) => {
            error!(demo = name, error = %e, "Demo failed");
            Response::internal_server_error()
        }
    }
}

/// A file input left empty arrives as a file part without a name; it
/// counts as an empty text value.
fn to_control(value: FormValue) -> Control {
    match value {
        FormValue::Text(text) => Control::Text(text),
        FormValue::File(file) if file.filename.is_empty() => Control::Text(String::new()),
        FormValue::File(file) => Control::File(Upload {
            filename: file.filename,
            mimetype: file.content_type,
            data: file.data,
        }),
    }
}

#[cfg(test)]
mod tests {
    use oxide_router::UploadedFile;

    use super::*;

    #[test]
    fn test_empty_file_part_is_text() {
        let value = FormValue::File(UploadedFile {
            filename: String::new(),
            content_type: Some("application/octet-stream".to_string()),
            data: Vec::new(),
        });
        assert_eq!(to_control(value), Control::Text(String::new()));
    }

    #[test]
    fn test_file_part_is_upload() {
        let value = FormValue::File(UploadedFile {
            filename: "notes.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            data: b"hi".to_vec(),
        });
        let Control::File(upload) = to_control(value) else {
            panic!("expected an upload");
        };
        assert_eq!(upload.filename, "notes.txt");
        assert_eq!(upload.mimetype.as_deref(), Some("text/plain"));
        assert_eq!(upload.data, b"hi");
    }

    #[test]
    fn test_respond_maps_errors() {
        assert_eq!(respond("x", Ok(String::new())).status, 200);
        assert_eq!(respond("x", Err(DemoError::UnknownDemo("x".into()))).status, 404);
        assert_eq!(respond("x", Err(DemoError::Callback("boom".into()))).status, 500);
        let malformed = oxide_router::RouterError::MalformedBody("bad".into());
        assert_eq!(respond("x", Err(malformed.into())).status, 400);
    }

    #[test]
    fn test_allcode_highlight_needs_both_bounds() {
        let html = allcode(&Request::get("/allcode/").query_param("start", "3"));
        assert!(!html.contains("class=\"hll\""));

        let html = allcode(
            &Request::get("/allcode/")
                .query_param("start", "1")
                .query_param("end", "3"),
        );
        assert!(html.contains("class=\"hll\""));
    }
}
