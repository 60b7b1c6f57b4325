//! HTTP/1 server bridging hyper and the router.

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper_util::rt::TokioIo;
use oxide_router::{Method, Request, Response, Router};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Converts a hyper request, runs it through the router and converts the
/// response back.
///
/// A body that fails to arrive in full is answered with 400 without
/// reaching the router.
pub async fn handle_request<B>(
    req: HyperRequest<B>,
    router: Arc<Router>,
) -> std::result::Result<HyperResponse<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Display,
{
    let method = Method::parse(req.method().as_str()).unwrap_or(Method::Get);
    let uri = req.uri();
    let mut oxide_req = Request::new(method, uri.path());

    if let Some(query) = uri.query() {
        oxide_req.query = Request::parse_query_string(query);
    }

    for (key, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            oxide_req.headers.insert(key.to_string(), v.to_string());
        }
    }

    match req.into_body().collect().await {
        Ok(collected) => oxide_req.body = collected.to_bytes().to_vec(),
        Err(e) => {
            warn!(path = %oxide_req.path, error = %e, "Could not read request body");
            return Ok(into_hyper(Response::bad_request()));
        }
    }

    Ok(into_hyper(router.handle(oxide_req).await))
}

fn into_hyper(res: Response) -> HyperResponse<Full<Bytes>> {
    let mut builder = HyperResponse::builder()
        .status(StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));

    for (key, value) in &res.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    builder.body(Full::new(Bytes::from(res.body))).unwrap_or_else(|e| {
        warn!(error = %e, "Invalid response");
        let mut fallback = HyperResponse::new(Full::new(Bytes::from_static(b"Internal Server Error")));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

/// Accepts connections until `shutdown` resolves, one task per
/// connection.
///
/// Connections already accepted are left to finish on their own.
pub async fn serve(
    listener: TcpListener,
    router: Arc<Router>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => accepted?,
            () = &mut shutdown => {
                info!("Shutting down");
                return Ok(());
            }
        };
        debug!(%peer, "Accepted connection");

        let io = TokioIo::new(stream);
        let router = Arc::clone(&router);

        tokio::task::spawn(async move {
            let service = service_fn(move |req: HyperRequest<Incoming>| {
                handle_request(req, Arc::clone(&router))
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!(%peer, error = %err, "Error serving connection");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use hyper::body::Frame;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use super::*;

    /// A body whose connection drops before any data arrives.
    struct ResetBody;

    impl Body for ResetBody {
        type Data = Bytes;
        type Error = io::Error;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<std::result::Result<Frame<Bytes>, io::Error>>> {
            Poll::Ready(Some(Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))))
        }
    }

    fn echo_router() -> Arc<Router> {
        Arc::new(Router::new().post("/echo/", |req: Request| async move {
            Response::text(req.body_string().unwrap_or_default())
        }))
    }

    async fn body_text(res: HyperResponse<Full<Bytes>>) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_handle_request_passes_body_and_query() {
        let req = HyperRequest::post("/echo/?a=1")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from_static(b"text=hi&submit=submit")))
            .unwrap();
        let res = handle_request(req, echo_router()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "text=hi&submit=submit");
    }

    #[tokio::test]
    async fn test_handle_request_unreadable_body_is_bad_request() {
        let req = HyperRequest::post("/echo/").body(ResetBody).unwrap();
        let res = handle_request(req, echo_router()).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_hyper_copies_status_and_headers() {
        let res = into_hyper(Response::css("a{}").header("Cache-Control", "max-age=360"));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["cache-control"], "max-age=360");
    }

    #[test]
    fn test_into_hyper_rejects_bad_header() {
        let res = into_hyper(Response::ok().header("X-Bad", "line\nbreak"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Arc::new(Router::new().get("/", |_req| async { Response::text("pong") }));
        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, router, async {
            let _ = rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).await.unwrap();
        assert!(reply.starts_with("HTTP/1.1 200 OK"));
        assert!(reply.ends_with("pong"));

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
