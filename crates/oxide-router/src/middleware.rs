//! Middleware support for request/response processing.

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::request::Request;
use crate::response::Response;

/// A boxed future for async middleware operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of middleware processing.
pub enum MiddlewareResult {
    /// Continue to the next middleware/handler.
    Continue(Request),
    /// Stop processing and return this response.
    Response(Response),
}

/// Trait for middleware that processes requests and responses.
///
/// Middleware can rewrite the request before it reaches the handler,
/// short-circuit with its own response, or rewrite the response after the
/// handler runs.
///
/// # Example
///
/// ```
/// use oxide_router::{BoxFuture, Middleware, MiddlewareResult, Request, Response};
///
/// struct Maintenance;
///
/// impl Middleware for Maintenance {
///     fn before<'a>(&'a self, _req: &'a Request) -> BoxFuture<'a, MiddlewareResult> {
///         Box::pin(async move {
///             MiddlewareResult::Response(Response::text("Back soon").status(503))
///         })
///     }
///
///     fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response> {
///         Box::pin(async move { res })
///     }
/// }
/// ```
pub trait Middleware: Send + Sync {
    /// Called before the request handler.
    ///
    /// Can modify the request or short-circuit with a response.
    fn before<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, MiddlewareResult>;

    /// Called after the request handler.
    ///
    /// Can modify the response.
    fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response>;
}

/// Middleware that logs each request line and the response status.
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn before<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            info!(method = %req.method, path = %req.path, "Request");
            MiddlewareResult::Continue(req.clone())
        })
    }

    fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            info!(status = res.status, "Response");
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_middleware_passes_through() {
        let req = Request::get("/textinput/");
        let MiddlewareResult::Continue(passed) = LoggingMiddleware.before(&req).await else {
            panic!("logging middleware must not short-circuit");
        };
        assert_eq!(passed.path, "/textinput/");

        let res = LoggingMiddleware.after(Response::text("ok").status(201)).await;
        assert_eq!(res.status, 201);
    }
}
