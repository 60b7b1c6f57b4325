//! Main router implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{Result, RouterError};
use crate::middleware::{BoxFuture, Middleware, MiddlewareResult};
use crate::path::PathPattern;
use crate::request::{Method, PathParams, Request};
use crate::response::Response;

/// A boxed async handler function.
pub type Handler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// A single route definition.
#[derive(Clone)]
pub struct Route {
    /// HTTP method.
    pub method: Method,
    /// Path pattern.
    pub pattern: PathPattern,
    /// Request handler.
    pub handler: Handler,
}

impl Route {
    /// Creates a new route.
    pub fn new<F, Fut>(method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            method,
            pattern: PathPattern::new(pattern),
            handler: Arc::new(move |req| Box::pin(handler(req))),
        }
    }
}

/// The main router for handling HTTP requests.
///
/// Routes are tried in registration order, so a literal route must be
/// added before a parameter route that would also match it.
pub struct Router {
    /// Registered routes.
    routes: Vec<Route>,
    /// Global middleware.
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            middleware: Vec::new(),
        }
    }

    /// Adds a GET route.
    #[must_use]
    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Get, path, handler)
    }

    /// Adds a POST route.
    #[must_use]
    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Post, path, handler)
    }

    /// Adds a route with any method.
    #[must_use]
    pub fn route<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes.push(Route::new(method, path, handler));
        self
    }

    /// Adds global middleware.
    #[must_use]
    pub fn middleware(mut self, mw: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(mw));
        self
    }

    /// Handles an incoming request.
    pub fn handle<'a>(
        &'a self,
        mut request: Request,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + 'a>> {
        Box::pin(async move {
            // Run before middleware
            for mw in &self.middleware {
                match mw.before(&request).await {
                    MiddlewareResult::Continue(req) => request = req,
                    MiddlewareResult::Response(res) => {
                        // Run after middleware even on early return
                        let mut response = res;
                        for mw in self.middleware.iter().rev() {
                            response = mw.after(response).await;
                        }
                        return response;
                    }
                }
            }

            let mut response = match self.find_route(&request) {
                Ok((route, params)) => {
                    request.params = params;
                    (route.handler)(request).await
                }
                Err(RouterError::NotFound { .. }) => Response::not_found(),
                Err(RouterError::MethodNotAllowed { .. }) => Response::method_not_allowed(),
                Err(_) => Response::internal_server_error(),
            };

            // Run after middleware
            for mw in self.middleware.iter().rev() {
                response = mw.after(response).await;
            }

            response
        })
    }

    /// Finds a matching route for the request.
    fn find_route(&self, request: &Request) -> Result<(&Route, PathParams)> {
        let mut method_matched = false;

        for route in &self.routes {
            if let Some(params) = route.pattern.match_path(&request.path) {
                method_matched = true;
                if route.method == request.method {
                    return Ok((route, params));
                }
            }
        }

        if method_matched {
            Err(RouterError::MethodNotAllowed {
                method: request.method.to_string(),
                path: request.path.clone(),
            })
        } else {
            Err(RouterError::NotFound {
                method: request.method.to_string(),
                path: request.path.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn index_handler(_req: Request) -> Response {
        Response::text("index")
    }

    async fn demo_handler(req: Request) -> Response {
        let name = req.params.get("name").unwrap_or("unknown");
        Response::text(format!("demo: {name}"))
    }

    #[tokio::test]
    async fn test_basic_routing() {
        let router = Router::new()
            .get("/", index_handler)
            .get("/{name}/", demo_handler);

        let res = router.handle(Request::get("/")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string(), Some("index".to_string()));
    }

    #[tokio::test]
    async fn test_path_params() {
        let router = Router::new().get("/{name}/", demo_handler);

        let res = router.handle(Request::get("/sequence_of_mappings/")).await;
        assert_eq!(res.status, 200);
        assert_eq!(
            res.body_string(),
            Some("demo: sequence_of_mappings".to_string())
        );
    }

    #[tokio::test]
    async fn test_registration_order_wins() {
        let router = Router::new()
            .get("/allcode/", index_handler)
            .get("/{name}/", demo_handler);

        let res = router.handle(Request::get("/allcode/")).await;
        assert_eq!(res.body_string(), Some("index".to_string()));
    }

    #[tokio::test]
    async fn test_same_path_for_two_methods() {
        let router = Router::new()
            .get("/{name}/", demo_handler)
            .post("/{name}/", demo_handler);

        let res = router.handle(Request::post("/textinput/")).await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn test_not_found() {
        let router = Router::new().get("/", index_handler);

        let res = router.handle(Request::get("/nonexistent/deeper")).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let router = Router::new().get("/", index_handler);

        let res = router.handle(Request::post("/")).await;
        assert_eq!(res.status, 405);
    }

    struct Teapot;

    impl Middleware for Teapot {
        fn before<'a>(&'a self, _req: &'a Request) -> BoxFuture<'a, MiddlewareResult> {
            Box::pin(async move { MiddlewareResult::Response(Response::new(418)) })
        }

        fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response> {
            Box::pin(async move { res.header("X-Teapot", "yes") })
        }
    }

    #[tokio::test]
    async fn test_middleware_short_circuit() {
        let router = Router::new().get("/", index_handler).middleware(Teapot);

        let res = router.handle(Request::get("/")).await;
        assert_eq!(res.status, 418);
        assert_eq!(res.headers.get("X-Teapot"), Some(&"yes".to_string()));
    }
}
