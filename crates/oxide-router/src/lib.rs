//! # oxide-router
//!
//! Request routing for the form demos.
//!
//! Routes pair a method with a segment pattern (`/`, `/{name}/`,
//! `/static/{*path}`) and are tried in the order they were added.
//! Middleware wraps every handler, and [`Request::form_data`] decodes
//! urlencoded and multipart bodies into ordered pairs.
//!
//! ## Usage
//!
//! ```ignore
//! use oxide_router::{Router, Request, Response};
//!
//! async fn index(_req: Request) -> Response {
//!     Response::html("<h1>Demos</h1>")
//! }
//!
//! async fn demo(req: Request) -> Response {
//!     let name = req.params.get("name").unwrap_or("unknown");
//!     Response::text(format!("demo {name}"))
//! }
//!
//! let router = Router::new()
//!     .get("/", index)
//!     .get("/{name}/", demo)
//!     .post("/{name}/", demo);
//!
//! let response = router.handle(Request::get("/textinput/")).await;
//! ```
//!
//! ## Form Data
//!
//! Submitted fields come back in document order, duplicates included:
//!
//! ```ignore
//! async fn handler(req: Request) -> Response {
//!     match req.form_data().await {
//!         Ok(pairs) => Response::text(format!("{} fields", pairs.len())),
//!         Err(_) => Response::bad_request(),
//!     }
//! }
//! ```
//!
//! ## Middleware
//!
//! ```ignore
//! use oxide_router::{LoggingMiddleware, Router};
//!
//! let router = Router::new()
//!     .middleware(LoggingMiddleware)
//!     .get("/", handler);
//! ```

mod error;
mod middleware;
mod path;
mod request;
mod response;
mod router;

pub use error::{Result, RouterError};
pub use middleware::{BoxFuture, LoggingMiddleware, Middleware, MiddlewareResult};
pub use path::PathPattern;
pub use request::{FormValue, Method, PathParams, Request, UploadedFile};
pub use response::Response;
pub use router::{Handler, Route, Router};
