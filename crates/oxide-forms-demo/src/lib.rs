//! # oxide-forms-demo
//!
//! A demo site for `oxide-forms`. Each page builds one form and runs it
//! through the submission cycle:
//!
//! - A GET, or a POST without the submit marker, renders the form, prefilled
//!   from the demo's appstruct if it has one.
//! - A POST with the marker validates the controls. On success the form is
//!   rendered with the captured data and the captured structure is shown as
//!   JSON. On failure the form is re-rendered with its errors.
//!
//! Every page also shows the source of its demo function, and `/allcode/`
//! shows the whole demo module.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use oxide_forms_demo::app::{build_router, AppState};
//! use oxide_router::Request;
//!
//! let router = build_router(Arc::new(AppState::new("en")));
//! let response = router.handle(Request::get("/textinput/")).await;
//! assert_eq!(response.status, 200);
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod cycle;
pub mod demos;
pub mod error;
pub mod locale;
pub mod server;
pub mod source;
pub mod templates;
pub mod tmpstore;

pub use app::{build_router, AppState};
pub use config::Config;
pub use context::DemoContext;
pub use cycle::{process, FormSubmissionCycle, Outcome, RenderOptions, RenderResult, Submission};
pub use demos::Demo;
pub use error::{DemoError, Result};
pub use locale::Locales;
pub use source::SourceSnippet;
pub use tmpstore::MemoryTmpStore;
