//! Error types for the demo application.

use thiserror::Error;

/// Demo-specific errors.
#[derive(Debug, Error)]
pub enum DemoError {
    /// No demo is registered under this name.
    #[error("unknown demo: {0}")]
    UnknownDemo(String),

    /// A success callback failed after validation passed.
    #[error("success callback failed: {0}")]
    Callback(String),

    /// Form construction error.
    #[error("form error: {0}")]
    Form(#[from] oxide_forms::FormError),

    /// Request decoding error.
    #[error("router error: {0}")]
    Router(#[from] oxide_router::RouterError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for demo operations.
pub type Result<T> = std::result::Result<T, DemoError>;
