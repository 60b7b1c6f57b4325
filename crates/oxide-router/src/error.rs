//! Error types for routing and request parsing.

use thiserror::Error;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No route matched the request.
    #[error("no route matched: {method} {path}")]
    NotFound { method: String, path: String },

    /// Method not allowed for this route.
    #[error("method not allowed: {method} for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// The request body could not be decoded.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// A multipart body could not be read.
    #[error("multipart error: {0}")]
    Multipart(#[from] multer::Error),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
