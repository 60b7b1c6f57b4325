//! HTTP response type.

use std::collections::HashMap;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a new response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a 200 OK response.
    pub fn ok() -> Self {
        Self::new(200)
    }

    fn with_content(content_type: &str, body: String) -> Self {
        Self::ok()
            .header("Content-Type", content_type)
            .body(body)
    }

    /// Creates a response with HTML content.
    pub fn html(body: impl Into<String>) -> Self {
        Self::with_content("text/html; charset=utf-8", body.into())
    }

    /// Creates a response with a stylesheet.
    pub fn css(body: impl Into<String>) -> Self {
        Self::with_content("text/css; charset=utf-8", body.into())
    }

    /// Creates a response with plain text content.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_content("text/plain; charset=utf-8", body.into())
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        Self::new(400).body("Bad Request")
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::new(404).body("Not Found")
    }

    /// Creates a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        Self::new(405).body("Method Not Allowed")
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_server_error() -> Self {
        Self::new(500).body("Internal Server Error")
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the status code.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Returns the status text for the current status code.
    pub fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}
