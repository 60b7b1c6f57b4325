//! HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use futures::future::ready;
use futures::stream::once;

use crate::error::{Result, RouterError};

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
}

impl Method {
    /// Parses a method name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// Returns the method as a string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Path parameters extracted from the URL.
#[derive(Debug, Clone, Default)]
pub struct PathParams {
    params: HashMap<String, String>,
}

impl PathParams {
    /// Creates new empty path params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Gets a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// A file part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-side file name.
    pub filename: String,
    /// Declared content type.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Vec<u8>,
}

/// A single value of a submitted form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// A text field.
    Text(String),
    /// A file field.
    File(UploadedFile),
}

/// An HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// Path parameters extracted from URL patterns.
    pub params: PathParams,
    /// Query string parameters in order of appearance.
    pub query: Vec<(String, String)>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: PathParams::new(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets an urlencoded body with the matching content type.
    #[must_use]
    pub fn form(self, pairs: &[(&str, &str)]) -> Self {
        let body = serde_urlencoded::to_string(pairs).unwrap_or_default();
        self.header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Gets the first query parameter with the given name.
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Gets a cookie value from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.get_header("Cookie")?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses query parameters from a query string, keeping their order.
    pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
        serde_urlencoded::from_str(query).unwrap_or_default()
    }

    /// Decodes the body as submitted form data, keeping field order and
    /// duplicates.
    ///
    /// Handles `application/x-www-form-urlencoded` and
    /// `multipart/form-data`, matching the media type case-insensitively.
    /// A request without a content type is treated as urlencoded.
    pub async fn form_data(&self) -> Result<Vec<(String, FormValue)>> {
        let content_type = self.get_header("Content-Type").unwrap_or("");
        // The boundary parameter is case-sensitive, so only the match is lowered.
        let media = content_type.to_ascii_lowercase();

        if media.starts_with("multipart/form-data") {
            return self.multipart(content_type).await;
        }

        if media.is_empty() || media.starts_with("application/x-www-form-urlencoded") {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&self.body)
                .map_err(|e| RouterError::MalformedBody(e.to_string()))?;
            return Ok(pairs
                .into_iter()
                .map(|(k, v)| (k, FormValue::Text(v)))
                .collect());
        }

        Err(RouterError::MalformedBody(format!(
            "unsupported content type: {content_type}"
        )))
    }

    async fn multipart(&self, content_type: &str) -> Result<Vec<(String, FormValue)>> {
        let boundary = multer::parse_boundary(content_type)?;
        let body = Bytes::copy_from_slice(&self.body);
        let stream = once(ready(Ok::<_, std::io::Error>(body)));
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut pairs = Vec::new();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(str::to_string);
            let value = match filename {
                Some(filename) => {
                    let content_type = field.content_type().map(ToString::to_string);
                    let data = field.bytes().await?;
                    FormValue::File(UploadedFile {
                        filename,
                        content_type,
                        data: data.to_vec(),
                    })
                }
                None => FormValue::Text(field.text().await?),
            };
            pairs.push((name, value));
        }
        Ok(pairs)
    }
}
