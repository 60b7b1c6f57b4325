//! Path pattern matching.

use crate::request::PathParams;

/// A segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// A literal string segment.
    Literal(String),
    /// A parameter segment (e.g., {id}).
    Param(String),
    /// A wildcard segment (matches remainder of path).
    Wildcard(String),
}

/// A compiled path pattern for matching URLs.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    segments: Vec<PathSegment>,
}

impl PathPattern {
    /// Parses a path pattern string.
    ///
    /// Pattern syntax:
    /// - `/code.css` - Literal path
    /// - `/{name}/` - Path with parameter
    /// - `/static/{*path}` - Wildcard parameter (matches rest of path)
    ///
    /// A trailing slash is optional when matching.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_router::PathPattern;
    ///
    /// let pattern = PathPattern::new("/{name}/");
    /// let params = pattern.match_path("/textinput/").unwrap();
    /// assert_eq!(params.get("name"), Some("textinput"));
    /// ```
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|part| {
                match part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(param) => param.strip_prefix('*').map_or_else(
                        || PathSegment::Param(param.to_string()),
                        |name| PathSegment::Wildcard(name.to_string()),
                    ),
                    None => PathSegment::Literal(part.to_string()),
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Attempts to match a path against this pattern.
    ///
    /// Returns extracted parameters if the path matches.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        let mut parts = trimmed.split('/').skip(1).peekable();

        let mut params = PathParams::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Literal(lit) => {
                    if parts.next()? != lit {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    let value = parts.next().filter(|v| !v.is_empty())?;
                    params.insert(name.clone(), value);
                }
                PathSegment::Wildcard(name) => {
                    let rest: Vec<&str> = parts.by_ref().collect();
                    if rest.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), rest.join("/"));
                }
            }
        }

        if parts.peek().is_some() {
            return None;
        }
        Some(params)
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
