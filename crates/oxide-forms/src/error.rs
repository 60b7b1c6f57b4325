//! Error types for forms.

use std::collections::HashMap;
use thiserror::Error;

use crate::i18n::TranslationString;

/// Form-specific errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// No schema node exists at the given dotted path.
    #[error("no field at path: {0}")]
    UnknownField(String),

    /// The form schema root is not a mapping.
    #[error("form schema must be a mapping, got {0}")]
    NotAMapping(String),
}

/// A failed validation, optionally carrying messages for named children.
///
/// Mapping-level validators use the children to point at the offending
/// field while also reporting a message for the mapping itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid {
    /// Message for the node being validated.
    pub message: TranslationString,
    /// Messages for direct children, keyed by child name.
    pub children: Vec<(String, TranslationString)>,
}

impl Invalid {
    /// Creates an error with a single message.
    pub fn new(message: impl Into<TranslationString>) -> Self {
        Self {
            message: message.into(),
            children: Vec::new(),
        }
    }

    /// Attaches a message to a child node.
    #[must_use]
    pub fn child(mut self, name: impl Into<String>, message: impl Into<TranslationString>) -> Self {
        self.children.push((name.into(), message.into()));
        self
    }
}

impl From<TranslationString> for Invalid {
    fn from(message: TranslationString) -> Self {
        Self::new(message)
    }
}

/// Collection of validation errors keyed by dotted field path.
///
/// The empty path holds form-level errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Errors keyed by field path.
    pub errors: HashMap<String, Vec<TranslationString>>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Adds an error for a field path.
    pub fn add(&mut self, path: &str, message: impl Into<TranslationString>) {
        self.errors
            .entry(path.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of paths with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns errors for a specific path.
    pub fn get(&self, path: &str) -> Option<&Vec<TranslationString>> {
        self.errors.get(path)
    }

    /// Returns form-level errors.
    pub fn form_errors(&self) -> &[TranslationString] {
        self.errors.get("").map_or(&[], Vec::as_slice)
    }

    /// Returns all errors as a flat list sorted by path.
    pub fn all_errors(&self) -> Vec<(&str, &TranslationString)> {
        let mut all: Vec<(&str, &TranslationString)> = self
            .errors
            .iter()
            .flat_map(|(path, messages)| messages.iter().map(move |msg| (path.as_str(), msg)))
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (path, message) in self.all_errors() {
            writeln!(f, "{path}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
