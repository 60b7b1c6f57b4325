//! Translatable messages.
//!
//! Titles, descriptions, button labels and validation messages are
//! [`TranslationString`]s. A message id may contain `${name}` placeholders
//! that are filled from the string's mapping after translation, so a
//! catalog can reorder them freely.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// A message id plus the values for its placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationString {
    /// The message id, also used as the default text.
    pub msgid: String,
    /// Placeholder values.
    pub mapping: Vec<(String, String)>,
}

impl TranslationString {
    /// Creates a message without placeholders.
    pub fn new(msgid: impl Into<String>) -> Self {
        Self {
            msgid: msgid.into(),
            mapping: Vec::new(),
        }
    }

    /// Adds a placeholder value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.mapping.push((key.into(), value.to_string()));
        self
    }

    /// Fills placeholders in `template` from this string's mapping.
    ///
    /// Unknown placeholders are left untouched.
    pub fn interpolate(&self, template: &str) -> String {
        if self.mapping.is_empty() {
            return template.to_string();
        }
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                self.mapping
                    .iter()
                    .find(|(k, _)| k == &caps[1])
                    .map_or_else(|| caps[0].to_string(), |(_, v)| v.clone())
            })
            .into_owned()
    }
}

impl fmt::Display for TranslationString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.interpolate(&self.msgid))
    }
}

impl From<&str> for TranslationString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TranslationString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Turns translation strings into display text.
pub trait Translator: Send + Sync {
    /// Translates and interpolates a message.
    fn translate(&self, message: &TranslationString) -> String;
}

/// Translator that only interpolates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
    fn translate(&self, message: &TranslationString) -> String {
        message.to_string()
    }
}

/// In-memory message catalog for one locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: String,
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            messages: HashMap::new(),
        }
    }

    /// Adds a translation.
    #[must_use]
    pub fn message(mut self, msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        self.messages.insert(msgid.into(), msgstr.into());
        self
    }

    /// Returns the catalog's locale name.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns the number of translated messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns whether the catalog has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Translator for Catalog {
    fn translate(&self, message: &TranslationString) -> String {
        let template = self
            .messages
            .get(&message.msgid)
            .map_or(message.msgid.as_str(), String::as_str);
        message.interpolate(template)
    }
}
