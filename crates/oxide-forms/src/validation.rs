//! Schema node validators.
//!
//! Validators run after a node's value has been deserialized into an
//! [`Appstruct`]; they never see raw submitted strings.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Invalid;
use crate::i18n::TranslationString;
use crate::value::Appstruct;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

/// Trait for node validators.
pub trait Validator: Send + Sync {
    /// Validates a deserialized value.
    fn validate(&self, value: &Appstruct) -> Result<(), Invalid>;
}

/// Validator bounding the length of strings, sets and sequences.
#[derive(Debug, Clone, Default)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
}

impl Length {
    /// Creates a validator with optional bounds.
    pub const fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Only an upper bound.
    pub const fn max(max: usize) -> Self {
        Self::new(None, Some(max))
    }

    /// Only a lower bound.
    pub const fn min(min: usize) -> Self {
        Self::new(Some(min), None)
    }

    /// Both bounds.
    pub const fn between(min: usize, max: usize) -> Self {
        Self::new(Some(min), Some(max))
    }
}

impl Validator for Length {
    fn validate(&self, value: &Appstruct) -> Result<(), Invalid> {
        let len = match value {
            Appstruct::Str(s) => s.chars().count(),
            Appstruct::Set(items) => items.len(),
            Appstruct::Sequence(items) => items.len(),
            _ => return Ok(()),
        };

        if let Some(min) = self.min {
            if len < min {
                return Err(Invalid::new(
                    TranslationString::new("Shorter than minimum length ${min}").with("min", min),
                ));
            }
        }

        if let Some(max) = self.max {
            if len > max {
                return Err(Invalid::new(
                    TranslationString::new("Longer than maximum length ${max}").with("max", max),
                ));
            }
        }

        Ok(())
    }
}

/// Validator bounding integers and dates.
#[derive(Debug, Clone)]
pub struct Range {
    min: Option<Appstruct>,
    max: Option<Appstruct>,
    min_err: String,
    max_err: String,
}

impl Range {
    /// Creates a range validator with optional bounds.
    pub fn new(min: Option<Appstruct>, max: Option<Appstruct>) -> Self {
        Self {
            min,
            max,
            min_err: "${val} is less than minimum value ${min}".to_string(),
            max_err: "${val} is greater than maximum value ${max}".to_string(),
        }
    }

    /// Integer range with both bounds.
    pub fn int(min: i64, max: i64) -> Self {
        Self::new(Some(Appstruct::Int(min)), Some(Appstruct::Int(max)))
    }

    /// Overrides the lower-bound message. `${val}` and `${min}` are available.
    #[must_use]
    pub fn min_err(mut self, message: impl Into<String>) -> Self {
        self.min_err = message.into();
        self
    }

    /// Overrides the upper-bound message. `${val}` and `${max}` are available.
    #[must_use]
    pub fn max_err(mut self, message: impl Into<String>) -> Self {
        self.max_err = message.into();
        self
    }
}

fn compare(a: &Appstruct, b: &Appstruct) -> Option<Ordering> {
    match (a, b) {
        (Appstruct::Int(a), Appstruct::Int(b)) => Some(a.cmp(b)),
        (Appstruct::Date(a), Appstruct::Date(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

impl Validator for Range {
    fn validate(&self, value: &Appstruct) -> Result<(), Invalid> {
        if let Some(min) = &self.min {
            if compare(value, min) == Some(Ordering::Less) {
                return Err(Invalid::new(
                    TranslationString::new(self.min_err.clone())
                        .with("val", value)
                        .with("min", min),
                ));
            }
        }

        if let Some(max) = &self.max {
            if compare(value, max) == Some(Ordering::Greater) {
                return Err(Invalid::new(
                    TranslationString::new(self.max_err.clone())
                        .with("val", value)
                        .with("max", max),
                ));
            }
        }

        Ok(())
    }
}

/// Validator accepting only values from a fixed list.
#[derive(Debug, Clone)]
pub struct OneOf {
    choices: Vec<String>,
}

impl OneOf {
    /// Creates the validator.
    pub fn new<S: Into<String>>(choices: impl IntoIterator<Item = S>) -> Self {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for OneOf {
    fn validate(&self, value: &Appstruct) -> Result<(), Invalid> {
        let text = value.to_string();
        if self.choices.iter().any(|c| c == &text) {
            Ok(())
        } else {
            Err(Invalid::new(
                TranslationString::new("\"${val}\" is not one of ${choices}")
                    .with("val", &text)
                    .with("choices", self.choices.join(", ")),
            ))
        }
    }
}

/// Validator for email addresses.
#[derive(Debug, Clone)]
pub struct Email {
    message: String,
}

impl Email {
    /// Creates a new Email validator with the default message.
    pub fn new() -> Self {
        Self {
            message: "Invalid email address".to_string(),
        }
    }

    /// Creates a new Email validator with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for Email {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for Email {
    fn validate(&self, value: &Appstruct) -> Result<(), Invalid> {
        match value.as_str() {
            Some(s) if EMAIL.is_match(s) => Ok(()),
            _ => Err(Invalid::new(self.message.as_str())),
        }
    }
}

/// Validator wrapping a closure.
///
/// Used on mapping nodes for checks that span several fields.
pub struct Function<F>(pub F);

impl<F> Validator for Function<F>
where
    F: Fn(&Appstruct) -> Result<(), Invalid> + Send + Sync,
{
    fn validate(&self, value: &Appstruct) -> Result<(), Invalid> {
        (self.0)(value)
    }
}
