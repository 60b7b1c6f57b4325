//! Application and control-level value trees.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Metadata for a file held in a [`TmpStore`](crate::TmpStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileData {
    /// Client-side file name.
    pub filename: String,
    /// MIME type reported by the client.
    pub mimetype: Option<String>,
    /// Size in bytes.
    pub size: usize,
    /// Store key.
    pub uid: String,
    /// Optional preview URL supplied by the store.
    pub preview_url: Option<String>,
    /// File contents.
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// A file as it arrived in a multipart request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Upload {
    /// Client-side file name.
    pub filename: String,
    /// MIME type reported by the client.
    pub mimetype: Option<String>,
    /// File contents.
    pub data: Vec<u8>,
}

/// Structured application data used to prefill forms and returned by
/// successful validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Appstruct {
    /// No value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// String.
    Str(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Unordered set of strings.
    Set(BTreeSet<String>),
    /// Uploaded file.
    File(FileData),
    /// Named children.
    Mapping(BTreeMap<String, Appstruct>),
    /// Ordered children.
    Sequence(Vec<Appstruct>),
}

impl Appstruct {
    /// Builds a mapping from `(key, value)` pairs.
    pub fn mapping<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a sequence.
    pub fn sequence<V: Into<Self>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Returns true for [`Appstruct::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Looks up a key in a mapping.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Serializes the value as pretty JSON for display.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for Appstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Set(items) => write!(f, "{{{}}}", items.iter().cloned().collect::<Vec<_>>().join(", ")),
            Self::File(file) => write!(f, "{}", file.filename),
            Self::Mapping(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Self::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Appstruct {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Appstruct {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Appstruct {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Appstruct {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for Appstruct {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Control-level ("cstruct") value: what widgets render and what they
/// produce from submitted controls.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cstruct {
    /// Missing value.
    #[default]
    Null,
    /// A single string.
    Str(String),
    /// Ordered children.
    Seq(Vec<Cstruct>),
    /// Named children.
    Map(BTreeMap<String, Cstruct>),
    /// A freshly uploaded file.
    Upload(Upload),
    /// A file already placed in the temporary store.
    File(FileData),
}

impl Cstruct {
    /// Returns true for [`Cstruct::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a key in a map.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the string stored under `key` in a map, or `""`.
    pub fn str_at(&self, key: &str) -> &str {
        self.get(key).and_then(Self::as_str).unwrap_or("")
    }

    /// Short description used in type error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Str(s) => s.clone(),
            Self::Seq(_) => "sequence".to_string(),
            Self::Map(_) => "mapping".to_string(),
            Self::Upload(u) => u.filename.clone(),
            Self::File(f) => f.filename.clone(),
        }
    }
}

impl From<&str> for Cstruct {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Cstruct {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}
