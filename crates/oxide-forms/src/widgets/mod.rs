//! Widgets: rendering schema nodes as Bootstrap 5 markup and turning
//! submitted controls back into cstructs.

mod bootstrap;
mod compound;
mod upload;

pub use bootstrap::{Checkbox, CheckboxChoice, HiddenInput, RadioChoice, Select, TextInput, Textarea};
pub use compound::{CheckedInput, DateParts, MappingWidget, SequenceWidget};
pub use upload::FileUpload;

use crate::error::ValidationErrors;
use crate::i18n::{TranslationString, Translator};
use crate::schema::Field;
use crate::value::Cstruct;

/// Placeholder path segment used for sequence item prototypes.
pub const PROTOTYPE_INDEX: &str = "__index__";

/// Per-node rendering state.
///
/// Carries the node's dotted path so widgets can find their own errors and
/// build unique element ids.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    readonly: bool,
    errors: Option<&'a ValidationErrors>,
    translator: &'a dyn Translator,
    path: &'a str,
}

impl<'a> RenderContext<'a> {
    /// Creates a root context.
    pub const fn new(
        translator: &'a dyn Translator,
        errors: Option<&'a ValidationErrors>,
        readonly: bool,
    ) -> Self {
        Self {
            readonly,
            errors,
            translator,
            path: "",
        }
    }

    /// Whether inputs should be rendered as plain text.
    pub const fn readonly(&self) -> bool {
        self.readonly
    }

    /// Dotted path of the current node.
    pub const fn path(&self) -> &str {
        self.path
    }

    /// Runs `f` with the context of a child path.
    pub fn with_child<R>(&self, name: &str, f: impl FnOnce(&RenderContext<'_>) -> R) -> R {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.path)
        };
        f(&RenderContext {
            path: &path,
            ..*self
        })
    }

    /// Runs `f` with the context of a sequence prototype; errors are not
    /// shown inside prototypes.
    pub fn with_prototype<R>(&self, f: impl FnOnce(&RenderContext<'_>) -> R) -> R {
        let detached = RenderContext {
            errors: None,
            ..*self
        };
        detached.with_child(PROTOTYPE_INDEX, f)
    }

    /// Element id for the current node.
    pub fn oid(&self) -> String {
        format!("field-{}", self.path.replace('.', "-"))
    }

    /// Translated messages recorded for the current node.
    pub fn errors(&self) -> Vec<String> {
        self.errors
            .and_then(|errors| errors.get(self.path))
            .map(|messages| messages.iter().map(|m| self.translate(m)).collect())
            .unwrap_or_default()
    }

    /// Whether the current node has errors.
    pub fn has_errors(&self) -> bool {
        self.errors
            .and_then(|errors| errors.get(self.path))
            .is_some_and(|messages| !messages.is_empty())
    }

    /// Translates a message.
    pub fn translate(&self, message: &TranslationString) -> String {
        self.translator.translate(message)
    }

    /// Input class, with `is-invalid` when the node has errors.
    pub fn input_class(&self, base: &str) -> String {
        if self.has_errors() {
            format!("{base} is-invalid")
        } else {
            base.to_string()
        }
    }
}

/// Trait for widgets.
pub trait Widget: Send + Sync {
    /// Renders the node's current state.
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String;

    /// Converts the submitted value into a cstruct. `None` means the
    /// control was absent.
    fn deserialize(
        &self,
        field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString>;

    /// Hidden widgets render without a label.
    fn is_hidden(&self) -> bool {
        false
    }

    /// Compound widgets render their own title.
    fn is_compound(&self) -> bool {
        false
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Checked and selected attributes.
pub(crate) const fn flag(on: bool, name: &'static str) -> &'static str {
    if on {
        name
    } else {
        ""
    }
}

/// Deserializes a single text value, trimming whitespace when `strip` is
/// set. Empty values become null.
pub(crate) fn text_value(pstruct: Option<&Cstruct>, strip: bool) -> Result<Cstruct, TranslationString> {
    match pstruct {
        None | Some(Cstruct::Null) => Ok(Cstruct::Null),
        Some(Cstruct::Str(s)) => {
            let value = if strip { s.trim() } else { s.as_str() };
            if value.is_empty() {
                Ok(Cstruct::Null)
            } else {
                Ok(Cstruct::Str(value.to_string()))
            }
        }
        Some(other) => {
            Err(TranslationString::new("\"${val}\" is not a string").with("val", other.describe()))
        }
    }
}

/// Readonly rendering of a single value.
pub(crate) fn plaintext(ctx: &RenderContext<'_>, text: &str) -> String {
    format!(
        r#"<p class="form-control-plaintext" id="{}">{}</p>"#,
        ctx.oid(),
        html_escape(text)
    )
}
