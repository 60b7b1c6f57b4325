//! Bootstrap 5 leaf widgets.

use super::{flag, html_escape, plaintext, text_value, RenderContext, Widget};
use crate::controls::{END, START};
use crate::i18n::TranslationString;
use crate::schema::Field;
use crate::value::Cstruct;

fn choices<V: Into<String>, L: Into<String>>(
    values: impl IntoIterator<Item = (V, L)>,
) -> Vec<(String, String)> {
    values
        .into_iter()
        .map(|(v, l)| (v.into(), l.into()))
        .collect()
}

fn label_for<'a>(values: &'a [(String, String)], value: &str) -> &'a str {
    values
        .iter()
        .find(|(v, _)| v == value)
        .map_or("", |(_, label)| label.as_str())
}

/// Single-line text input. Also used for passwords and dates.
#[derive(Debug, Clone)]
pub struct TextInput {
    /// The HTML input type.
    pub input_type: String,
    /// Visible width in characters.
    pub size: Option<usize>,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Whether surrounding whitespace is removed.
    pub strip: bool,
    /// Whether the current value is written back into the input.
    pub redisplay: bool,
}

impl Default for TextInput {
    fn default() -> Self {
        Self {
            input_type: "text".to_string(),
            size: None,
            placeholder: None,
            strip: true,
            redisplay: true,
        }
    }
}

impl TextInput {
    /// Creates a text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a password input. The value is never redisplayed.
    pub fn password() -> Self {
        Self {
            input_type: "password".to_string(),
            redisplay: false,
            ..Default::default()
        }
    }

    /// Creates a date input submitting `YYYY-MM-DD`.
    pub fn date() -> Self {
        Self {
            input_type: "date".to_string(),
            ..Default::default()
        }
    }

    /// Sets the visible width.
    #[must_use]
    pub const fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }
}

impl Widget for TextInput {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let value = if self.redisplay {
            cstruct.as_str().unwrap_or("")
        } else {
            ""
        };

        if ctx.readonly() {
            return plaintext(ctx, value);
        }

        let size_attr = self
            .size
            .map(|s| format!(r#" size="{s}""#))
            .unwrap_or_default();
        let placeholder_attr = self
            .placeholder
            .as_ref()
            .map(|p| format!(r#" placeholder="{}""#, html_escape(p)))
            .unwrap_or_default();

        format!(
            r#"<input type="{}" class="{}" id="{}" name="{}" value="{}"{size_attr}{placeholder_attr}>"#,
            self.input_type,
            ctx.input_class("form-control"),
            ctx.oid(),
            html_escape(&field.name),
            html_escape(value)
        )
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        text_value(pstruct, self.strip)
    }
}

/// Multi-line text input.
#[derive(Debug, Clone)]
pub struct Textarea {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Whether surrounding whitespace is removed.
    pub strip: bool,
}

impl Default for Textarea {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 40,
            strip: true,
        }
    }
}

impl Textarea {
    /// Creates a textarea with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }
}

impl Widget for Textarea {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let value = cstruct.as_str().unwrap_or("");
        if ctx.readonly() {
            return plaintext(ctx, value);
        }
        format!(
            r#"<textarea class="{}" id="{}" name="{}" rows="{}" cols="{}">{}</textarea>"#,
            ctx.input_class("form-control"),
            ctx.oid(),
            html_escape(&field.name),
            self.rows,
            self.cols,
            html_escape(value)
        )
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        text_value(pstruct, self.strip)
    }
}

/// Hidden input.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenInput;

impl Widget for HiddenInput {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        if ctx.readonly() {
            return String::new();
        }
        format!(
            r#"<input type="hidden" id="{}" name="{}" value="{}">"#,
            ctx.oid(),
            html_escape(&field.name),
            html_escape(cstruct.as_str().unwrap_or(""))
        )
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        text_value(pstruct, false)
    }

    fn is_hidden(&self) -> bool {
        true
    }
}

/// Single checkbox for boolean nodes.
#[derive(Debug, Clone)]
pub struct Checkbox {
    /// Value submitted when checked.
    pub true_val: String,
    /// Value used when the box is unchecked.
    pub false_val: String,
}

impl Default for Checkbox {
    fn default() -> Self {
        Self {
            true_val: "true".to_string(),
            false_val: "false".to_string(),
        }
    }
}

impl Checkbox {
    /// Creates a checkbox.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Widget for Checkbox {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let checked = cstruct.as_str() == Some(self.true_val.as_str());
        if ctx.readonly() {
            return plaintext(ctx, if checked { "True" } else { "False" });
        }
        let title = ctx.translate(&field.title);
        format!(
            r#"<div class="form-check">
  <input class="{}" type="checkbox" id="{}" name="{}" value="{}"{}>
  <label class="form-check-label" for="{}">{}</label>
</div>"#,
            ctx.input_class("form-check-input"),
            ctx.oid(),
            html_escape(&field.name),
            html_escape(&self.true_val),
            flag(checked, " checked"),
            ctx.oid(),
            html_escape(&title)
        )
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        let checked = matches!(pstruct, Some(Cstruct::Str(s)) if *s == self.true_val);
        Ok(Cstruct::Str(if checked {
            self.true_val.clone()
        } else {
            self.false_val.clone()
        }))
    }
}

/// Group of radio buttons.
#[derive(Debug, Clone, Default)]
pub struct RadioChoice {
    /// Choices as `(value, label)`.
    pub values: Vec<(String, String)>,
}

impl RadioChoice {
    /// Creates a radio group.
    pub fn new<V: Into<String>, L: Into<String>>(values: impl IntoIterator<Item = (V, L)>) -> Self {
        Self {
            values: choices(values),
        }
    }
}

impl Widget for RadioChoice {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let current = cstruct.as_str().unwrap_or("");
        if ctx.readonly() {
            return plaintext(ctx, label_for(&self.values, current));
        }

        let oid = ctx.oid();
        let class = ctx.input_class("form-check-input");
        let mut html = String::new();
        for (i, (value, label)) in self.values.iter().enumerate() {
            let id = format!("{oid}-{i}");
            html.push_str(&format!(
                r#"<div class="form-check">
  <input class="{class}" type="radio" id="{id}" name="{}" value="{}"{}>
  <label class="form-check-label" for="{id}">{}</label>
</div>
"#,
                html_escape(&field.name),
                html_escape(value),
                flag(value == current, " checked"),
                html_escape(label)
            ));
        }
        html
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        text_value(pstruct, false)
    }
}

/// Drop-down select.
#[derive(Debug, Clone, Default)]
pub struct Select {
    /// Choices as `(value, label)`. An empty value acts as the blank option.
    pub values: Vec<(String, String)>,
}

impl Select {
    /// Creates a select.
    pub fn new<V: Into<String>, L: Into<String>>(values: impl IntoIterator<Item = (V, L)>) -> Self {
        Self {
            values: choices(values),
        }
    }
}

impl Widget for Select {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let current = cstruct.as_str().unwrap_or("");
        if ctx.readonly() {
            return plaintext(ctx, label_for(&self.values, current));
        }

        let options: String = self
            .values
            .iter()
            .map(|(value, label)| {
                format!(
                    r#"<option value="{}"{}>{}</option>"#,
                    html_escape(value),
                    flag(value == current, " selected"),
                    html_escape(label)
                )
            })
            .collect();

        format!(
            r#"<select class="{}" id="{}" name="{}">{options}</select>"#,
            ctx.input_class("form-select"),
            ctx.oid(),
            html_escape(&field.name)
        )
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        text_value(pstruct, false)
    }
}

/// Group of checkboxes for set nodes.
#[derive(Debug, Clone, Default)]
pub struct CheckboxChoice {
    /// Choices as `(value, label)`.
    pub values: Vec<(String, String)>,
}

impl CheckboxChoice {
    /// Creates a checkbox group.
    pub fn new<V: Into<String>, L: Into<String>>(values: impl IntoIterator<Item = (V, L)>) -> Self {
        Self {
            values: choices(values),
        }
    }
}

impl Widget for CheckboxChoice {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let selected: Vec<&str> = match cstruct {
            Cstruct::Seq(items) => items.iter().filter_map(Cstruct::as_str).collect(),
            Cstruct::Str(s) => vec![s.as_str()],
            _ => Vec::new(),
        };

        if ctx.readonly() {
            let labels: Vec<&str> = self
                .values
                .iter()
                .filter(|(v, _)| selected.contains(&v.as_str()))
                .map(|(_, l)| l.as_str())
                .collect();
            return plaintext(ctx, &labels.join(", "));
        }

        let oid = ctx.oid();
        let class = ctx.input_class("form-check-input");
        let name = html_escape(&field.name);
        let mut html = format!(r#"<input type="hidden" name="{START}" value="{name}:sequence">"#);
        for (i, (value, label)) in self.values.iter().enumerate() {
            let id = format!("{oid}-{i}");
            html.push_str(&format!(
                r#"<div class="form-check">
  <input class="{class}" type="checkbox" id="{id}" name="checkbox" value="{}"{}>
  <label class="form-check-label" for="{id}">{}</label>
</div>
"#,
                html_escape(value),
                flag(selected.contains(&value.as_str()), " checked"),
                html_escape(label)
            ));
        }
        html.push_str(&format!(
            r#"<input type="hidden" name="{END}" value="{name}:sequence">"#
        ));
        html
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        match pstruct {
            None | Some(Cstruct::Null) => Ok(Cstruct::Null),
            Some(Cstruct::Str(s)) => Ok(Cstruct::Seq(vec![Cstruct::Str(s.clone())])),
            Some(seq @ Cstruct::Seq(_)) => Ok(seq.clone()),
            Some(other) => Err(
                TranslationString::new("\"${val}\" is not iterable").with("val", other.describe()),
            ),
        }
    }
}
