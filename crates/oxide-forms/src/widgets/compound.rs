//! Widgets whose controls are wrapped in structural markers.

use super::{html_escape, plaintext, RenderContext, Widget};
use crate::controls::{END, START};
use crate::form::render_field;
use crate::i18n::TranslationString;
use crate::schema::Field;
use crate::value::{Appstruct, Cstruct};

fn marker(kind: &str, name: &str, suffix: &str) -> String {
    format!(
        r#"<input type="hidden" name="{kind}" value="{}:{suffix}">"#,
        html_escape(name)
    )
}

fn error_block(ctx: &RenderContext<'_>) -> String {
    ctx.errors()
        .iter()
        .map(|e| format!(r#"<div class="invalid-feedback d-block">{}</div>"#, html_escape(e)))
        .collect()
}

fn render_children(field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
    field
        .children
        .iter()
        .map(|child| {
            let sub = cstruct.get(&child.name).unwrap_or(&Cstruct::Null);
            ctx.with_child(&child.name, |ctx| render_field(child, sub, ctx))
        })
        .collect()
}

/// Fieldset holding the children of a mapping node.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingWidget;

impl Widget for MappingWidget {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let mut html = format!(
            r#"<fieldset class="border rounded p-3 mb-3" id="{}"><legend class="fs-6 fw-semibold">{}</legend>"#,
            ctx.oid(),
            html_escape(&ctx.translate(&field.title))
        );
        if let Some(description) = &field.description {
            html.push_str(&format!(
                r#"<div class="form-text mb-2">{}</div>"#,
                html_escape(&ctx.translate(description))
            ));
        }
        html.push_str(&error_block(ctx));
        if !ctx.readonly() {
            html.push_str(&marker(START, &field.name, "mapping"));
        }
        html.push_str(&render_children(field, cstruct, ctx));
        if !ctx.readonly() {
            html.push_str(&marker(END, &field.name, "mapping"));
        }
        html.push_str("</fieldset>");
        html
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        match pstruct {
            None | Some(Cstruct::Null) => Ok(Cstruct::Map(Default::default())),
            Some(other) => Ok(other.clone()),
        }
    }

    fn is_compound(&self) -> bool {
        true
    }
}

/// Repeating list of items with add and remove buttons.
///
/// New items are cloned client-side from a `<template>` prototype whose
/// ids contain [`PROTOTYPE_INDEX`](super::PROTOTYPE_INDEX).
#[derive(Debug, Clone, Default)]
pub struct SequenceWidget {
    /// Render one empty item when the sequence is empty.
    pub render_initial_item: bool,
    /// Minimum number of items.
    pub min_len: Option<usize>,
    /// Maximum number of items.
    pub max_len: Option<usize>,
}

impl SequenceWidget {
    /// Creates a sequence widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders an initial empty item.
    #[must_use]
    pub const fn render_initial_item(mut self) -> Self {
        self.render_initial_item = true;
        self
    }

    /// Sets the minimum number of items.
    #[must_use]
    pub const fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    /// Sets the maximum number of items.
    #[must_use]
    pub const fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }
}

impl Widget for SequenceWidget {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let Some(item) = field.item() else {
            return String::new();
        };

        let mut items: Vec<Cstruct> = match cstruct {
            Cstruct::Seq(items) => items.clone(),
            _ => Vec::new(),
        };
        if !ctx.readonly() {
            let min = self
                .min_len
                .unwrap_or(0)
                .max(usize::from(self.render_initial_item));
            while items.len() < min {
                items.push(item.serialize(&Appstruct::Null));
            }
        }

        let oid = ctx.oid();
        let mut html = format!(
            r#"<div class="card mb-3" id="{oid}"><div class="card-header">{}</div><div class="card-body">"#,
            html_escape(&ctx.translate(&field.title))
        );
        if let Some(description) = &field.description {
            html.push_str(&format!(
                r#"<div class="form-text mb-2">{}</div>"#,
                html_escape(&ctx.translate(description))
            ));
        }
        html.push_str(&error_block(ctx));

        if !ctx.readonly() {
            html.push_str(&marker(START, &field.name, "sequence"));
        }
        html.push_str(&format!(r#"<div id="{oid}-items">"#));
        for (index, value) in items.iter().enumerate() {
            let inner = ctx.with_child(&index.to_string(), |ctx| render_field(item, value, ctx));
            html.push_str(&Self::render_item(&inner, ctx.readonly()));
        }
        html.push_str("</div>");

        if !ctx.readonly() {
            html.push_str(&marker(END, &field.name, "sequence"));

            let blank = item.serialize(&Appstruct::Null);
            let prototype = ctx.with_prototype(|ctx| render_field(item, &blank, ctx));
            html.push_str(&format!(
                r#"<template id="{oid}-prototype">{}</template>"#,
                Self::render_item(&prototype, false)
            ));

            let add_label = TranslationString::new("Add ${subitem_title}")
                .with("subitem_title", ctx.translate(&item.title));
            let max_attr = self
                .max_len
                .map(|max| format!(r#" data-max-len="{max}""#))
                .unwrap_or_default();
            html.push_str(&format!(
                r#"<button type="button" class="btn btn-sm btn-outline-secondary oxide-seq-add" data-prototype="{oid}-prototype" data-items="{oid}-items"{max_attr}>{}</button>"#,
                html_escape(&ctx.translate(&add_label))
            ));
        }

        html.push_str("</div></div>");
        html
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        let items = match pstruct {
            None | Some(Cstruct::Null) => &[][..],
            Some(Cstruct::Seq(items)) => items.as_slice(),
            Some(other) => return Ok(other.clone()),
        };

        if let Some(min) = self.min_len {
            if items.len() < min {
                return Err(
                    TranslationString::new("At least ${min_len} items required").with("min_len", min)
                );
            }
        }
        if let Some(max) = self.max_len {
            if items.len() > max {
                return Err(
                    TranslationString::new("At most ${max_len} items allowed").with("max_len", max)
                );
            }
        }
        Ok(Cstruct::Seq(items.to_vec()))
    }

    fn is_compound(&self) -> bool {
        true
    }
}

impl SequenceWidget {
    fn render_item(inner: &str, readonly: bool) -> String {
        if readonly {
            return format!(r#"<div class="oxide-seq-item mb-2">{inner}</div>"#);
        }
        format!(
            r#"<div class="oxide-seq-item d-flex gap-2 align-items-start mb-2"><div class="flex-grow-1">{inner}</div><button type="button" class="btn btn-sm btn-outline-danger oxide-seq-remove" title="Remove">&times;</button></div>"#
        )
    }
}

/// Two inputs that must hold the same value.
#[derive(Debug, Clone)]
pub struct CheckedInput {
    /// Label of the first input.
    pub subject: String,
    /// Label of the confirmation input.
    pub confirm_subject: String,
    /// Message reported when the inputs differ.
    pub mismatch_message: String,
    /// The HTML input type.
    pub input_type: String,
    /// Visible width in characters.
    pub size: Option<usize>,
}

impl Default for CheckedInput {
    fn default() -> Self {
        Self {
            subject: "Value".to_string(),
            confirm_subject: "Confirm Value".to_string(),
            mismatch_message: "Fields did not match".to_string(),
            input_type: "text".to_string(),
            size: None,
        }
    }
}

impl CheckedInput {
    /// Creates a checked text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checked password input. Values are never redisplayed.
    pub fn password() -> Self {
        Self {
            subject: "Password".to_string(),
            confirm_subject: "Confirm Password".to_string(),
            mismatch_message: "Password did not match confirm".to_string(),
            input_type: "password".to_string(),
            size: None,
        }
    }

    /// Sets the first label.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the confirmation label.
    #[must_use]
    pub fn confirm_subject(mut self, subject: impl Into<String>) -> Self {
        self.confirm_subject = subject.into();
        self
    }

    /// Sets the visible width.
    #[must_use]
    pub const fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    fn is_password(&self) -> bool {
        self.input_type == "password"
    }

    fn input(&self, id: &str, name: &str, label: &str, value: &str, class: &str) -> String {
        let size_attr = self
            .size
            .map(|s| format!(r#" size="{s}""#))
            .unwrap_or_default();
        format!(
            r#"<div class="mb-2"><label class="form-label small" for="{id}">{}</label><input type="{}" class="{class}" id="{id}" name="{}" value="{}"{size_attr}></div>"#,
            html_escape(label),
            self.input_type,
            html_escape(name),
            html_escape(value)
        )
    }
}

impl Widget for CheckedInput {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let confirm_name = format!("{}-confirm", field.name);
        let (value, confirm) = match cstruct {
            Cstruct::Str(s) => (s.as_str(), s.as_str()),
            Cstruct::Map(_) => (cstruct.str_at(&field.name), cstruct.str_at(&confirm_name)),
            _ => ("", ""),
        };
        let (value, confirm) = if self.is_password() {
            ("", "")
        } else {
            (value, confirm)
        };

        if ctx.readonly() {
            return plaintext(ctx, value);
        }

        let oid = ctx.oid();
        let class = ctx.input_class("form-control");
        let subject = ctx.translate(&TranslationString::new(self.subject.as_str()));
        let confirm_subject = ctx.translate(&TranslationString::new(self.confirm_subject.as_str()));

        let mut html = marker(START, &field.name, "mapping");
        html.push_str(&self.input(&oid, &field.name, &subject, value, &class));
        html.push_str(&self.input(
            &format!("{oid}-confirm"),
            &confirm_name,
            &confirm_subject,
            confirm,
            &class,
        ));
        html.push_str(&marker(END, &field.name, "mapping"));
        html
    }

    fn deserialize(
        &self,
        field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        let Some(submitted @ Cstruct::Map(_)) = pstruct else {
            return match pstruct {
                None | Some(Cstruct::Null) => Ok(Cstruct::Null),
                Some(other) => Err(TranslationString::new("\"${val}\" is not a mapping type")
                    .with("val", other.describe())),
            };
        };

        let value = submitted.str_at(&field.name).trim();
        let confirm = submitted
            .str_at(&format!("{}-confirm", field.name))
            .trim();
        if value != confirm {
            return Err(TranslationString::new(self.mismatch_message.as_str()));
        }
        if value.is_empty() {
            Ok(Cstruct::Null)
        } else {
            Ok(Cstruct::Str(value.to_string()))
        }
    }
}

/// Separate year, month and day inputs for date nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateParts;

impl DateParts {
    fn parts(cstruct: &Cstruct) -> (String, String, String) {
        match cstruct {
            Cstruct::Str(s) => {
                let mut parts = s.splitn(3, '-').map(str::to_string);
                (
                    parts.next().unwrap_or_default(),
                    parts.next().unwrap_or_default(),
                    parts.next().unwrap_or_default(),
                )
            }
            Cstruct::Map(_) => (
                cstruct.str_at("year").to_string(),
                cstruct.str_at("month").to_string(),
                cstruct.str_at("day").to_string(),
            ),
            _ => (String::new(), String::new(), String::new()),
        }
    }
}

impl Widget for DateParts {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        if ctx.readonly() {
            return plaintext(ctx, cstruct.as_str().unwrap_or(""));
        }

        let (year, month, day) = Self::parts(cstruct);
        let oid = ctx.oid();
        let class = ctx.input_class("form-control");
        let part = |name: &str, placeholder: &str, value: &str, size: usize| {
            format!(
                r#"<div class="col-auto"><input type="text" class="{class}" id="{oid}-{name}" name="{name}" value="{}" size="{size}" maxlength="{size}" placeholder="{}"></div>"#,
                html_escape(value),
                html_escape(&ctx.translate(&TranslationString::new(placeholder)))
            )
        };

        let mut html = marker(START, &field.name, "mapping");
        html.push_str(r#"<div class="row g-2">"#);
        html.push_str(&part("year", "Year", &year, 4));
        html.push_str(&part("month", "Month", &month, 2));
        html.push_str(&part("day", "Day", &day, 2));
        html.push_str("</div>");
        html.push_str(&marker(END, &field.name, "mapping"));
        html
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        let Some(submitted @ Cstruct::Map(_)) = pstruct else {
            return match pstruct {
                None | Some(Cstruct::Null) => Ok(Cstruct::Null),
                Some(other) => Err(TranslationString::new("\"${val}\" is not a mapping type")
                    .with("val", other.describe())),
            };
        };

        let year = submitted.str_at("year").trim();
        let month = submitted.str_at("month").trim();
        let day = submitted.str_at("day").trim();

        match (year.is_empty(), month.is_empty(), day.is_empty()) {
            (true, true, true) => Ok(Cstruct::Null),
            (false, false, false) => Ok(Cstruct::Str(format!("{year}-{month:0>2}-{day:0>2}"))),
            _ => Err(TranslationString::new("Incomplete date")),
        }
    }
}
