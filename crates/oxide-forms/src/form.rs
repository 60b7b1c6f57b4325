//! Forms: a schema plus buttons, rendered with Bootstrap 5 styling.

use std::sync::Arc;

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::{Div, Li, Ul};

use crate::controls::{self, Control};
use crate::error::{FormError, Result, ValidationErrors};
use crate::i18n::{NullTranslator, TranslationString, Translator};
use crate::schema::{Field, SchemaType};
use crate::value::{Appstruct, Cstruct};
use crate::widgets::{html_escape, RenderContext};

/// A form that can be rendered and validated against submitted controls.
pub trait SubmittableForm {
    /// Failure produced by [`SubmittableForm::validate`].
    type Failure<'a>: RenderFailure
    where
        Self: 'a;

    /// Renders the form, prefilled from `appstruct`.
    fn render(&self, appstruct: Option<&Appstruct>, readonly: bool) -> String;

    /// Validates submitted controls in submission order.
    fn validate<'a>(
        &'a self,
        controls: &[(String, Control)],
    ) -> std::result::Result<Appstruct, Self::Failure<'a>>;
}

/// A validation failure that can re-render its form with errors.
pub trait RenderFailure {
    /// Renders the submitted values with inline errors.
    fn render(&self) -> String;
}

/// A submit button.
#[derive(Debug, Clone)]
pub struct Button {
    /// Control name; also the submission marker.
    pub name: String,
    /// Label.
    pub title: TranslationString,
}

impl Button {
    /// Creates a button titled after its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut chars = name.chars();
        let title = chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        });
        Self {
            name,
            title: TranslationString::new(title),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn title(mut self, title: impl Into<TranslationString>) -> Self {
        self.title = title.into();
        self
    }
}

/// Renders one schema node with its label, errors and description.
pub fn render_field(field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
    let widget_html = field.widget.render(field, cstruct, ctx);
    if field.widget.is_hidden() || field.widget.is_compound() {
        return widget_html;
    }

    let id = ctx.oid();
    let required_marker = if field.is_required() && !ctx.readonly() {
        " *"
    } else {
        ""
    };
    let label_text = format!("{}{required_marker}", ctx.translate(&field.title));
    let errors = ctx.errors();
    let help_text = field.description.as_ref().map(|d| ctx.translate(d));

    let label_el = html! {
        label.for_(#id).class("form-label") { #label_text }
    };

    html! { div.class("mb-3") }
        .raw(label_el.render())
        .raw(&widget_html)
        .children(&errors, |error, div: Element<Div>| {
            div.class("invalid-feedback d-block").text(error)
        })
        .when(help_text.is_some(), |d| {
            d.child::<Div, _>(|h| h.class("form-text").text(help_text.as_deref().unwrap_or("")))
        })
        .render()
}

/// A form built from a mapping schema.
pub struct Form {
    schema: Field,
    buttons: Vec<Button>,
    action: String,
    formid: String,
    translator: Arc<dyn Translator>,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("schema", &self.schema)
            .field("buttons", &self.buttons)
            .field("action", &self.action)
            .field("formid", &self.formid)
            .finish_non_exhaustive()
    }
}

impl Form {
    /// Creates a form. The schema must be a mapping.
    pub fn new(schema: Field) -> Result<Self> {
        if schema.typ != SchemaType::Mapping {
            return Err(FormError::NotAMapping(format!("{:?}", schema.typ)));
        }
        Ok(Self {
            schema,
            buttons: Vec::new(),
            action: String::new(),
            formid: "deform".to_string(),
            translator: Arc::new(NullTranslator),
        })
    }

    /// Adds a button.
    #[must_use]
    pub fn button(mut self, button: impl Into<Button>) -> Self {
        self.buttons.push(button.into());
        self
    }

    /// Sets the form action URL.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Sets the form id, submitted as `__formid__`.
    #[must_use]
    pub fn formid(mut self, formid: impl Into<String>) -> Self {
        self.formid = formid.into();
        self
    }

    /// Sets the translator used for all rendered text.
    #[must_use]
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// The root schema node.
    pub const fn schema(&self) -> &Field {
        &self.schema
    }

    /// The form's buttons.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Looks up a node by dotted path, e.g. `uploads.upload`.
    pub fn field_mut(&mut self, path: &str) -> Result<&mut Field> {
        self.schema.find_mut(path)
    }

    fn render_cstruct(&self, cstruct: &Cstruct, errors: Option<&ValidationErrors>, readonly: bool) -> String {
        let ctx = RenderContext::new(self.translator.as_ref(), errors, readonly);
        let fields: String = self
            .schema
            .children
            .iter()
            .map(|child| {
                let sub = cstruct.get(&child.name).unwrap_or(&Cstruct::Null);
                ctx.with_child(&child.name, |ctx| render_field(child, sub, ctx))
            })
            .collect();

        if readonly {
            let id = self.formid.as_str();
            return html! { div.class("oxide-form-readonly") }
                .id(id)
                .raw(&fields)
                .render();
        }

        let banner = errors.map(|e| self.render_banner(e)).unwrap_or_default();
        let action = self.action.as_str();
        let id = self.formid.as_str();

        let mut form = html! {
            form.action(#action).method("POST")
        }
        .id(id)
        .attr("enctype", "multipart/form-data");
        form = form.child::<Div, _>(|d| {
            d.raw(format!(
                r#"<input type="hidden" name="_charset_"><input type="hidden" name="__formid__" value="{}">"#,
                html_escape(id)
            ))
        });
        if !banner.is_empty() {
            form = form.child::<Div, _>(|d| d.raw(&banner));
        }
        form = form.child::<Div, _>(|d| d.class("oxide-fields").raw(&fields));

        let buttons: String = self
            .buttons
            .iter()
            .map(|b| {
                format!(
                    r#"<button type="submit" class="btn btn-primary me-2" name="{name}" value="{name}">{}</button>"#,
                    html_escape(&self.translator.translate(&b.title)),
                    name = html_escape(&b.name)
                )
            })
            .collect();
        form = form.child::<Div, _>(|d| d.class("mt-3").raw(&buttons));

        form.render()
    }

    fn render_banner(&self, errors: &ValidationErrors) -> String {
        let t = |msg: &str| self.translator.translate(&TranslationString::new(msg));
        let heading = t("There was a problem with your submission");
        let detail = t("Errors have been highlighted below");
        let form_errors: Vec<String> = errors
            .form_errors()
            .iter()
            .map(|e| self.translator.translate(e))
            .collect();

        html! { div.class("alert alert-danger") }
            .attr("role", "alert")
            .child::<Div, _>(|d| d.class("fw-semibold").text(&heading))
            .child::<Div, _>(|d| d.text(&detail))
            .when(!form_errors.is_empty(), |d| {
                d.child::<Ul, _>(|ul| {
                    ul.class("mb-0 mt-2")
                        .children(form_errors.iter(), |e, li: Element<Li>| li.text(e))
                })
            })
            .render()
    }

    /// Renders the form, prefilled from `appstruct` (or the schema
    /// defaults).
    pub fn render(&self, appstruct: Option<&Appstruct>, readonly: bool) -> String {
        let cstruct = self.schema.serialize(appstruct.unwrap_or(&Appstruct::Null));
        self.render_cstruct(&cstruct, None, readonly)
    }

    /// Validates submitted controls.
    pub fn validate(
        &self,
        controls: &[(String, Control)],
    ) -> std::result::Result<Appstruct, ValidationFailure<'_>> {
        let pstruct = controls::parse(controls);
        let mut errors = ValidationErrors::new();
        let result = self.schema.deserialize(Some(&pstruct), "", &mut errors);

        match result.appstruct {
            Some(appstruct) if errors.is_empty() => Ok(appstruct),
            _ => Err(ValidationFailure {
                form: self,
                cstruct: result.cstruct,
                errors,
            }),
        }
    }
}

impl From<&str> for Button {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Failed validation of a [`Form`].
#[derive(Debug)]
pub struct ValidationFailure<'a> {
    form: &'a Form,
    cstruct: Cstruct,
    errors: ValidationErrors,
}

impl ValidationFailure<'_> {
    /// Errors keyed by field path.
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The submitted state as it will be re-rendered.
    pub const fn cstruct(&self) -> &Cstruct {
        &self.cstruct
    }

    /// Renders the submitted values with the error banner and inline
    /// messages.
    pub fn render(&self) -> String {
        self.form.render_cstruct(&self.cstruct, Some(&self.errors), false)
    }
}

impl std::fmt::Display for ValidationFailure<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.errors)
    }
}

impl RenderFailure for ValidationFailure<'_> {
    fn render(&self) -> String {
        ValidationFailure::render(self)
    }
}

impl SubmittableForm for Form {
    type Failure<'a> = ValidationFailure<'a>;

    fn render(&self, appstruct: Option<&Appstruct>, readonly: bool) -> String {
        Form::render(self, appstruct, readonly)
    }

    fn validate<'a>(
        &'a self,
        controls: &[(String, Control)],
    ) -> std::result::Result<Appstruct, ValidationFailure<'a>> {
        Form::validate(self, controls)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::controls::text_controls;
    use crate::i18n::Catalog;
    use crate::validation::{Function, Length, Range};
    use crate::error::Invalid;

    fn text_form() -> Form {
        Form::new(Field::schema([Field::string("text")
            .validator(Length::max(100))
            .description("Enter some text")]))
        .unwrap()
        .button("submit")
    }

    #[test]
    fn test_new_rejects_leaf_schema() {
        assert!(matches!(
            Form::new(Field::string("text")),
            Err(FormError::NotAMapping(_))
        ));
    }

    #[test]
    fn test_render_fresh() {
        let html = text_form().render(None, false);
        assert!(html.contains("<form"));
        assert!(html.contains(r#"name="__formid__" value="deform""#));
        assert!(html.contains(r#"name="submit""#));
        assert!(html.contains("Enter some text"));
        assert!(html.contains("Text *"));
        assert!(!html.contains("is-invalid"));
        assert!(!html.contains("There was a problem"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let form = text_form();
        let value = Appstruct::mapping([("text", "preset")]);
        assert_eq!(form.render(Some(&value), true), form.render(Some(&value), true));
    }

    #[test]
    fn test_render_readonly() {
        let html = text_form().render(Some(&Appstruct::mapping([("text", "preset")])), true);
        assert!(!html.contains("<form"));
        assert!(!html.contains("<input"));
        assert!(!html.contains("<button"));
        assert!(html.contains("preset"));
    }

    #[test]
    fn test_validate_success() {
        let form = text_form();
        let controls = text_controls([("text", "hello"), ("submit", "submit")]);
        let appstruct = form.validate(&controls).unwrap();
        assert_eq!(appstruct, Appstruct::mapping([("text", "hello")]));
    }

    #[test]
    fn test_validate_failure_renders_errors() {
        let form = text_form();
        let long = "x".repeat(101);
        let controls = text_controls([("text", long.as_str()), ("submit", "submit")]);
        let failure = form.validate(&controls).unwrap_err();
        assert_eq!(failure.errors().len(), 1);

        let html = failure.render();
        assert!(html.contains("There was a problem with your submission"));
        assert!(html.contains("Longer than maximum length 100"));
        assert!(html.contains("is-invalid"));
        assert!(html.contains(&long));
    }

    #[test]
    fn test_banner_fields_and_buttons_stay_inside_form() {
        let form = text_form();
        let long = "x".repeat(101);
        let controls = text_controls([("text", long.as_str()), ("submit", "submit")]);
        let html = form.validate(&controls).unwrap_err().render();

        let open = html.find("<form").unwrap();
        let banner = html.find(r#"<div><div class="alert alert-danger""#).unwrap();
        let fields = html.find(r#"<div class="oxide-fields">"#).unwrap();
        let buttons = html.find(r#"<div class="mt-3"><button"#).unwrap();
        let close = html.rfind("</form>").unwrap();
        assert!(open < banner && banner < fields && fields < buttons && buttons < close);

        let fresh = form.render(None, false);
        assert!(!fresh.contains("alert-danger"));
        assert!(fresh.find(r#"<div class="oxide-fields">"#).unwrap() < fresh.rfind("</form>").unwrap());
    }

    #[test]
    fn test_form_level_errors_in_banner() {
        let schema = Field::schema([Field::string("name"), Field::string("title")]).validator(
            Function(|value: &Appstruct| {
                let name = value.get("name").and_then(Appstruct::as_str).unwrap_or("");
                let title = value.get("title").and_then(Appstruct::as_str).unwrap_or("");
                if title.starts_with(name) {
                    Ok(())
                } else {
                    Err(Invalid::new("Title must start with name")
                        .child("title", format!("Must start with name {name}")))
                }
            }),
        );
        let form = Form::new(schema).unwrap().button("submit");
        let controls = text_controls([("name", "foo"), ("title", "bar"), ("submit", "submit")]);
        let failure = form.validate(&controls).unwrap_err();
        assert_eq!(failure.errors().form_errors().len(), 1);
        let html = failure.render();
        assert!(html.contains("Title must start with name"));
        assert!(html.contains("Must start with name foo"));
    }

    #[test]
    fn test_edit_prefill_with_partial_appstruct() {
        let form = Form::new(Field::schema([
            Field::integer("number"),
            Field::mapping("mapping", [Field::string("name"), Field::date("date")]),
        ]))
        .unwrap();
        let appstruct = Appstruct::mapping([
            ("number", Appstruct::Int(42)),
            (
                "mapping",
                Appstruct::mapping([("date", NaiveDate::from_ymd_opt(2010, 4, 9).unwrap())]),
            ),
        ]);
        let html = form.render(Some(&appstruct), false);
        assert!(html.contains(r#"value="42""#));
        assert!(html.contains(r#"value="2010-04-09""#));
    }

    #[test]
    fn test_translated_render() {
        let catalog = Catalog::new("fr")
            .message("A number between ${min} and ${max}", "Un nombre entre ${min} et ${max}")
            .message("Submit", "Soumettre");
        let form = Form::new(Field::schema([Field::integer("number")
            .title(
                TranslationString::new("A number between ${min} and ${max}")
                    .with("min", 1)
                    .with("max", 10),
            )
            .validator(Range::int(1, 10))]))
        .unwrap()
        .button(Button::new("submit").title("Submit"))
        .translator(Arc::new(catalog));
        let html = form.render(None, false);
        assert!(html.contains("Un nombre entre 1 et 10"));
        assert!(html.contains("Soumettre"));
    }

    #[test]
    fn test_field_mut() {
        let mut form = Form::new(Field::schema([Field::string("text")])).unwrap();
        assert!(form.field_mut("text").is_ok());
        assert!(matches!(form.field_mut("missing"), Err(FormError::UnknownField(_))));
    }

    #[test]
    fn test_button_title_from_name() {
        assert_eq!(Button::new("submit").title.to_string(), "Submit");
    }
}
