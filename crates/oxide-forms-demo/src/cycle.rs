//! The display/submit/redisplay cycle shared by every demo.
//!
//! A request is classified once, before anything is rendered: either it
//! carries the submission marker and is validated, or it is a fresh
//! display of the (optionally prefilled) form.

use oxide_forms::{Appstruct, Control, RenderFailure, SubmittableForm};
use tracing::debug;

use crate::error::Result;
use crate::source::SourceSnippet;

/// Default name of the submit control.
pub const DEFAULT_MARKER: &str = "submit";

/// Callback run once a submission validates.
pub type SuccessCallback<'a> = Box<dyn FnOnce() -> Result<()> + 'a>;

/// How the current request relates to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission<'a> {
    /// No marker present: render the form.
    Display,
    /// Marker present: validate every submitted pair, in order.
    Attempt(&'a [(String, Control)]),
}

impl<'a> Submission<'a> {
    /// Classifies submitted pairs by the presence of `marker`.
    ///
    /// An empty marker never matches.
    pub fn classify(controls: &'a [(String, Control)], marker: &str) -> Self {
        if !marker.is_empty() && controls.iter().any(|(name, _)| name == marker) {
            Self::Attempt(controls)
        } else {
            Self::Display
        }
    }
}

/// Per-call options for [`process`].
pub struct RenderOptions<'a> {
    /// Prefill for the display path. Ignored when a submission is made.
    pub appstruct: Option<Appstruct>,
    /// Name of the control marking a submission.
    pub submitted: &'a str,
    /// Render read-only on the display path.
    pub readonly: bool,
    /// Called once after a successful validation.
    pub on_success: Option<SuccessCallback<'a>>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            appstruct: None,
            submitted: DEFAULT_MARKER,
            readonly: false,
            on_success: None,
        }
    }
}

impl std::fmt::Debug for RenderOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("appstruct", &self.appstruct)
            .field("submitted", &self.submitted)
            .field("readonly", &self.readonly)
            .field("on_success", &self.on_success.is_some())
            .finish()
    }
}

impl<'a> RenderOptions<'a> {
    /// Options with the defaults: no prefill, `submit` marker, editable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefill.
    #[must_use]
    pub fn appstruct(mut self, appstruct: Appstruct) -> Self {
        self.appstruct = Some(appstruct);
        self
    }

    /// Sets the submission marker.
    #[must_use]
    pub const fn submitted(mut self, marker: &'a str) -> Self {
        self.submitted = marker;
        self
    }

    /// Renders read-only on display.
    #[must_use]
    pub const fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Sets the success callback.
    #[must_use]
    pub fn on_success(mut self, callback: impl FnOnce() -> Result<()> + 'a) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }
}

/// Markup and captured value from one pass through the cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Rendered form markup.
    pub html: String,
    /// The validated structure, present only after a successful submission.
    pub captured: Option<Appstruct>,
}

/// Runs one display or submission against `form`.
///
/// Validation failures are not errors: they become a re-render carrying
/// inline messages. Only a failing success callback is returned as `Err`.
pub fn process<F: SubmittableForm>(
    form: &F,
    controls: &[(String, Control)],
    options: RenderOptions<'_>,
) -> Result<Outcome> {
    match Submission::classify(controls, options.submitted) {
        Submission::Attempt(pairs) => {
            debug!(pairs = pairs.len(), "Validating submission");
            match form.validate(pairs) {
                Ok(captured) => {
                    if let Some(callback) = options.on_success {
                        callback()?;
                    }
                    // The success render is always editable.
                    let html = form.render(Some(&captured), false);
                    debug!("Submission accepted");
                    Ok(Outcome {
                        html,
                        captured: Some(captured),
                    })
                }
                Err(failure) => {
                    debug!("Submission rejected");
                    Ok(Outcome {
                        html: failure.render(),
                        captured: None,
                    })
                }
            }
        }
        Submission::Display => {
            debug!(readonly = options.readonly, "Displaying form");
            Ok(Outcome {
                html: form.render(options.appstruct.as_ref(), options.readonly),
                captured: None,
            })
        }
    }
}

/// Everything a demo page needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    /// Rendered form markup.
    pub form: String,
    /// The validated structure, if a submission succeeded.
    pub captured: Option<Appstruct>,
    /// Demo title.
    pub title: String,
    /// Source of the demo, with its line bounds.
    pub snippet: Option<SourceSnippet>,
}

impl RenderResult {
    /// Text shown in the "Captured" panel: JSON, or `None`.
    pub fn captured_text(&self) -> String {
        self.captured
            .as_ref()
            .map_or_else(|| "None".to_string(), Appstruct::to_json)
    }
}

/// Request-scoped driver that packages [`process`] output with page
/// metadata.
#[derive(Debug, Clone)]
pub struct FormSubmissionCycle<'r> {
    controls: &'r [(String, Control)],
    title: String,
    snippet: Option<SourceSnippet>,
}

impl<'r> FormSubmissionCycle<'r> {
    /// Creates a cycle over the submitted pairs of one request.
    pub fn new(controls: &'r [(String, Control)]) -> Self {
        Self {
            controls,
            title: String::new(),
            snippet: None,
        }
    }

    /// Sets the page title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Attaches the source snippet of the calling demo.
    #[must_use]
    pub fn snippet(mut self, snippet: Option<SourceSnippet>) -> Self {
        self.snippet = snippet;
        self
    }

    /// Renders or validates `form` and packages the result.
    pub fn render_form<F: SubmittableForm>(
        &self,
        form: &F,
        options: RenderOptions<'_>,
    ) -> Result<RenderResult> {
        let outcome = process(form, self.controls, options)?;
        Ok(RenderResult {
            form: outcome.html,
            captured: outcome.captured,
            title: self.title.clone(),
            snippet: self.snippet.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use oxide_forms::validation::Length;
    use oxide_forms::{text_controls, Field, Form};

    use super::*;
    use crate::error::DemoError;

    /// Form double that records how it was driven.
    struct MockForm {
        accept: bool,
        renders: Cell<usize>,
        validations: Cell<usize>,
    }

    impl MockForm {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                renders: Cell::new(0),
                validations: Cell::new(0),
            }
        }
    }

    struct MockFailure;

    impl RenderFailure for MockFailure {
        fn render(&self) -> String {
            "<failure/>".to_string()
        }
    }

    impl SubmittableForm for MockForm {
        type Failure<'a> = MockFailure;

        fn render(&self, appstruct: Option<&Appstruct>, readonly: bool) -> String {
            self.renders.set(self.renders.get() + 1);
            let value = appstruct.map_or_else(|| "none".to_string(), Appstruct::to_json);
            format!("<form readonly={readonly}>{value}</form>")
        }

        fn validate<'a>(
            &'a self,
            controls: &[(String, Control)],
        ) -> std::result::Result<Appstruct, MockFailure> {
            self.validations.set(self.validations.get() + 1);
            if self.accept {
                let names: Vec<&str> = controls.iter().map(|(n, _)| n.as_str()).collect();
                Ok(Appstruct::sequence(names))
            } else {
                Err(MockFailure)
            }
        }
    }

    fn text_form() -> Form {
        Form::new(Field::schema([Field::string("text").validator(Length::max(100))]))
            .unwrap()
            .button("submit")
    }

    #[test]
    fn test_classify() {
        let controls = text_controls([("text", "x"), ("submit", "submit")]);
        assert_eq!(
            Submission::classify(&controls, "submit"),
            Submission::Attempt(&controls)
        );
        assert_eq!(Submission::classify(&controls, "save"), Submission::Display);
        assert_eq!(Submission::classify(&controls, ""), Submission::Display);
        assert_eq!(Submission::classify(&[], "submit"), Submission::Display);
    }

    #[test]
    fn test_display_is_idempotent() {
        let form = MockForm::new(true);
        let preset = Appstruct::mapping([("text", "preset")]);
        let called = Cell::new(0);

        let first = process(
            &form,
            &[],
            RenderOptions::new()
                .appstruct(preset.clone())
                .on_success(|| {
                    called.set(called.get() + 1);
                    Ok(())
                }),
        )
        .unwrap();
        let second = process(&form, &[], RenderOptions::new().appstruct(preset.clone())).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.html, form.render(Some(&preset), false));
        assert_eq!(first.captured, None);
        assert_eq!(form.validations.get(), 0);
        assert_eq!(called.get(), 0);
    }

    #[test]
    fn test_success_captures_and_calls_back_once() {
        let form = MockForm::new(true);
        let controls = text_controls([("text", "a"), ("text", "b"), ("submit", "submit")]);
        let called = Cell::new(0);

        let outcome = process(
            &form,
            &controls,
            RenderOptions::new().on_success(|| {
                called.set(called.get() + 1);
                Ok(())
            }),
        )
        .unwrap();

        let expected = Appstruct::sequence(["text", "text", "submit"]);
        assert_eq!(outcome.captured, Some(expected.clone()));
        assert_eq!(outcome.html, form.render(Some(&expected), false));
        assert_eq!(called.get(), 1);
    }

    #[test]
    fn test_success_render_ignores_readonly() {
        let form = MockForm::new(true);
        let controls = text_controls([("submit", "submit")]);

        let outcome = process(&form, &controls, RenderOptions::new().readonly(true)).unwrap();
        assert!(outcome.html.starts_with("<form readonly=false>"));
    }

    #[test]
    fn test_failure_uses_failure_render() {
        let form = MockForm::new(false);
        let controls = text_controls([("submit", "submit")]);
        let called = Cell::new(false);

        let outcome = process(
            &form,
            &controls,
            RenderOptions::new().on_success(|| {
                called.set(true);
                Ok(())
            }),
        )
        .unwrap();

        assert_eq!(outcome.html, "<failure/>");
        assert_eq!(outcome.captured, None);
        assert!(!called.get());
        assert_eq!(form.renders.get(), 0);
    }

    #[test]
    fn test_marker_wins_over_appstruct() {
        let form = MockForm::new(false);
        let controls = text_controls([("submit", "submit")]);

        let outcome = process(
            &form,
            &controls,
            RenderOptions::new().appstruct(Appstruct::mapping([("text", "preset")])),
        )
        .unwrap();
        assert_eq!(outcome.html, "<failure/>");
        assert_eq!(form.validations.get(), 1);
    }

    #[test]
    fn test_custom_marker() {
        let form = MockForm::new(true);
        let controls = text_controls([("submit", "submit")]);

        let outcome = process(&form, &controls, RenderOptions::new().submitted("save")).unwrap();
        assert_eq!(outcome.captured, None);
        assert_eq!(form.validations.get(), 0);
    }

    #[test]
    fn test_callback_error_propagates() {
        let form = MockForm::new(true);
        let controls = text_controls([("submit", "submit")]);

        let result = process(
            &form,
            &controls,
            RenderOptions::new().on_success(|| Err(DemoError::Callback("store offline".into()))),
        );
        assert!(matches!(result, Err(DemoError::Callback(_))));
    }

    #[test]
    fn test_scenario_accepts_short_text() {
        let form = text_form();
        let controls = text_controls([("submit", "submit"), ("text", "hello")]);

        let outcome = process(&form, &controls, RenderOptions::new()).unwrap();
        assert_eq!(outcome.captured, Some(Appstruct::mapping([("text", "hello")])));
        assert!(!outcome.html.contains("is-invalid"));
        assert!(!outcome.html.contains("There was a problem"));
    }

    #[test]
    fn test_scenario_rejects_long_text() {
        let form = text_form();
        let long = "x".repeat(101);
        let controls = text_controls([("submit", "submit"), ("text", long.as_str())]);
        let called = Cell::new(false);

        let outcome = process(
            &form,
            &controls,
            RenderOptions::new().on_success(|| {
                called.set(true);
                Ok(())
            }),
        )
        .unwrap();
        assert_eq!(outcome.captured, None);
        assert!(outcome.html.contains("Longer than maximum length 100"));
        assert!(outcome.html.contains("is-invalid"));
        assert!(!called.get());
    }

    #[test]
    fn test_scenario_readonly_display() {
        let form = text_form();
        let preset = Appstruct::mapping([("text", "preset")]);

        let outcome = process(
            &form,
            &[],
            RenderOptions::new().appstruct(preset.clone()).readonly(true),
        )
        .unwrap();
        assert_eq!(outcome.html, form.render(Some(&preset), true));
        assert_eq!(outcome.captured, None);
    }

    #[test]
    fn test_render_form_packages_metadata() {
        let form = text_form();
        let controls = text_controls([("submit", "submit"), ("text", "hello")]);
        let snippet = SourceSnippet {
            code: "fn textinput() {}".to_string(),
            start: 3,
            end: 4,
        };

        let result = FormSubmissionCycle::new(&controls)
            .title("Text Input Widget")
            .snippet(Some(snippet.clone()))
            .render_form(&form, RenderOptions::new())
            .unwrap();
        assert_eq!(result.title, "Text Input Widget");
        assert_eq!(result.snippet, Some(snippet));
        assert!(result.captured_text().contains(r#""text": "hello""#));
    }

    #[test]
    fn test_captured_text_none() {
        let form = text_form();
        let result = FormSubmissionCycle::new(&[])
            .render_form(&form, RenderOptions::new())
            .unwrap();
        assert_eq!(result.captured_text(), "None");
    }
}
