//! Per-request state handed to every demo.

use std::sync::Arc;

use oxide_forms::{Control, Field, Form, TmpStore, Translator};

use crate::cycle::{FormSubmissionCycle, RenderOptions, RenderResult};
use crate::demos::Demo;
use crate::error::Result;
use crate::source;
use crate::tmpstore::MemoryTmpStore;

/// What a demo needs to build and run its form.
pub struct DemoContext<'a> {
    /// The demo being served.
    pub demo: &'a Demo,
    /// Submitted pairs, empty for a GET.
    pub controls: &'a [(String, Control)],
    /// Negotiated locale name.
    pub locale: &'a str,
    /// Translator for `locale`.
    pub translator: Arc<dyn Translator>,
    /// Shared upload store.
    pub tmpstore: Arc<MemoryTmpStore>,
}

impl std::fmt::Debug for DemoContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoContext")
            .field("demo", &self.demo.name)
            .field("controls", &self.controls.len())
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl<'a> DemoContext<'a> {
    /// A form posting back to this demo, translated for the request.
    pub fn form(&self, schema: Field) -> Result<Form> {
        Ok(Form::new(schema)?
            .action(format!("/{}/", self.demo.name))
            .translator(Arc::clone(&self.translator)))
    }

    /// The upload store as the form library sees it.
    pub fn store(&self) -> Arc<dyn TmpStore> {
        self.tmpstore.clone()
    }

    /// The cycle for this request, titled and with the demo's source.
    pub fn cycle(&self) -> FormSubmissionCycle<'a> {
        FormSubmissionCycle::new(self.controls)
            .title(self.demo.title)
            .snippet(source::locate(self.demo.name))
    }

    /// Shorthand for `self.cycle().render_form(form, options)`.
    pub fn render_form(&self, form: &Form, options: RenderOptions<'_>) -> Result<RenderResult> {
        self.cycle().render_form(form, options)
    }
}
