//! # oxide-forms
//!
//! Schema-driven form generation and validation with Bootstrap 5 widgets.
//!
//! This crate provides:
//! - Schema nodes with typed (de)serialization and validators
//! - Bootstrap 5 widgets, including compound widgets for mappings and
//!   sequences
//! - Decoding of flat submitted controls into nested structures
//! - Translatable messages
//! - A temporary store trait for uploads
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_forms::{text_controls, Appstruct, Field, Form};
//! use oxide_forms::validation::Length;
//!
//! let form = Form::new(Field::schema([
//!     Field::string("text")
//!         .validator(Length::max(100))
//!         .description("Enter some text"),
//! ]))
//! .unwrap()
//! .button("submit");
//!
//! let html = form.render(None, false);
//! assert!(html.contains("Enter some text"));
//!
//! let controls = text_controls([("text", "hello"), ("submit", "submit")]);
//! let captured = form.validate(&controls).unwrap();
//! assert_eq!(captured, Appstruct::mapping([("text", "hello")]));
//! ```
//!
//! ## Validation failures
//!
//! A failed validation keeps the submitted values and renders them back
//! with inline errors:
//!
//! ```rust
//! use oxide_forms::{text_controls, Field, Form};
//!
//! let form = Form::new(Field::schema([Field::integer("number")])).unwrap();
//! let controls = text_controls([("number", "abc")]);
//! let failure = form.validate(&controls).unwrap_err();
//! assert!(failure.render().contains("\"abc\" is not a number"));
//! ```
//!
//! ## Widgets
//!
//! Leaf widgets: `TextInput`, `Textarea`, `HiddenInput`, `Checkbox`,
//! `RadioChoice`, `Select`, `CheckboxChoice`. Compound widgets:
//! `CheckedInput`, `DateParts`, `FileUpload`, `MappingWidget`,
//! `SequenceWidget`.

pub mod controls;
mod error;
mod form;
pub mod i18n;
mod schema;
mod tmpstore;
pub mod validation;
mod value;
pub mod widgets;

pub use controls::{text_controls, Control};
pub use error::{FormError, Invalid, Result, ValidationErrors};
pub use form::{render_field, Button, Form, RenderFailure, SubmittableForm, ValidationFailure};
pub use i18n::{Catalog, NullTranslator, TranslationString, Translator};
pub use schema::{Field, SchemaType};
pub use tmpstore::TmpStore;
pub use value::{Appstruct, Cstruct, FileData, Upload};
