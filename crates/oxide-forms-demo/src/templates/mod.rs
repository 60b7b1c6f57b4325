//! HTML templates for the demo pages.

pub mod base;
pub mod pages;

pub use base::{render_base, PageContext};
pub use pages::{render_code, render_demo, render_index, LocaleLinks};
