//! Saved prompt templates.
//!
//! A template bundles knob settings, variable values, and prompt text under a
//! human-readable name. Each template is one pretty-printed JSON file named
//! after [`safe_filename`] of the template name.

mod model;
mod store;


pub use model::{Template, TemplateSummary};
pub use store::{TemplateStore, safe_filename};
