//! Application state: the knobs, the current prompt, and the active mode.
//!
//! The state is a plain value owned by whichever adapter is running (a CLI
//! command or a session). It is persisted as pretty JSON through an atomic
//! write, and pipeline runs only ever see a snapshot of it (see
//! [`AppState::knob_snapshot`]).
//!
//! # On-disk format
//!
//! ```text
//! {
//!   "knobs": { "1": { "id": 1, "value": 50.0, "mode": "A", "label": "style", ... } },
//!   "prompt": { "text": "...", "negative_text": null, "settings": {} },
//!   "variable_groups": {},
//!   "current_mode": "A"
//! }
//! ```

mod io;
mod model;
mod operations;

#[cfg(test)]
mod tests;

pub use model::{AppState, GroupVariable, Knob, KnobDefaults, Prompt, VariableGroup, MODES};
pub use operations::link_variables;
