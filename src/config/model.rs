//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for a knobprompt workspace.
///
/// This struct represents the contents of `.knobprompt/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Storage layout (relative to the `.knobprompt/` directory)
    // =========================================================================
    /// Directory holding saved templates, one JSON file per template.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Directory holding named state snapshots.
    #[serde(default = "default_states_dir")]
    pub states_dir: String,

    /// The live application state file.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    // =========================================================================
    // Knob defaults (used when a knob is created without explicit values)
    // =========================================================================
    #[serde(default = "default_knob_min")]
    pub default_knob_min: f64,

    #[serde(default = "default_knob_max")]
    pub default_knob_max: f64,

    #[serde(default = "default_knob_value")]
    pub default_knob_value: f64,

    // =========================================================================
    // Logging
    // =========================================================================
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            states_dir: default_states_dir(),
            state_file: default_state_file(),
            default_knob_min: default_knob_min(),
            default_knob_max: default_knob_max(),
            default_knob_value: default_knob_value(),
            log_filter: default_log_filter(),
        }
    }
}
