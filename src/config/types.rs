//! Default values for the Config struct.

pub(crate) fn default_templates_dir() -> String {
    "templates".to_string()
}

pub(crate) fn default_states_dir() -> String {
    "states".to_string()
}

pub(crate) fn default_state_file() -> String {
    "state.json".to_string()
}

pub(crate) fn default_knob_min() -> f64 {
    0.0
}

pub(crate) fn default_knob_max() -> f64 {
    100.0
}

pub(crate) fn default_knob_value() -> f64 {
    50.0
}

pub(crate) fn default_log_filter() -> String {
    "warn".to_string()
}
