//! State data structures.

use crate::config::Config;
use crate::engine::{KnobAttrs, WeightMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Modes accepted by [`AppState::switch_mode`].
pub const MODES: [&str; 4] = ["A", "B", "C", "D"];

fn default_min() -> f64 {
    0.0
}

fn default_max() -> f64 {
    100.0
}

fn default_mode() -> String {
    "A".to_string()
}

/// A physical or virtual control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knob {
    pub id: u32,
    pub value: f64,
    #[serde(default)]
    pub mode: WeightMode,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_min")]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    /// Locked knobs reject [`AppState::update_knob`].
    #[serde(default)]
    pub locked: bool,
}

impl Knob {
    /// A fresh knob using the workspace defaults and the label `Knob {id}`.
    pub fn new(id: u32, defaults: &KnobDefaults) -> Self {
        Self {
            id,
            value: defaults.value,
            mode: WeightMode::A,
            label: format!("Knob {}", id),
            min: defaults.min,
            max: defaults.max,
            variable_name: None,
            locked: false,
        }
    }

    /// The attributes a pipeline run sees for this knob.
    pub fn attrs(&self) -> KnobAttrs {
        KnobAttrs {
            value: self.value,
            min: self.min,
            max: self.max,
            mode: self.mode,
            label: (!self.label.is_empty()).then(|| self.label.clone()),
            variable_name: self.variable_name.clone(),
        }
    }
}

/// The prompt being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    #[serde(default)]
    pub negative_text: Option<String>,
    /// Free-form generation settings (steps, sampler, seed...).
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// One entry of a [`VariableGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupVariable {
    pub name: String,
    pub value: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl GroupVariable {
    /// A variable with the default weight of 1.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            weight: default_weight(),
        }
    }
}

/// A named, colour-coded collection of variables shown together in a UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableGroup {
    pub name: String,
    #[serde(default)]
    pub variables: Vec<GroupVariable>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub color: String,
}

impl VariableGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            locked: false,
            color: String::new(),
        }
    }
}

/// Values given to knobs created without explicit attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobDefaults {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl Default for KnobDefaults {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for KnobDefaults {
    fn from(config: &Config) -> Self {
        Self {
            min: config.default_knob_min,
            max: config.default_knob_max,
            value: config.default_knob_value,
        }
    }
}

/// The whole application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub knobs: BTreeMap<u32, Knob>,
    #[serde(default)]
    pub prompt: Option<Prompt>,
    #[serde(default)]
    pub variable_groups: BTreeMap<String, VariableGroup>,
    #[serde(default = "default_mode")]
    pub current_mode: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            knobs: BTreeMap::new(),
            prompt: None,
            variable_groups: BTreeMap::new(),
            current_mode: default_mode(),
        }
    }
}
