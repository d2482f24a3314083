//! Knob attributes and the numeric mappings shared by the knob-driven stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Knob id to attributes, iterated in ascending id order.
pub type KnobMap = BTreeMap<u32, KnobAttrs>;

/// Weight curve applied by `[content:knob_id:mode]` annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeightMode {
    /// Linear, 0 to 2.
    #[default]
    A,
    /// Exponential, 0.1 to 10.
    B,
    /// Inverse linear, 2 to 0.
    C,
}

impl WeightMode {
    /// Parse a mode letter.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightMode::A => "A",
            WeightMode::B => "B",
            WeightMode::C => "C",
        }
    }

    /// Map a normalized knob position onto this mode's weight curve.
    pub fn weight(self, normalized: f64) -> f64 {
        match self {
            WeightMode::A => normalized * 2.0,
            WeightMode::B => 0.1 + normalized * normalized * 9.9,
            WeightMode::C => 2.0 - normalized * 2.0,
        }
    }
}

/// Attributes of one knob as seen by a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnobAttrs {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub mode: WeightMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
}

impl Default for KnobAttrs {
    fn default() -> Self {
        Self {
            value: 50.0,
            min: 0.0,
            max: 100.0,
            mode: WeightMode::A,
            label: None,
            variable_name: None,
        }
    }
}

impl KnobAttrs {
    /// A knob on the default 0..100 range at the given value.
    pub fn at(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable_name = Some(name.into());
        self
    }

    /// Position of the value within `[min, max]`, clamped to `[0, 1]`.
    ///
    /// A degenerate range (`max <= min`) normalizes to 0.5.
    pub fn normalized(&self) -> f64 {
        if self.max <= self.min {
            return 0.5;
        }
        let n = (self.value - self.min) / (self.max - self.min);
        if n.is_nan() { 0.5 } else { n.clamp(0.0, 1.0) }
    }

    /// Whether this knob controls the named variable, by link or by label.
    pub fn controls(&self, variable: &str) -> bool {
        self.variable_name.as_deref() == Some(variable) || self.label.as_deref() == Some(variable)
    }

    /// Pick one of `len` options from the knob position.
    ///
    /// `len` must be non-zero.
    pub fn option_index(&self, len: usize) -> usize {
        let idx = (self.normalized() * len as f64).floor() as usize;
        idx.min(len - 1)
    }
}

/// Format a weight to two decimals, dropping trailing zeros and a trailing point.
pub fn format_weight(weight: f64) -> String {
    let fixed = format!("{:.2}", weight);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Find the first knob (ascending id) controlling `variable`.
pub fn controlling_knob<'a>(knobs: &'a KnobMap, variable: &str) -> Option<(u32, &'a KnobAttrs)> {
    knobs
        .iter()
        .find(|(_, knob)| knob.controls(variable))
        .map(|(id, knob)| (*id, knob))
}
