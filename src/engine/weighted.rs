//! Weighted Combination: joins configured segments into `(segment:weight)` form.

use super::context::PipelineContext;
use super::stage::TextStage;
use super::value::format_float;
use crate::error::{KnobError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCombination {
    segments: Vec<String>,
    weights: Vec<f64>,
}

impl WeightedCombination {
    /// Build the stage. `segments` and `weights` must have equal length.
    pub fn new(segments: Vec<String>, weights: Vec<f64>) -> Result<Self> {
        if segments.len() != weights.len() {
            return Err(KnobError::ConfigurationError(format!(
                "number of segments must match number of weights ({} segments, {} weights)",
                segments.len(),
                weights.len()
            )));
        }
        Ok(Self { segments, weights })
    }

    /// The combined string. Independent of any input text.
    pub fn combine(&self) -> String {
        self.segments
            .iter()
            .zip(&self.weights)
            .map(|(segment, &weight)| {
                if weight == 1.0 {
                    segment.clone()
                } else {
                    format!("({}:{})", segment, format_float(weight))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TextStage for WeightedCombination {
    fn name(&self) -> &'static str {
        "weighted_combination"
    }

    fn process(&self, _input: &str, _ctx: &mut PipelineContext) -> String {
        self.combine()
    }
}
