//! Pipeline composition.
//!
//! Two ways to build a pipeline:
//!
//! - [`Pipeline::realtime`]: the fixed order used for live knob rendering.
//! - [`Pipeline::from_configs`]: exactly the stages a request declares, in the
//!   declared order.

use super::conditional::ConditionalBranching;
use super::context::{Diagnostic, PipelineContext};
use super::cycle::TextCycleSelection;
use super::knob::KnobMap;
use super::knob_weight::KnobWeightAnnotation;
use super::stage::{Stage, TextStage};
use super::substitute::VariableSubstitution;
use super::text_variable::TextVariableResolution;
use super::value::{Variables, variables_from_json};
use super::weighted::WeightedCombination;
use crate::error::{KnobError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A request-declared stage: `{"type": "...", "params": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl StageConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: Value) -> Self {
        self.params.insert(key.to_string(), value);
        self
    }

    /// Build the stage, or `Ok(None)` for an unrecognised stage type.
    pub fn build(&self) -> Result<Option<Stage>> {
        let stage = match self.kind.as_str() {
            "variable_substitution" => match self.params.get("variables") {
                Some(v @ Value::Object(_)) => {
                    VariableSubstitution::with_bindings(variables_from_json(v)).into()
                }
                None | Some(Value::Null) => VariableSubstitution::shared().into(),
                Some(other) => {
                    return Err(KnobError::ConfigurationError(format!(
                        "variable_substitution: 'variables' must be an object, got {}",
                        other
                    )));
                }
            },
            "weighted_combination" => {
                let segments = self.string_list("segments")?;
                let weights = self.number_list("weights")?;
                WeightedCombination::new(segments, weights)?.into()
            }
            "text_variable" => TextVariableResolution.into(),
            "knob_weight" => KnobWeightAnnotation.into(),
            "text_cycle" => TextCycleSelection.into(),
            "conditional" => ConditionalBranching.into(),
            _ => return Ok(None),
        };
        Ok(Some(stage))
    }

    fn list_param(&self, key: &str) -> Result<&[Value]> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(KnobError::ConfigurationError(format!(
                "{}: '{}' must be a list, got {}",
                self.kind, key, other
            ))),
        }
    }

    fn string_list(&self, key: &str) -> Result<Vec<String>> {
        self.list_param(key)?
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(KnobError::ConfigurationError(format!(
                    "{}: '{}' entries must be strings, got {}",
                    self.kind, key, other
                ))),
            })
            .collect()
    }

    fn number_list(&self, key: &str) -> Result<Vec<f64>> {
        self.list_param(key)?
            .iter()
            .map(|item| {
                item.as_f64().ok_or_else(|| {
                    KnobError::ConfigurationError(format!(
                        "{}: '{}' entries must be numbers, got {}",
                        self.kind, key, item
                    ))
                })
            })
            .collect()
    }
}

/// Result of rendering a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    /// The variable environment after the run, including collapsed options.
    pub variables: Variables,
    pub diagnostics: Vec<Diagnostic>,
}

/// An ordered list of stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Text Variable Resolution, Variable Substitution, Knob Weight Annotation,
    /// Text Cycle Selection, Conditional Branching.
    pub fn realtime() -> Self {
        Self::new(vec![
            TextVariableResolution.into(),
            VariableSubstitution::shared().into(),
            KnobWeightAnnotation.into(),
            TextCycleSelection.into(),
            ConditionalBranching.into(),
        ])
    }

    /// Build the stages a request declares, in order.
    ///
    /// Unrecognised stage types are skipped. Any stage that fails to build
    /// fails the whole pipeline.
    pub fn from_configs(configs: &[StageConfig]) -> Result<Self> {
        let mut stages = Vec::with_capacity(configs.len());
        for config in configs {
            match config.build()? {
                Some(stage) => stages.push(stage),
                None => tracing::warn!(kind = %config.kind, "skipping unknown stage type"),
            }
        }
        Ok(Self::new(stages))
    }

    pub fn push(&mut self, stage: impl Into<Stage>) {
        self.stages.push(stage.into());
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Thread `input` through every stage in order.
    pub fn run(&self, input: &str, ctx: &mut PipelineContext) -> String {
        let mut text = input.to_string();
        for stage in &self.stages {
            let next = stage.process(&text, ctx);
            if next != text {
                tracing::debug!(stage = stage.name(), "stage rewrote text");
            }
            text = next;
        }
        text
    }

    /// Run on a fresh context built from snapshots of `knobs` and `variables`.
    pub fn render(&self, input: &str, knobs: &KnobMap, variables: &Variables) -> Rendered {
        let mut ctx = PipelineContext::new(knobs.clone(), variables.clone());
        let text = self.run(input, &mut ctx);
        Rendered {
            text,
            variables: ctx.variables,
            diagnostics: ctx.diagnostics,
        }
    }
}
