//! Per-run pipeline context: the knob snapshot, the variable environment, and
//! the diagnostics recorded while stages ran.

use super::knob::KnobMap;
use super::value::{VarValue, Variables};
use serde::Serialize;
use std::fmt;

/// What a stage recorded about a fallback it took.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An ordering comparison between values that cannot be ordered.
    IncomparableTypes {
        variable: String,
        operator: String,
        left: String,
        right: String,
    },
    /// A run of comparison characters that is not a supported operator.
    UnknownOperator { variable: String, operator: String },
}

/// A diagnostic attached to one pattern occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Name of the stage that recorded it.
    pub stage: &'static str,
    /// The matched occurrence text, e.g. `{if:x>a:yes|no}`.
    pub occurrence: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::IncomparableTypes {
                variable,
                operator,
                left,
                right,
            } => write!(
                f,
                "{}: cannot compare {} variable '{}' with {} using '{}' in {}",
                self.stage, left, variable, right, operator, self.occurrence
            ),
            DiagnosticKind::UnknownOperator { variable, operator } => write!(
                f,
                "{}: unknown operator '{}' for variable '{}' in {}",
                self.stage, operator, variable, self.occurrence
            ),
        }
    }
}

/// Shared state threaded through every stage of one pipeline run.
///
/// Build a fresh context per run; stages mutate `variables` in place and the
/// mutation is visible to every later stage of the same run.
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    pub knobs: KnobMap,
    pub variables: Variables,
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineContext {
    pub fn new(knobs: KnobMap, variables: Variables) -> Self {
        Self {
            knobs,
            variables,
            diagnostics: Vec::new(),
        }
    }

    /// Overwrite a variable's value.
    pub fn set_variable(&mut self, name: &str, value: VarValue) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(stage = diagnostic.stage, "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}
