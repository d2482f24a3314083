//! Conditional Branching: `{if:condition:true_text|false_text}`.

use super::condition::{CompareOp, Condition};
use super::context::{Diagnostic, DiagnosticKind, PipelineContext};
use super::stage::TextStage;
use super::value::{Scalar, VarValue};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static IF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{if:(.*?):(.*?)\|(.*?)\}").expect("if pattern is valid"));

const STAGE_NAME: &str = "conditional";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConditionalBranching;

/// Outcome of evaluating one condition.
enum Verdict {
    Met(bool),
    /// Not met, with the diagnostic explaining why it could not be evaluated.
    Failed(DiagnosticKind),
}

fn evaluate(condition: &Condition, value: Option<&VarValue>) -> Verdict {
    let Some(value) = value else {
        return Verdict::Met(false);
    };

    match condition {
        Condition::Truthy { .. } => Verdict::Met(value.is_truthy()),
        Condition::Malformed { var, op_text } => Verdict::Failed(DiagnosticKind::UnknownOperator {
            variable: var.clone(),
            operator: op_text.clone(),
        }),
        Condition::Compare { var, op, literal } => {
            let left = value.comparable();
            let result = match &left {
                Some(left) => op.evaluate(left, literal),
                None => match op {
                    CompareOp::Eq => Some(false),
                    CompareOp::Ne => Some(true),
                    _ => None,
                },
            };
            match result {
                Some(met) => Verdict::Met(met),
                // NaN against a number: simply not met.
                None if left.as_ref().is_some_and(Scalar::is_numeric) && literal.is_numeric() => {
                    Verdict::Met(false)
                }
                None => Verdict::Failed(DiagnosticKind::IncomparableTypes {
                    variable: var.clone(),
                    operator: op.to_string(),
                    left: left
                        .as_ref()
                        .map_or("structured", Scalar::kind_name)
                        .to_string(),
                    right: literal.kind_name().to_string(),
                }),
            }
        }
    }
}

impl TextStage for ConditionalBranching {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn process(&self, input: &str, ctx: &mut PipelineContext) -> String {
        let mut failures = Vec::new();

        let output = IF_PATTERN
            .replace_all(input, |caps: &Captures| {
                let condition = Condition::parse(&caps[1]);
                let value = ctx.variables.get(condition.variable());
                let met = match evaluate(&condition, value) {
                    Verdict::Met(met) => met,
                    Verdict::Failed(kind) => {
                        failures.push(Diagnostic {
                            stage: STAGE_NAME,
                            occurrence: caps[0].to_string(),
                            kind,
                        });
                        false
                    }
                };
                if met {
                    caps[2].to_string()
                } else {
                    caps[3].to_string()
                }
            })
            .into_owned();

        for diagnostic in failures {
            ctx.record(diagnostic);
        }
        output
    }
}
