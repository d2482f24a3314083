//! The stage abstraction and the closed set of stage kinds.

use super::conditional::ConditionalBranching;
use super::context::PipelineContext;
use super::cycle::TextCycleSelection;
use super::knob_weight::KnobWeightAnnotation;
use super::substitute::VariableSubstitution;
use super::text_variable::TextVariableResolution;
use super::weighted::WeightedCombination;

/// One text transformation step.
///
/// # Contract
///
/// - **Total**: never fails; unresolved references degrade to a fallback.
/// - **Pure**: output depends only on `input` and the context's current state.
/// - May mutate `ctx.variables`; later stages of the same run observe it.
pub trait TextStage {
    /// Stable identifier, matching the request `type` that builds the stage.
    fn name(&self) -> &'static str;

    /// Transform `input`.
    fn process(&self, input: &str, ctx: &mut PipelineContext) -> String;
}

/// Every stage kind the pipeline can run.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    TextVariables(TextVariableResolution),
    Substitute(VariableSubstitution),
    KnobWeights(KnobWeightAnnotation),
    Cycle(TextCycleSelection),
    Conditional(ConditionalBranching),
    Weighted(WeightedCombination),
}

impl Stage {
    fn inner(&self) -> &dyn TextStage {
        match self {
            Stage::TextVariables(s) => s,
            Stage::Substitute(s) => s,
            Stage::KnobWeights(s) => s,
            Stage::Cycle(s) => s,
            Stage::Conditional(s) => s,
            Stage::Weighted(s) => s,
        }
    }
}

impl TextStage for Stage {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn process(&self, input: &str, ctx: &mut PipelineContext) -> String {
        self.inner().process(input, ctx)
    }
}

impl From<TextVariableResolution> for Stage {
    fn from(s: TextVariableResolution) -> Self {
        Stage::TextVariables(s)
    }
}

impl From<VariableSubstitution> for Stage {
    fn from(s: VariableSubstitution) -> Self {
        Stage::Substitute(s)
    }
}

impl From<KnobWeightAnnotation> for Stage {
    fn from(s: KnobWeightAnnotation) -> Self {
        Stage::KnobWeights(s)
    }
}

impl From<TextCycleSelection> for Stage {
    fn from(s: TextCycleSelection) -> Self {
        Stage::Cycle(s)
    }
}

impl From<ConditionalBranching> for Stage {
    fn from(s: ConditionalBranching) -> Self {
        Stage::Conditional(s)
    }
}

impl From<WeightedCombination> for Stage {
    fn from(s: WeightedCombination) -> Self {
        Stage::Weighted(s)
    }
}
