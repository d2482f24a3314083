//! Prompt templating engine.
//!
//! A [`Pipeline`] threads a template through an ordered list of stages that
//! share one [`PipelineContext`] per run:
//!
//! - **Text variables**: knob-linked option lists collapse to one option
//! - **Substitution**: `{name}` and `{{name}}` placeholders
//! - **Knob weights**: `[content:knob_id(:mode)?]` becomes `(content:weight)`
//! - **Cycles**: `{cycle:knob_id:a,b,c}` picks one option
//! - **Conditionals**: `{if:condition:true_text|false_text}`
//! - **Weighted combination**: joins configured segments with weights
//!
//! # Example
//!
//! ```text
//! template:  a {style} car, [neon:1:B], {if:night:dark sky|daylight}
//! knobs:     1 = {value: 100, label: "style"}
//! variables: style = "red, blue, green", night = true
//! result:    a green car, (neon:10), dark sky
//! ```

mod condition;
mod conditional;
mod context;
mod cycle;
mod knob;
mod knob_weight;
mod pipeline;
mod stage;
mod substitute;
mod text_variable;
mod value;
mod weighted;


pub use condition::{CompareOp, Condition, coerce_literal};
pub use conditional::ConditionalBranching;
pub use context::{Diagnostic, DiagnosticKind, PipelineContext};
pub use cycle::TextCycleSelection;
pub use knob::{KnobAttrs, KnobMap, WeightMode, controlling_knob, format_weight};
pub use knob_weight::KnobWeightAnnotation;
pub use pipeline::{Pipeline, Rendered, StageConfig};
pub use stage::{Stage, TextStage};
pub use substitute::{VariableSubstitution, replace_placeholder, substitute_all};
pub use text_variable::TextVariableResolution;
pub use value::{
    Scalar, VarValue, Variables, format_float, split_options, variables_from_json, vars,
};
pub use weighted::WeightedCombination;
