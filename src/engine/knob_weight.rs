//! Knob Weight Annotation: `[content:knob_id]` / `[content:knob_id:mode]`
//! becomes `(content:weight)` with the weight read off the knob.

use super::context::PipelineContext;
use super::knob::{WeightMode, format_weight};
use super::stage::TextStage;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static WEIGHT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(.*?):([0-9]+)(?::(A|B|C))?\]").expect("weight pattern is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KnobWeightAnnotation;

impl TextStage for KnobWeightAnnotation {
    fn name(&self) -> &'static str {
        "knob_weight"
    }

    fn process(&self, input: &str, ctx: &mut PipelineContext) -> String {
        WEIGHT_PATTERN
            .replace_all(input, |caps: &Captures| {
                let knob = caps[2]
                    .parse::<u32>()
                    .ok()
                    .and_then(|id| ctx.knobs.get(&id));
                let Some(knob) = knob else {
                    return caps[0].to_string();
                };
                let mode = caps
                    .get(3)
                    .and_then(|m| WeightMode::from_str(m.as_str()))
                    .unwrap_or_default();
                let weight = mode.weight(knob.normalized());
                format!("({}:{})", &caps[1], format_weight(weight))
            })
            .into_owned()
    }
}
