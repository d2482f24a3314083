//! Text Cycle Selection: `{cycle:knob_id:opt1,opt2,...}` picks one option by
//! knob position.

use super::context::PipelineContext;
use super::stage::TextStage;
use super::value::split_options;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static CYCLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{cycle:([0-9]+):(.*?)\}").expect("cycle pattern is valid"));

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextCycleSelection;

impl TextStage for TextCycleSelection {
    fn name(&self) -> &'static str {
        "text_cycle"
    }

    fn process(&self, input: &str, ctx: &mut PipelineContext) -> String {
        CYCLE_PATTERN
            .replace_all(input, |caps: &Captures| {
                let options = split_options(&caps[2]);
                if options.is_empty() {
                    return String::new();
                }
                let knob = caps[1]
                    .parse::<u32>()
                    .ok()
                    .and_then(|id| ctx.knobs.get(&id));
                let index = knob.map_or(0, |knob| knob.option_index(options.len()));
                options[index].clone()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::knob::{KnobAttrs, KnobMap};

    fn run(text: &str, knobs: &[(u32, KnobAttrs)]) -> String {
        let knobs: KnobMap = knobs.iter().cloned().collect();
        let mut ctx = PipelineContext::new(knobs, Default::default());
        TextCycleSelection.process(text, &mut ctx)
    }

    #[test]
    fn test_selects_by_knob_position() {
        assert_eq!(run("{cycle:1:a,b,c}", &[(1, KnobAttrs::at(0.0))]), "a");
        assert_eq!(run("{cycle:1:a,b,c}", &[(1, KnobAttrs::at(50.0))]), "b");
        assert_eq!(run("{cycle:1:a,b,c}", &[(1, KnobAttrs::at(99.0))]), "c");
        assert_eq!(run("{cycle:1:a,b,c}", &[(1, KnobAttrs::at(100.0))]), "c");
    }

    #[test]
    fn test_unknown_knob_selects_first_option() {
        assert_eq!(run("{cycle:8:a,b,c}", &[(1, KnobAttrs::at(100.0))]), "a");
    }

    #[test]
    fn test_options_are_trimmed() {
        assert_eq!(
            run("in {cycle:1: oil paint , watercolor } style", &[(1, KnobAttrs::at(80.0))]),
            "in watercolor style"
        );
    }

    #[test]
    fn test_empty_option_list() {
        assert_eq!(run("[{cycle:1:}]", &[(1, KnobAttrs::at(80.0))]), "[]");
    }

    #[test]
    fn test_multiple_cycles_share_knob() {
        let knobs = [(2, KnobAttrs::at(10.0).with_range(0.0, 20.0))];
        assert_eq!(run("{cycle:2:x,y} {cycle:2:p,q,r,s}", &knobs), "y r");
    }

    #[test]
    fn test_non_cycle_braces_untouched() {
        assert_eq!(run("{cycle:a:b} {cycles:1:x}", &[]), "{cycle:a:b} {cycles:1:x}");
    }
}
