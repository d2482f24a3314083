//! Text Variable Resolution: knob-linked option lists collapse to one option.
//!
//! A variable holding `"red, blue, green"` that is controlled by a knob (the
//! knob's `variable_name` or `label` equals the variable name) is resolved to a
//! single option. The selection is written back into the shared environment so
//! later stages see the scalar, not the list.

use super::context::PipelineContext;
use super::knob::controlling_knob;
use super::stage::TextStage;
use super::substitute::replace_placeholder;
use super::value::VarValue;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextVariableResolution;

impl TextStage for TextVariableResolution {
    fn name(&self) -> &'static str {
        "text_variable"
    }

    fn process(&self, input: &str, ctx: &mut PipelineContext) -> String {
        let mut result = input.to_string();
        let names: Vec<String> = ctx.variables.keys().cloned().collect();

        for name in names {
            let Some(value) = ctx.variables.get(&name) else {
                continue;
            };

            match value.options() {
                Some(options) => {
                    let Some((knob_id, knob)) = controlling_knob(&ctx.knobs, &name) else {
                        continue;
                    };
                    let selected = options[knob.option_index(options.len())].clone();
                    tracing::debug!(variable = %name, knob_id, selected = %selected, "resolved text variable");
                    result = replace_placeholder(&result, &name, &selected);
                    ctx.set_variable(&name, VarValue::literal(selected));
                }
                None => {
                    let rendered = value.render();
                    result = replace_placeholder(&result, &name, &rendered);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::knob::{KnobAttrs, KnobMap};
    use crate::engine::value::{Variables, vars};

    fn context(knobs: &[(u32, KnobAttrs)], variables: Variables) -> PipelineContext {
        let knobs: KnobMap = knobs.iter().cloned().collect();
        PipelineContext::new(knobs, variables)
    }

    #[test]
    fn test_label_linked_knob_selects_option() {
        let mut ctx = context(
            &[(1, KnobAttrs::at(50.0).with_label("style"))],
            vars([("style", "red, blue, green")]),
        );
        let out = TextVariableResolution.process("a {style} car", &mut ctx);
        assert_eq!(out, "a blue car");
        assert_eq!(ctx.variables["style"], VarValue::literal("blue"));
    }

    #[test]
    fn test_variable_name_link() {
        let mut ctx = context(
            &[(3, KnobAttrs::at(0.0).with_variable("style").with_label("Knob 3"))],
            vars([("style", "red, blue, green")]),
        );
        assert_eq!(TextVariableResolution.process("{{style}}", &mut ctx), "red");
    }

    #[test]
    fn test_uncontrolled_option_list_is_left_alone() {
        let mut ctx = context(&[(1, KnobAttrs::at(50.0))], vars([("style", "red, blue")]));
        assert_eq!(TextVariableResolution.process("{style}", &mut ctx), "{style}");
        assert!(ctx.variables["style"].options().is_some());
    }

    #[test]
    fn test_scalars_are_substituted() {
        let mut ctx = context(&[], vars([("subject", VarValue::from("fox")), ("n", VarValue::int(3))]));
        assert_eq!(
            TextVariableResolution.process("{n} {subject}s", &mut ctx),
            "3 foxs"
        );
    }

    #[test]
    fn test_collapsed_value_survives_without_placeholder() {
        let mut ctx = context(
            &[(1, KnobAttrs::at(100.0).with_label("mood"))],
            vars([("mood", "calm, stormy")]),
        );
        assert_eq!(TextVariableResolution.process("no placeholders", &mut ctx), "no placeholders");
        assert_eq!(ctx.variables["mood"], VarValue::literal("stormy"));
    }

    #[test]
    fn test_selected_option_with_comma_free_value_is_not_reparsed() {
        let mut ctx = context(
            &[(1, KnobAttrs::at(0.0).with_label("a"))],
            vars([("a", " x , y ")]),
        );
        TextVariableResolution.process("", &mut ctx);
        assert_eq!(ctx.variables["a"], VarValue::literal("x"));
    }
}
