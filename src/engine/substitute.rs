//! `{name}` / `{{name}}` placeholder substitution.

use super::context::PipelineContext;
use super::stage::TextStage;
use super::value::Variables;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// `{{name}}` or `{name}`; the double-brace form wins where both start at the
/// same brace.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^{}]*)\}\}|\{([^{}]*)\}").expect("placeholder pattern is valid")
});

/// Replace placeholders in one left-to-right scan, asking `lookup` for each
/// name. Placeholders `lookup` declines are left verbatim, and substituted
/// values are never rescanned.
fn replace_with<'a, F>(text: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<Cow<'a, str>>,
{
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            match lookup(name) {
                Some(value) => value.into_owned(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Replace every `{{name}}` and `{name}` occurrence with `value`.
///
/// `{{x}}` becomes `value` rather than `{value}`. The name and value are taken
/// literally.
pub fn replace_placeholder(text: &str, name: &str, value: &str) -> String {
    if !text.contains(name) {
        return text.to_string();
    }
    replace_with(text, |found| (found == name).then_some(Cow::Borrowed(value)))
}

/// Replace placeholders for every variable in `variables`.
pub fn substitute_all(text: &str, variables: &Variables) -> String {
    if variables.is_empty() {
        return text.to_string();
    }
    replace_with(text, |name| {
        variables.get(name).map(|value| Cow::Owned(value.render()))
    })
}

/// Variable Substitution stage.
///
/// Reads the run's shared environment unless the stage was configured with its
/// own bindings (request-declared pipelines pass variables per stage).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableSubstitution {
    bindings: Option<Variables>,
}

impl VariableSubstitution {
    /// Substitute from the shared environment.
    pub fn shared() -> Self {
        Self { bindings: None }
    }

    /// Substitute from a private set of bindings.
    pub fn with_bindings(bindings: Variables) -> Self {
        Self {
            bindings: Some(bindings),
        }
    }
}

impl TextStage for VariableSubstitution {
    fn name(&self) -> &'static str {
        "variable_substitution"
    }

    fn process(&self, input: &str, ctx: &mut PipelineContext) -> String {
        match &self.bindings {
            Some(bindings) => substitute_all(input, bindings),
            None => substitute_all(input, &ctx.variables),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::value::{VarValue, vars};

    fn run(text: &str, variables: Variables) -> String {
        let mut ctx = PipelineContext::new(Default::default(), variables);
        VariableSubstitution::shared().process(text, &mut ctx)
    }

    #[test]
    fn test_simple_substitution() {
        let result = run("{greeting}, {name}!", vars([("name", "Alice"), ("greeting", "Hello")]));
        assert_eq!(result, "Hello, Alice!");
    }

    #[test]
    fn test_double_brace_form() {
        let result = run("a {{x}} b {x} c", vars([("x", "v")]));
        assert_eq!(result, "a v b v c");
    }

    #[test]
    fn test_triple_brace_keeps_outer_brace() {
        let result = run("{{{x}}}", vars([("x", "v")]));
        assert_eq!(result, "{v}");
    }

    #[test]
    fn test_unresolved_placeholder_left_verbatim() {
        let result = run("Hello {name} and {other}", vars([("name", "Bob")]));
        assert_eq!(result, "Hello Bob and {other}");
    }

    #[test]
    fn test_no_variables_is_identity() {
        assert_eq!(run("Just {plain} text", Variables::new()), "Just {plain} text");
    }

    #[test]
    fn test_multiple_occurrences() {
        assert_eq!(run("{x}-{x}-{x}", vars([("x", "X")])), "X-X-X");
    }

    #[test]
    fn test_adjacent_variables() {
        assert_eq!(run("{a}{b}", vars([("a", "A"), ("b", "B")])), "AB");
    }

    #[test]
    fn test_dollar_in_value_is_literal() {
        assert_eq!(run("cost {p}", vars([("p", "$1 ${x}")])), "cost $1 ${x}");
    }

    #[test]
    fn test_regex_metacharacters_in_name() {
        assert_eq!(run("{a.b} {a+b}", vars([("a.b", "dot"), ("a+b", "plus")])), "dot plus");
        assert_eq!(run("{axb}", vars([("a.b", "dot")])), "{axb}");
    }

    #[test]
    fn test_non_text_values() {
        let variables = vars([
            ("n", VarValue::int(10)),
            ("f", VarValue::float(2.0)),
            ("b", VarValue::bool(true)),
        ]);
        assert_eq!(run("{n} {f} {b}", variables), "10 2.0 true");
    }

    #[test]
    fn test_option_list_renders_raw() {
        assert_eq!(run("{s}", vars([("s", "red, blue")])), "red, blue");
    }

    #[test]
    fn test_private_bindings_ignore_shared_environment() {
        let stage = VariableSubstitution::with_bindings(vars([("x", "private")]));
        let mut ctx = PipelineContext::new(Default::default(), vars([("x", "shared"), ("y", "Y")]));
        assert_eq!(stage.process("{x} {y}", &mut ctx), "private {y}");
    }

    #[test]
    fn test_empty_value_substitution() {
        assert_eq!(run("before{empty}after", vars([("empty", "")])), "beforeafter");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let result = run("{a} {b}", vars([("a", "{b}"), ("b", "B")]));
        assert_eq!(result, "{b} B");
    }

    #[test]
    fn test_directives_are_not_placeholders() {
        let text = "{cycle:1:a,b} {if:x>1:y|n}";
        assert_eq!(run(text, vars([("x", "5")])), text);
    }

    #[test]
    fn test_replace_placeholder_single_name() {
        assert_eq!(replace_placeholder("{a} {{a}} {b}", "a", "A"), "A A {b}");
        assert_eq!(replace_placeholder("{ab}", "a", "A"), "{ab}");
    }

    #[test]
    fn test_unicode_in_template_and_values() {
        let result = run("Hello {emoji} {text}!", vars([("emoji", "🎉"), ("text", "日本語")]));
        assert_eq!(result, "Hello 🎉 日本語!");
    }
}
