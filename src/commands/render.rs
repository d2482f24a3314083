//! Implementation of the `knobprompt render` command.

use super::load_live_state;
use crate::cli::RenderArgs;
use crate::context::WorkspaceContext;
use crate::engine::{KnobAttrs, Pipeline, Rendered, VarValue, Variables, variables_from_json};
use crate::error::{KnobError, Result};
use crate::state::KnobDefaults;
use serde_json::{Value, json};
use std::fs;

pub(super) fn cmd_render(ctx: &WorkspaceContext, args: RenderArgs) -> Result<()> {
    let rendered = render(ctx, &args)?;

    if args.json {
        super::print_json(&json!({
            "text": rendered.text,
            "variables": rendered.variables,
            "diagnostics": rendered.diagnostics,
        }))
    } else {
        println!("{}", rendered.text);
        Ok(())
    }
}

/// Resolve the template, variables, and knobs for `args`, then render.
pub(super) fn render(ctx: &WorkspaceContext, args: &RenderArgs) -> Result<Rendered> {
    let state = load_live_state(ctx)?;

    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path).map_err(|e| {
            KnobError::UserError(format!("failed to read '{}': {}", path.display(), e))
        })?,
        (None, None) => state.prompt.as_ref().map(|p| p.text.clone()).ok_or_else(|| {
            KnobError::UserError(
                "no template given: pass TEXT, --file, or set a prompt in the state".to_string(),
            )
        })?,
    };

    let variables = collect_variables(args)?;

    let mut knobs = state.linked_snapshot(&variables);
    let defaults = KnobDefaults::from(&ctx.config);
    for &(id, value) in &args.knobs {
        knobs
            .entry(id)
            .and_modify(|knob| knob.value = value)
            .or_insert_with(|| KnobAttrs::at(value).with_range(defaults.min, defaults.max));
    }

    Ok(Pipeline::realtime().render(&text, &knobs, &variables))
}

/// Merge `--vars-file` and then `--var` bindings; later bindings win.
fn collect_variables(args: &RenderArgs) -> Result<Variables> {
    let mut variables = Variables::new();

    if let Some(path) = &args.vars_file {
        let content = fs::read_to_string(path).map_err(|e| {
            KnobError::UserError(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            KnobError::UserError(format!("invalid JSON in '{}': {}", path.display(), e))
        })?;
        if !value.is_object() {
            return Err(KnobError::UserError(format!(
                "'{}' must contain a JSON object of variables",
                path.display()
            )));
        }
        variables.extend(variables_from_json(&value));
    }

    for (name, raw) in &args.vars {
        variables.insert(name.clone(), parse_binding(raw));
    }

    Ok(variables)
}

/// A `--var` value: JSON when it parses, otherwise text.
///
/// `3` is an integer, `true` a boolean, `red, blue` an option list.
fn parse_binding(raw: &str) -> VarValue {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => VarValue::from_json(&value),
        Err(_) => VarValue::text(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding_infers_types() {
        assert_eq!(parse_binding("3"), VarValue::int(3));
        assert_eq!(parse_binding("2.5"), VarValue::float(2.5));
        assert_eq!(parse_binding("true"), VarValue::bool(true));
        assert_eq!(parse_binding("fox"), VarValue::text("fox"));
        assert!(parse_binding("red, blue").options().is_some());
        assert_eq!(parse_binding("\"7\""), VarValue::text("7"));
    }
}
