//! Implementation of the `knobprompt knob` commands.

use super::load_live_state;
use crate::cli::{KnobAction, KnobCommand, KnobDefineArgs, KnobSetArgs};
use crate::context::WorkspaceContext;
use crate::engine::WeightMode;
use crate::error::{KnobError, Result};
use crate::state::{AppState, Knob, KnobDefaults};

pub(super) fn dispatch_knob(ctx: &WorkspaceContext, knob_cmd: KnobCommand) -> Result<()> {
    match knob_cmd.action {
        KnobAction::List => cmd_knob_list(ctx),
        KnobAction::Set(args) => cmd_knob_set(ctx, args),
        KnobAction::Define(args) => cmd_knob_define(ctx, args),
    }
}

fn cmd_knob_list(ctx: &WorkspaceContext) -> Result<()> {
    let state = load_live_state(ctx)?;

    if state.knobs.is_empty() {
        println!("No knobs defined.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<16} {:>8}  {:<14} {:<4} {:<12} {}",
        "ID", "LABEL", "VALUE", "RANGE", "MODE", "VARIABLE", "LOCKED"
    );
    for knob in state.knobs.values() {
        println!(
            "{:>4}  {:<16} {:>8}  {:<14} {:<4} {:<12} {}",
            knob.id,
            knob.label,
            knob.value,
            format!("{}..{}", knob.min, knob.max),
            knob.mode.as_str(),
            knob.variable_name.as_deref().unwrap_or("-"),
            if knob.locked { "yes" } else { "" }
        );
    }
    Ok(())
}

fn cmd_knob_set(ctx: &WorkspaceContext, args: KnobSetArgs) -> Result<()> {
    let mut state = load_live_state(ctx)?;
    let knob = set_knob(&mut state, &args)?;
    println!("Knob {} ({}) = {} [{}]", knob.id, knob.label, knob.value, knob.mode.as_str());
    state.save(ctx.state_file())
}

fn cmd_knob_define(ctx: &WorkspaceContext, args: KnobDefineArgs) -> Result<()> {
    let mut state = load_live_state(ctx)?;
    let knob = define_knob(&mut state, args, &KnobDefaults::from(&ctx.config))?;
    println!("Defined knob {} ({})", knob.id, knob.label);
    state.save(ctx.state_file())
}

pub(super) fn set_knob(state: &mut AppState, args: &KnobSetArgs) -> Result<Knob> {
    let mode = match args.mode.as_deref() {
        Some(mode) => parse_mode(mode)?,
        None => state
            .knobs
            .get(&args.id)
            .map(|knob| knob.mode)
            .unwrap_or_default(),
    };
    state.update_knob(args.id, args.value, mode).cloned()
}

pub(super) fn define_knob(
    state: &mut AppState,
    args: KnobDefineArgs,
    defaults: &KnobDefaults,
) -> Result<Knob> {
    let mut knob = Knob::new(args.id, defaults);
    if let Some(label) = args.label {
        knob.label = label;
    }
    if let Some(min) = args.min {
        knob.min = min;
    }
    if let Some(max) = args.max {
        knob.max = max;
    }
    if let Some(value) = args.value {
        knob.value = value;
    }
    knob.mode = parse_mode(&args.mode)?;
    knob.variable_name = args.variable;
    knob.locked = args.locked;

    Ok(state.define_knob(knob).clone())
}

fn parse_mode(mode: &str) -> Result<WeightMode> {
    WeightMode::from_str(mode)
        .ok_or_else(|| KnobError::UserError(format!("invalid weight mode '{}'", mode)))
}
