//! Implementation of the `knobprompt state` and `knobprompt mode` commands.

use super::{load_live_state, print_json};
use crate::cli::{ModeArgs, NameArgs, StateAction, StateCommand};
use crate::context::WorkspaceContext;
use crate::error::Result;
use crate::state::AppState;

pub(super) fn dispatch_state(ctx: &WorkspaceContext, state_cmd: StateCommand) -> Result<()> {
    match state_cmd.action {
        StateAction::Show => print_json(&load_live_state(ctx)?.current_view()),
        StateAction::Save(args) => cmd_state_save(ctx, args),
        StateAction::Load(args) => cmd_state_load(ctx, args),
        StateAction::List => cmd_state_list(ctx),
    }
}

pub(super) fn cmd_mode(ctx: &WorkspaceContext, args: ModeArgs) -> Result<()> {
    let mut state = load_live_state(ctx)?;
    match args.mode {
        None => {
            println!("{}", state.current_mode);
            Ok(())
        }
        Some(mode) => {
            state.switch_mode(&mode)?;
            state.save(ctx.state_file())?;
            println!("Mode: {}", state.current_mode);
            Ok(())
        }
    }
}

fn cmd_state_save(ctx: &WorkspaceContext, args: NameArgs) -> Result<()> {
    let path = ctx.saved_state_path(&args.name);
    load_live_state(ctx)?.save(&path)?;
    println!("Saved state '{}' to {}", args.name, path.display());
    Ok(())
}

fn cmd_state_load(ctx: &WorkspaceContext, args: NameArgs) -> Result<()> {
    let state = AppState::load(ctx.saved_state_path(&args.name))?;
    state.save(ctx.state_file())?;
    println!("Loaded state '{}' ({} knobs)", args.name, state.knobs.len());
    Ok(())
}

fn cmd_state_list(ctx: &WorkspaceContext) -> Result<()> {
    let names = AppState::list_saved(ctx.states_dir())?;
    if names.is_empty() {
        println!("No saved states.");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
