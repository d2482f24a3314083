//! Command implementations for knobprompt.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command receives the resolved workspace; commands
//! that change the live state write it back before returning.

mod group;
mod init;
mod knob;
mod process;
mod prompt;
mod render;
mod session;
mod state;
mod template;


use crate::cli::Command;
use crate::context::WorkspaceContext;
use crate::error::{KnobError, Result};
use crate::state::AppState;
use serde::Serialize;
use std::io::Read;

/// Dispatch a command to its implementation.
pub fn dispatch(ctx: &WorkspaceContext, command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(ctx),
        Command::Render(args) => render::cmd_render(ctx, args),
        Command::Process(args) => process::cmd_process(args),
        Command::Knob(knob_cmd) => knob::dispatch_knob(ctx, knob_cmd),
        Command::Mode(args) => state::cmd_mode(ctx, args),
        Command::Prompt(prompt_cmd) => prompt::dispatch_prompt(ctx, prompt_cmd),
        Command::Group(group_cmd) => group::dispatch_group(ctx, group_cmd),
        Command::State(state_cmd) => state::dispatch_state(ctx, state_cmd),
        Command::Template(template_cmd) => template::dispatch_template(ctx, template_cmd),
        Command::Session => session::cmd_session(ctx),
    }
}

/// The live state, or an empty one before the first write.
fn load_live_state(ctx: &WorkspaceContext) -> Result<AppState> {
    AppState::load_or_default(ctx.state_file())
}

/// Read a file, or stdin when `source` is `-`.
fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| KnobError::UserError(format!("failed to read stdin: {}", e)))?;
        return Ok(buf);
    }

    std::fs::read_to_string(source)
        .map_err(|e| KnobError::UserError(format!("failed to read '{}': {}", source, e)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| KnobError::UserError(format!("failed to encode output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
