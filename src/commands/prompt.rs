//! Implementation of the `knobprompt prompt` commands.

use super::{load_live_state, print_json};
use crate::cli::{PromptAction, PromptCommand, PromptSetArgs};
use crate::context::WorkspaceContext;
use crate::error::Result;
use crate::state::{AppState, Prompt};
use serde_json::Value;

pub(super) fn dispatch_prompt(ctx: &WorkspaceContext, prompt_cmd: PromptCommand) -> Result<()> {
    match prompt_cmd.action {
        PromptAction::Show => {
            let state = load_live_state(ctx)?;
            match &state.prompt {
                Some(prompt) => print_json(prompt),
                None => {
                    println!("No prompt set.");
                    Ok(())
                }
            }
        }
        PromptAction::Set(args) => cmd_prompt_set(ctx, args),
    }
}

fn cmd_prompt_set(ctx: &WorkspaceContext, args: PromptSetArgs) -> Result<()> {
    let mut state = load_live_state(ctx)?;
    set_prompt(&mut state, args);
    state.save(ctx.state_file())?;
    println!("Prompt updated");
    Ok(())
}

pub(super) fn set_prompt(state: &mut AppState, args: PromptSetArgs) -> &Prompt {
    let settings = args
        .settings
        .into_iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            (key, value)
        })
        .collect();

    state.update_prompt(Prompt {
        text: args.text,
        negative_text: args.negative,
        settings,
    })
}
