//! Implementation of the `knobprompt group` commands.

use super::load_live_state;
use crate::cli::{GroupAction, GroupCommand, GroupCreateArgs};
use crate::context::WorkspaceContext;
use crate::error::Result;
use crate::state::{AppState, GroupVariable, VariableGroup};

pub(super) fn dispatch_group(ctx: &WorkspaceContext, group_cmd: GroupCommand) -> Result<()> {
    match group_cmd.action {
        GroupAction::List => cmd_group_list(ctx),
        GroupAction::Create(args) => cmd_group_create(ctx, args),
    }
}

fn cmd_group_list(ctx: &WorkspaceContext) -> Result<()> {
    let state = load_live_state(ctx)?;
    let mut groups = state.variable_groups().peekable();
    if groups.peek().is_none() {
        println!("No variable groups.");
        return Ok(());
    }

    for group in groups {
        let mut header = group.name.clone();
        if !group.color.is_empty() {
            header.push_str(&format!("  [{}]", group.color));
        }
        if group.locked {
            header.push_str("  (locked)");
        }
        println!("{}", header);
        for var in &group.variables {
            println!("  {} = {}  (weight {})", var.name, var.value, var.weight);
        }
    }
    Ok(())
}

fn cmd_group_create(ctx: &WorkspaceContext, args: GroupCreateArgs) -> Result<()> {
    let mut state = load_live_state(ctx)?;
    let group = create_group(&mut state, args)?;
    println!(
        "Created variable group '{}' ({} variables)",
        group.name,
        group.variables.len()
    );
    state.save(ctx.state_file())
}

pub(super) fn create_group(state: &mut AppState, args: GroupCreateArgs) -> Result<VariableGroup> {
    let group = VariableGroup {
        variables: args
            .vars
            .into_iter()
            .map(|(name, value)| GroupVariable::new(name, value))
            .collect(),
        color: args.color,
        locked: args.locked,
        ..VariableGroup::new(args.name)
    };
    state.create_variable_group(group).cloned()
}
