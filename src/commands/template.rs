//! Implementation of the `knobprompt template` commands.

use super::{load_live_state, print_json, read_input};
use crate::cli::{FromStateArgs, NameArgs, TemplateAction, TemplateCommand, TemplateSaveArgs};
use crate::context::WorkspaceContext;
use crate::error::{KnobError, Result};
use crate::state::KnobDefaults;
use crate::templates::{Template, TemplateStore};

pub(super) fn dispatch_template(
    ctx: &WorkspaceContext,
    template_cmd: TemplateCommand,
) -> Result<()> {
    let store = TemplateStore::new(ctx.templates_dir());
    match template_cmd.action {
        TemplateAction::List => cmd_template_list(&store),
        TemplateAction::Show(args) => print_json(&store.require(&args.name)?),
        TemplateAction::Save(args) => cmd_template_save(&store, args),
        TemplateAction::Delete(args) => cmd_template_delete(&store, args),
        TemplateAction::Apply(args) => cmd_template_apply(ctx, &store, args),
        TemplateAction::FromState(args) => cmd_template_from_state(ctx, &store, args),
    }
}

fn cmd_template_list(store: &TemplateStore) -> Result<()> {
    let summaries = store.list()?;
    if summaries.is_empty() {
        println!("No templates.");
        return Ok(());
    }

    for summary in summaries {
        if summary.description.is_empty() {
            println!("{}  (updated {})", summary.name, summary.updated_at);
        } else {
            println!(
                "{}  (updated {})  {}",
                summary.name, summary.updated_at, summary.description
            );
        }
    }
    Ok(())
}

fn cmd_template_save(store: &TemplateStore, args: TemplateSaveArgs) -> Result<()> {
    let input = read_input(&args.file)?;
    let mut template: Template = serde_json::from_str(&input)
        .map_err(|e| KnobError::UserError(format!("invalid template JSON: {}", e)))?;
    if let Some(name) = args.name {
        template.name = name;
    }

    let path = store.save(&mut template)?;
    println!("Saved template '{}' to {}", template.name, path.display());
    Ok(())
}

fn cmd_template_delete(store: &TemplateStore, args: NameArgs) -> Result<()> {
    if !store.delete(&args.name)? {
        return Err(KnobError::NotFound(format!("template '{}'", args.name)));
    }
    println!("Deleted template '{}'", args.name);
    Ok(())
}

fn cmd_template_apply(ctx: &WorkspaceContext, store: &TemplateStore, args: NameArgs) -> Result<()> {
    let mut state = load_live_state(ctx)?;
    let template = store.apply(&args.name, &mut state, &KnobDefaults::from(&ctx.config))?;
    state.save(ctx.state_file())?;
    println!(
        "Applied template '{}' ({} knobs)",
        template.name,
        template.knobs.len()
    );
    Ok(())
}

fn cmd_template_from_state(
    ctx: &WorkspaceContext,
    store: &TemplateStore,
    args: FromStateArgs,
) -> Result<()> {
    let state = load_live_state(ctx)?;
    let template = store.save_from_state(&args.name, args.description, &state)?;
    println!(
        "Saved template '{}' from state ({} knobs)",
        template.name,
        template.knobs.len()
    );
    Ok(())
}
