//! Implementation of the `knobprompt init` command.
//!
//! Creates, under `.knobprompt/`:
//! 1. `config.yaml` with the default settings (if missing)
//! 2. the live state file, empty (if missing)
//! 3. the templates and states directories
//!
//! Running it again never overwrites existing files.

use crate::context::WorkspaceContext;
use crate::error::{KnobError, Result};
use crate::fs::atomic_write_file;
use crate::state::AppState;
use std::fs;
use std::path::Path;

pub(super) fn cmd_init(ctx: &WorkspaceContext) -> Result<()> {
    let report = scaffold(ctx)?;

    if report.config_created {
        println!("Initialized knobprompt workspace.");
    } else {
        println!("knobprompt workspace already initialized.");
    }
    println!();
    println!("Workspace: {}", ctx.root.display());
    println!("Config:    {}", ctx.config_path().display());
    println!("State:     {}", ctx.state_file().display());
    println!("Templates: {}", ctx.templates_dir().display());
    println!("States:    {}", ctx.states_dir().display());
    Ok(())
}

#[derive(Debug, Default, PartialEq)]
pub(super) struct ScaffoldReport {
    pub config_created: bool,
    pub state_created: bool,
}

/// Create whatever parts of the workspace are missing.
pub(super) fn scaffold(ctx: &WorkspaceContext) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    create_dir(&ctx.data_dir)?;
    create_dir(&ctx.templates_dir())?;
    create_dir(&ctx.states_dir())?;

    let config_path = ctx.config_path();
    if !config_path.exists() {
        // With no file on disk the loaded config is the default one.
        atomic_write_file(&config_path, &ctx.config.to_yaml()?)?;
        report.config_created = true;
    }

    let state_file = ctx.state_file();
    if !state_file.exists() {
        AppState::default().save(&state_file)?;
        report.state_created = true;
    }

    tracing::info!(root = %ctx.root.display(), ?report, "scaffolded workspace");
    Ok(report)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        KnobError::UserError(format!(
            "failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}
