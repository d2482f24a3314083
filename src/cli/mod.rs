//! CLI argument parsing for knobprompt.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// knobprompt: knob-driven prompt templating for generative-media pipelines.
///
/// Templates mix plain text with patterns that knobs and variables resolve:
/// - `{name}` / `{{name}}` substitute a variable
/// - `[content:knob]` / `[content:knob:B]` add a knob-driven weight
/// - `{cycle:knob:a,b,c}` picks an option from a knob position
/// - `{if:condition:then|else}` branches on a variable
#[derive(Parser, Debug)]
#[command(name = "knobprompt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Workspace root (default: $KNOBPROMPT_ROOT, else the current directory).
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for knobprompt.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a workspace.
    ///
    /// Creates `.knobprompt/` with a default config.yaml, an empty state file,
    /// and the templates and states directories.
    Init,

    /// Render a template with the real-time pipeline.
    ///
    /// Knobs come from the workspace state, overridden by `--knob`.
    Render(RenderArgs),

    /// Run a processing request (JSON) through its declared stages.
    Process(ProcessArgs),

    /// Knob management commands.
    Knob(KnobCommand),

    /// Show or switch the control mode (A, B, C, D).
    Mode(ModeArgs),

    /// Show or replace the prompt held in the live state.
    Prompt(PromptCommand),

    /// Variable group commands.
    Group(GroupCommand),

    /// Live state and named snapshots.
    State(StateCommand),

    /// Saved template commands.
    Template(TemplateCommand),

    /// Serve a real-time session as NDJSON over stdin/stdout.
    Session,
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Template text. If omitted, uses `--file` or the state's prompt.
    pub text: Option<String>,

    /// Read the template text from a file.
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Variable binding `name=value`; the value is read as JSON when it
    /// parses, else as text. Repeatable.
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// JSON file of variables (an object).
    #[arg(long)]
    pub vars_file: Option<PathBuf>,

    /// Knob override `id=value` for this render only. Repeatable.
    #[arg(long = "knob", value_parser = parse_knob)]
    pub knobs: Vec<(u32, f64)>,

    /// Print the text, final variables, and diagnostics as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `process` command.
#[derive(Parser, Debug)]
pub struct ProcessArgs {
    /// Request file, or `-` for stdin.
    #[arg(default_value = "-")]
    pub request: String,
}

/// Knob subcommands.
#[derive(Parser, Debug)]
pub struct KnobCommand {
    #[command(subcommand)]
    pub action: KnobAction,
}

/// Available knob actions.
#[derive(Subcommand, Debug)]
pub enum KnobAction {
    /// List knobs in the live state.
    List,

    /// Set a knob's value (and optionally its weight mode).
    ///
    /// Fails when the knob does not exist or is locked.
    Set(KnobSetArgs),

    /// Create or replace a knob.
    Define(KnobDefineArgs),
}

/// Arguments for the `knob set` command.
#[derive(Parser, Debug)]
pub struct KnobSetArgs {
    pub id: u32,

    pub value: f64,

    /// Weight mode; keeps the current mode when omitted.
    #[arg(long, value_parser = ["A", "B", "C"])]
    pub mode: Option<String>,
}

/// Arguments for the `knob define` command.
#[derive(Parser, Debug)]
pub struct KnobDefineArgs {
    pub id: u32,

    /// Label; also links the knob to the variable of the same name.
    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    pub value: Option<f64>,

    #[arg(long)]
    pub min: Option<f64>,

    #[arg(long)]
    pub max: Option<f64>,

    #[arg(long, value_parser = ["A", "B", "C"], default_value = "A")]
    pub mode: String,

    /// Variable this knob controls.
    #[arg(long)]
    pub variable: Option<String>,

    /// Reject `knob set` on this knob.
    #[arg(long)]
    pub locked: bool,
}

/// Arguments for the `mode` command.
#[derive(Parser, Debug)]
pub struct ModeArgs {
    /// New mode. Prints the current mode when omitted.
    pub mode: Option<String>,
}

/// Prompt subcommands.
#[derive(Parser, Debug)]
pub struct PromptCommand {
    #[command(subcommand)]
    pub action: PromptAction,
}

/// Available prompt actions.
#[derive(Subcommand, Debug)]
pub enum PromptAction {
    /// Print the current prompt as JSON.
    Show,

    /// Replace the prompt.
    Set(PromptSetArgs),
}

/// Arguments for the `prompt set` command.
#[derive(Parser, Debug)]
pub struct PromptSetArgs {
    /// Prompt template text.
    pub text: String,

    /// Negative prompt text.
    #[arg(long)]
    pub negative: Option<String>,

    /// Generation setting `key=value`; the value is read as JSON when it
    /// parses, else as text. Repeatable.
    #[arg(long = "setting", value_parser = parse_var)]
    pub settings: Vec<(String, String)>,
}

/// Variable group subcommands.
#[derive(Parser, Debug)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub action: GroupAction,
}

/// Available variable group actions.
#[derive(Subcommand, Debug)]
pub enum GroupAction {
    /// List variable groups.
    List,

    /// Create a variable group, replacing an unlocked one of the same name.
    Create(GroupCreateArgs),
}

/// Arguments for the `group create` command.
#[derive(Parser, Debug)]
pub struct GroupCreateArgs {
    pub name: String,

    /// Group member `name=value`. Repeatable.
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Display colour, e.g. `#ff8800`.
    #[arg(long, default_value = "")]
    pub color: String,

    /// Reject later `group create` calls with this name.
    #[arg(long)]
    pub locked: bool,
}

/// State subcommands.
#[derive(Parser, Debug)]
pub struct StateCommand {
    #[command(subcommand)]
    pub action: StateAction,
}

/// Available state actions.
#[derive(Subcommand, Debug)]
pub enum StateAction {
    /// Print the current state view as JSON.
    Show,

    /// Save the live state as a named snapshot.
    Save(NameArgs),

    /// Replace the live state with a named snapshot.
    Load(NameArgs),

    /// List named snapshots.
    List,
}

/// Template subcommands.
#[derive(Parser, Debug)]
pub struct TemplateCommand {
    #[command(subcommand)]
    pub action: TemplateAction,
}

/// Available template actions.
#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// List saved templates.
    List,

    /// Print a template as JSON.
    Show(NameArgs),

    /// Save a template from a JSON file (or stdin with `-`).
    Save(TemplateSaveArgs),

    /// Delete a template.
    Delete(NameArgs),

    /// Merge a template's knobs and prompt into the live state.
    Apply(NameArgs),

    /// Save the live state's knobs and prompt as a template.
    FromState(FromStateArgs),
}

/// A single name argument.
#[derive(Parser, Debug)]
pub struct NameArgs {
    pub name: String,
}

/// Arguments for the `template save` command.
#[derive(Parser, Debug)]
pub struct TemplateSaveArgs {
    /// Template JSON file, or `-` for stdin.
    pub file: String,

    /// Override the name stored in the file.
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the `template from-state` command.
#[derive(Parser, Debug)]
pub struct FromStateArgs {
    pub name: String,

    #[arg(short, long)]
    pub description: Option<String>,
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{}'", s)),
    }
}

fn parse_knob(s: &str) -> Result<(u32, f64), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected id=value, got '{}'", s))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid knob id '{}'", id))?;
    let value = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid knob value '{}'", value))?;
    Ok((id, value))
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
