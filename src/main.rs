//! knobprompt: knob-driven prompt templating for generative-media pipelines.
//!
//! This is the main entry point for the `knobprompt` CLI. It parses arguments,
//! resolves the workspace, installs logging, dispatches to the appropriate
//! command handler, and handles errors with proper exit codes.

use knobprompt::cli::Cli;
use knobprompt::context::WorkspaceContext;
use knobprompt::{commands, exit_codes};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const FALLBACK_LOG_FILTER: &str = "warn";

/// Log to stderr so stdout carries only rendered text and NDJSON.
///
/// `RUST_LOG` wins over the workspace's `log_filter`.
fn init_tracing(config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config_filter
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new(FALLBACK_LOG_FILTER))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let ctx = WorkspaceContext::resolve(cli.root.as_deref());
    init_tracing(ctx.as_ref().ok().map(|ctx| ctx.config.log_filter.as_str()));

    match ctx.and_then(|ctx| commands::dispatch(&ctx, cli.command)) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
