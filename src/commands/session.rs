//! Implementation of the `knobprompt session` command.

use crate::context::WorkspaceContext;
use crate::error::Result;
use crate::session::Session;
use std::io;

pub(super) fn cmd_session(ctx: &WorkspaceContext) -> Result<()> {
    let mut session = Session::open(ctx)?;
    tracing::info!(state = %ctx.state_file().display(), "session started");

    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), stdout.lock())?;

    tracing::info!("session ended");
    Ok(())
}
