//! Implementation of the `knobprompt process` command.

use super::{print_json, read_input};
use crate::cli::ProcessArgs;
use crate::error::{KnobError, Result};
use crate::request::{ProcessingRequest, process_request};

/// Print the response; a failed request also exits with its error code.
pub(super) fn cmd_process(args: ProcessArgs) -> Result<()> {
    let input = read_input(&args.request)?;
    let request: ProcessingRequest = serde_json::from_str(&input)
        .map_err(|e| KnobError::UserError(format!("invalid processing request: {}", e)))?;

    let response = process_request(&request);
    print_json(&response)?;

    if response.success {
        Ok(())
    } else {
        Err(KnobError::ConfigurationError(
            response
                .message
                .unwrap_or_else(|| "processing failed".to_string()),
        ))
    }
}
