//! Error types for knobprompt.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for knobprompt operations.
///
/// Unresolved placeholders, knobs, and variables are never errors inside the
/// engine; they degrade to per-stage fallbacks. Errors here come from building
/// a pipeline or from the adapters around it.
#[derive(Error, Debug)]
pub enum KnobError {
    /// User provided invalid arguments or an unreadable/invalid file.
    #[error("{0}")]
    UserError(String),

    /// A stage could not be built from the supplied configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A knob, template, or saved state does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The application state rejected the operation.
    #[error("State error: {0}")]
    StateError(String),
}

impl KnobError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            KnobError::UserError(_) => exit_codes::USER_ERROR,
            KnobError::ConfigurationError(_) => exit_codes::CONFIGURATION_ERROR,
            KnobError::NotFound(_) => exit_codes::NOT_FOUND,
            KnobError::StateError(_) => exit_codes::STATE_ERROR,
        }
    }
}

/// Result type alias for knobprompt operations.
pub type Result<T> = std::result::Result<T, KnobError>;
