//! Exit code constants for the knobprompt CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable or invalid input files)
//! - 2: Pipeline configuration error (e.g. segment/weight length mismatch)
//! - 3: Not found (knob, template, or saved state)
//! - 4: State error (locked knob, invalid mode, corrupt state file)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or unreadable/invalid input files.
pub const USER_ERROR: i32 = 1;

/// Pipeline configuration error: a stage could not be built from its parameters.
pub const CONFIGURATION_ERROR: i32 = 2;

/// A named knob, template, or saved state does not exist.
pub const NOT_FOUND: i32 = 3;

/// Application state rejected the operation.
pub const STATE_ERROR: i32 = 4;
