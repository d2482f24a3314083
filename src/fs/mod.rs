//! Filesystem utilities for knobprompt.
//!
//! State files and templates are always written atomically so a crash never
//! leaves a half-written JSON document behind.

pub mod atomic;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
