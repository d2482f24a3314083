//! knobprompt: knob-driven prompt templating for generative-media pipelines.
//!
//! The [`engine`] module holds the templating pipeline and has no I/O. The
//! remaining modules are the adapters around it: workspace config, persisted
//! application state, saved templates, one-shot processing requests, the NDJSON
//! session, and the CLI.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod request;
pub mod session;
pub mod state;
pub mod templates;
