//! besmin CLI - validate, transform and minify script trees.
//!
//! This crate wires the besmin pipeline to a command line:
//!
//! - [`cli`] - argument parsing and format selection
//! - [`orchestrator`] - validate -> build -> watch sequencing
//! - [`watch`] - notify-based incremental rebuilds
//! - [`logger`] - structured logging with tracing
//! - [`ui`] - terminal status messages
//! - [`error`] - the process-level error taxonomy

pub mod cli;
pub mod error;
pub mod logger;
pub mod orchestrator;
pub mod ui;
pub mod watch;

pub use error::{CliError, Result};
