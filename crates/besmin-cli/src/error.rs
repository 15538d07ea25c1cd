//! CLI error types.
//!
//! Per-file failures never reach this level; they are recovered inside the
//! pipeline and reported through the run reports. What remains is the small
//! set of failures that legitimately terminate the process.

use thiserror::Error;

/// Usage line shown when required arguments are missing.
pub const USAGE: &str =
    "Usage: besmin <inputDir> <outputDir> [cjs|umd|amd|sysjs|esm] [--watch] [--fix]";

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing required command-line argument
    #[error("{0}")]
    Usage(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl CliError {
    /// The usage error raised before any file I/O happens.
    pub fn usage() -> Self {
        CliError::Usage(USAGE.to_string())
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CliError to a miette Report for terminal rendering.
pub fn cli_error_to_miette(error: CliError) -> miette::Report {
    miette::miette!("{}", error)
}
