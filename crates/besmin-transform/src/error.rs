//! Error types for the besmin engine.
//!
//! Syntax errors are recoverable per file and carry enough location detail
//! for a useful diagnostic line; everything else follows the same
//! `thiserror` shape used across the workspace.

use std::path::PathBuf;
use thiserror::Error;

/// A format key outside the recognized set.
#[derive(Debug, Clone, Error)]
#[error("unknown module format '{0}' (expected one of: esm, cjs, amd, umd, sysjs)")]
pub struct UnknownFormat(pub String);

/// A parse failure in an input source file.
///
/// Produced by syntax-only validation and by the parse step of a full
/// transform. Locations are 1-based.
#[derive(Debug, Clone, Error)]
#[error("{}:{line}:{column}: {message}", .path.display())]
pub struct SyntaxError {
    /// File that failed to parse
    pub path: PathBuf,
    /// Parser diagnostic message
    pub message: String,
    /// 1-based line of the first error
    pub line: usize,
    /// 1-based column of the first error
    pub column: usize,
}

/// Failures while transforming a source file into a target format.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source text does not parse
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The shared environment target query could not be resolved
    #[error("invalid environment target query '{query}': {message}")]
    Targets {
        /// The browserslist-style query from the profile
        query: String,
        /// Resolver error message
        message: String,
    },

    /// The downleveling transform reported an error
    #[error("transform failed for {}: {message}", .path.display())]
    Transform {
        /// File being transformed
        path: PathBuf,
        /// First transformer diagnostic
        message: String,
    },
}

/// Failures while minifying transformed code.
#[derive(Debug, Error)]
pub enum MinifyError {
    /// The intermediate code does not parse.
    ///
    /// This indicates a bug in the transform stage; it is typed rather than
    /// panicked on so one bad file cannot take down a tree build.
    #[error("minifier could not parse intermediate code for {}: {message}", .path.display())]
    Parse {
        /// File whose intermediate output failed to parse
        path: PathBuf,
        /// Parser diagnostic message
        message: String,
    },
}
