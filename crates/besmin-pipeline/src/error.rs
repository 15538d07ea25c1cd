//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

use besmin_transform::{MinifyError, TransformError};

/// A per-file failure during a build.
///
/// Always recovered at the file boundary: the failing file is recorded in
/// the build report and the tree walk continues.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Source file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Transformation failed (including syntax errors)
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Minification failed
    #[error(transparent)]
    Minify(#[from] MinifyError),

    /// Output file or directory could not be written
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
