//! Source tree discovery.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::paths::is_eligible;

/// Enumerate every eligible source file under `root`.
///
/// Depth-first with entries sorted by file name, so the traversal order is
/// deterministic across runs and platforms. Unreadable entries are logged
/// and skipped; they never abort the walk.
pub fn discover_sources(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_eligible(path))
        .collect()
}
