//! Output path mapping.
//!
//! Pure path arithmetic: no filesystem access, no error conditions.
//! Eligibility filtering happens in discovery, before mapping is invoked.

use std::path::{Path, PathBuf};

use besmin_transform::ModuleFormat;

/// Extensions recognized as buildable script sources.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["js", "ts"];

/// The single extension all output files carry.
pub const OUTPUT_EXTENSION: &str = "js";

/// Whether a file participates in validation and builds.
pub fn is_eligible(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Map a source file to its output location for one format.
///
/// `relative` must be the file's path relative to the input root. The
/// directory structure is preserved exactly; only the format-scoped root
/// prefix and the final segment's extension change.
pub fn map_output(output_root: &Path, format: ModuleFormat, relative: &Path) -> PathBuf {
    output_root
        .join(format.key())
        .join(relative.with_extension(OUTPUT_EXTENSION))
}

/// The sibling `.map` path for an output file: `a.js` -> `a.js.map`.
pub fn sibling_map_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".map");
    output.with_file_name(name)
}
