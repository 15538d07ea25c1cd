//! Per-run outcome reporting.
//!
//! Every file processed by a validation or build pass leaves a typed entry
//! behind, so nothing fails invisibly. A [`BuildRun`] collects the reports
//! for one orchestrator invocation and is discarded after summarizing.

use std::path::PathBuf;

use besmin_transform::{ModuleFormat, SyntaxError};

use crate::error::ProcessingError;

/// Outcome of syntax-checking one file.
#[derive(Debug)]
pub enum ValidationOutcome {
    /// File parsed cleanly
    Passed,
    /// File failed to parse
    Syntax(SyntaxError),
    /// File could not be read
    Read(std::io::Error),
}

impl ValidationOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ValidationOutcome::Passed)
    }
}

/// One file's validation result.
#[derive(Debug)]
pub struct ValidationEntry {
    pub path: PathBuf,
    pub outcome: ValidationOutcome,
}

/// Validation results for a whole tree, in traversal order.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub entries: Vec<ValidationEntry>,
}

impl ValidationReport {
    pub fn passed(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.passed()
    }
}

/// Outcome of building one file for one format.
#[derive(Debug)]
pub enum BuildStatus {
    /// Output (and possibly a source map) was written
    Written {
        /// Path of the emitted file
        output: PathBuf,
        /// Whether a sibling `.map` was written
        map: bool,
    },
    /// The file was skipped and no output was produced
    Failed(ProcessingError),
}

/// One file's build result.
#[derive(Debug)]
pub struct BuildEntry {
    pub input: PathBuf,
    pub status: BuildStatus,
}

/// Build results for one (tree, format) pass, in traversal order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub entries: Vec<BuildEntry>,
}

impl BuildReport {
    pub fn written(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, BuildStatus::Written { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.written()
    }
}

/// Validation + build results for one format.
#[derive(Debug)]
pub struct FormatRun {
    pub format: ModuleFormat,
    pub validation: ValidationReport,
    pub build: BuildReport,
}

/// Everything one orchestrator invocation produced.
#[derive(Debug, Default)]
pub struct BuildRun {
    pub formats: Vec<FormatRun>,
}

impl BuildRun {
    pub fn total_written(&self) -> usize {
        self.formats.iter().map(|f| f.build.written()).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.formats.iter().map(|f| f.build.failed()).sum()
    }
}
