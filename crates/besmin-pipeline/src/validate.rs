//! Tree validation: a best-effort diagnostic pass, never a hard gate.

use std::path::Path;

use besmin_transform::Transform;
use tracing::debug;

use crate::report::{ValidationEntry, ValidationOutcome, ValidationReport};
use crate::walk::discover_sources;

/// Syntax-checks every eligible file under a directory.
///
/// Each file is checked independently: a malformed file produces a failed
/// entry and the walk moves on, so one bad file never blocks discovery or
/// reporting of the others.
pub struct Validator<'a, T> {
    transformer: &'a T,
}

impl<'a, T: Transform> Validator<'a, T> {
    pub fn new(transformer: &'a T) -> Self {
        Self { transformer }
    }

    /// Walk `input_root` and syntax-check every eligible file.
    pub async fn validate(&self, input_root: &Path) -> ValidationReport {
        let mut report = ValidationReport::default();
        for path in discover_sources(input_root) {
            let outcome = self.check_file(&path).await;
            report.entries.push(ValidationEntry { path, outcome });
        }
        debug!(
            passed = report.passed(),
            failed = report.failed(),
            "validation pass finished"
        );
        report
    }

    /// Syntax-check a single file.
    pub async fn check_file(&self, path: &Path) -> ValidationOutcome {
        let source = match tokio::fs::read_to_string(path).await {
            Ok(source) => source,
            Err(error) => return ValidationOutcome::Read(error),
        };
        match self.transformer.check(path, &source) {
            Ok(()) => ValidationOutcome::Passed,
            Err(error) => ValidationOutcome::Syntax(error),
        }
    }
}
