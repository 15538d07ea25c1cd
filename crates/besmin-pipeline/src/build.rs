//! Tree builds: per-file transform, minify and write with failure isolation.

use std::path::{Path, PathBuf};

use besmin_transform::{Minify, ModuleFormat, ProfileRegistry, Transform};
use tracing::debug;

use crate::error::ProcessingError;
use crate::paths::{map_output, sibling_map_path};
use crate::report::{BuildEntry, BuildReport, BuildStatus};
use crate::walk::discover_sources;

/// Builds an output tree for one format at a time.
///
/// Holds no state beyond the borrowed capabilities and registry; every file
/// is processed in its own scope, which is what makes per-file failure
/// isolation possible.
pub struct Builder<'a, T, M> {
    transformer: &'a T,
    minifier: &'a M,
    registry: &'a ProfileRegistry,
}

impl<'a, T: Transform, M: Minify> Builder<'a, T, M> {
    pub fn new(transformer: &'a T, minifier: &'a M, registry: &'a ProfileRegistry) -> Self {
        Self {
            transformer,
            minifier,
            registry,
        }
    }

    /// Build every eligible file under `input_root` for `format`.
    ///
    /// Files are processed serially in traversal order. A failing file is
    /// recorded in the report and never aborts the remaining walk.
    pub async fn build_tree(
        &self,
        input_root: &Path,
        output_root: &Path,
        format: ModuleFormat,
    ) -> BuildReport {
        let mut report = BuildReport::default();
        for path in discover_sources(input_root) {
            let relative = match path.strip_prefix(input_root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };
            let entry = self.build_file(&path, &relative, output_root, format).await;
            report.entries.push(entry);
        }
        debug!(
            format = %format,
            written = report.written(),
            failed = report.failed(),
            "build pass finished"
        );
        report
    }

    /// Build one source file for one format.
    ///
    /// Reads the source, transforms it with the format's profile, minifies
    /// the result, then writes the output and, when one was produced, its
    /// sibling `.map`. The map traces to the transformed intermediate code,
    /// not the original source file: the transform map and the minify map
    /// are not composed.
    pub async fn build_file(
        &self,
        input: &Path,
        relative: &Path,
        output_root: &Path,
        format: ModuleFormat,
    ) -> BuildEntry {
        match self.process(input, relative, output_root, format).await {
            Ok((output, map)) => BuildEntry {
                input: input.to_path_buf(),
                status: BuildStatus::Written { output, map },
            },
            Err(error) => BuildEntry {
                input: input.to_path_buf(),
                status: BuildStatus::Failed(error),
            },
        }
    }

    async fn process(
        &self,
        input: &Path,
        relative: &Path,
        output_root: &Path,
        format: ModuleFormat,
    ) -> Result<(PathBuf, bool), ProcessingError> {
        let source =
            tokio::fs::read_to_string(input)
                .await
                .map_err(|source| ProcessingError::Read {
                    path: input.to_path_buf(),
                    source,
                })?;

        let profile = self.registry.profile(format);
        let transformed = self.transformer.transform(input, &source, profile, true)?;
        let minified =
            self.minifier
                .minify(input, &transformed.code, format.is_module(), true)?;

        let output = map_output(output_root, format, relative);
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ProcessingError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&output, minified.code.as_bytes())
            .await
            .map_err(|source| ProcessingError::Write {
                path: output.clone(),
                source,
            })?;

        let wrote_map = match &minified.map {
            Some(map) => {
                let map_path = sibling_map_path(&output);
                tokio::fs::write(&map_path, map.as_bytes())
                    .await
                    .map_err(|source| ProcessingError::Write {
                        path: map_path,
                        source,
                    })?;
                true
            }
            None => false,
        };
        debug!(input = %input.display(), output = %output.display(), "wrote output");
        Ok((output, wrote_map))
    }
}
