//! Run sequencing: validate, build per format, then watch or exit.
//!
//! One invocation owns one [`BuildRun`]: for each selected format the input
//! tree is validated (diagnostic only, never a gate), the format's output
//! directory is ensured, and the tree is built. Afterwards the run either
//! terminates with a summary or hands off to watch mode.

use std::path::Path;
use std::time::Instant;

use besmin_pipeline::{
    BuildReport, BuildRun, BuildStatus, Builder, FormatRun, ValidationOutcome, ValidationReport,
    Validator,
};
use besmin_transform::{OxcMinifier, OxcTransformer, ProfileRegistry};

use crate::cli::{select_formats, Cli};
use crate::error::{CliError, Result};
use crate::{ui, watch};

/// Execute one CLI invocation.
///
/// # Errors
///
/// Returns a usage error before any file I/O when the input directory is
/// missing, or when the output directory is missing outside fix-only
/// terminal mode. Per-file failures never surface here; they are recorded
/// in the run reports and printed.
pub async fn run(cli: Cli) -> Result<()> {
    let Some(input_dir) = cli.input_dir.clone() else {
        return Err(CliError::usage());
    };

    let start = Instant::now();
    ui::info("Starting...");
    let transformer = OxcTransformer::new();

    if cli.fix {
        let report = Validator::new(&transformer).validate(&input_dir).await;
        print_validation(&report);
        if !cli.watch {
            return Ok(());
        }
    }

    let Some(output_dir) = cli.output_dir.clone() else {
        return Err(CliError::usage());
    };
    let formats = select_formats(&cli.formats);

    if !cli.fix {
        let minifier = OxcMinifier::new();
        let registry = ProfileRegistry::new();
        let validator = Validator::new(&transformer);
        let builder = Builder::new(&transformer, &minifier, &registry);

        let mut build_run = BuildRun::default();
        for format in &formats {
            ui::info(&format!("Validating: {format}"));
            let validation = validator.validate(&input_dir).await;
            print_validation(&validation);

            tokio::fs::create_dir_all(output_dir.join(format.key())).await?;
            let build = builder.build_tree(&input_dir, &output_dir, *format).await;
            print_build(&build);
            build_run.formats.push(FormatRun {
                format: *format,
                validation,
                build,
            });
        }
        print_summary(&build_run, start);
    }

    if cli.watch {
        let watch_output = (!cli.fix).then_some(output_dir);
        watch::watch(&input_dir, watch_output, formats, cli.fix).await?;
    }
    Ok(())
}

/// Print the per-file pass/fail signal for one validation pass.
fn print_validation(report: &ValidationReport) {
    for entry in &report.entries {
        print_check_outcome(&entry.path, &entry.outcome);
    }
}

/// Print one file's validation outcome.
pub(crate) fn print_check_outcome(path: &Path, outcome: &ValidationOutcome) {
    match outcome {
        ValidationOutcome::Passed => ui::success(&format!("Input OK: {}", path.display())),
        ValidationOutcome::Syntax(error) => ui::error(&format!("Input error: {error}")),
        ValidationOutcome::Read(error) => {
            ui::error(&format!("Input error: {}: {error}", path.display()));
        }
    }
}

/// Print the per-file outcome of one build pass.
fn print_build(report: &BuildReport) {
    for entry in &report.entries {
        match &entry.status {
            BuildStatus::Written { output, .. } => {
                ui::success(&format!("Output Ok: {}", output.display()));
            }
            BuildStatus::Failed(error) => {
                ui::error(&format!("Skipped {}: {error}", entry.input.display()));
            }
        }
    }
}

fn print_summary(run: &BuildRun, start: Instant) {
    let written = run.total_written();
    let failed = run.total_failed();
    let duration = ui::format_duration(start.elapsed());
    if failed == 0 {
        ui::success(&format!(
            "Build complete: {written} files written across {} format(s) in {duration}",
            run.formats.len()
        ));
    } else {
        ui::warning(&format!(
            "Build finished with failures: {written} written, {failed} failed in {duration}"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn base_cli() -> Cli {
        Cli {
            input_dir: None,
            output_dir: None,
            formats: Vec::new(),
            watch: false,
            fix: false,
            verbose: false,
            quiet: false,
            no_color: true,
        }
    }

    #[tokio::test]
    async fn test_missing_input_is_a_usage_error() {
        let err = run(base_cli()).await.unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[tokio::test]
    async fn test_missing_output_is_a_usage_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut cli = base_cli();
        cli.input_dir = Some(temp.path().to_path_buf());
        let err = run(cli).await.unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[tokio::test]
    async fn test_fix_mode_needs_no_output_dir() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.js"), "const x = 1;\n").unwrap();
        let mut cli = base_cli();
        cli.input_dir = Some(temp.path().to_path_buf());
        cli.fix = true;
        assert!(run(cli).await.is_ok());
    }

    #[tokio::test]
    async fn test_build_writes_one_tree_per_format() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("src");
        let output = temp.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("a.js"), "export const x = 1;\n").unwrap();

        let mut cli = base_cli();
        cli.input_dir = Some(input);
        cli.output_dir = Some(output.clone());
        cli.formats = vec!["cjs".to_string(), "esm".to_string()];
        run(cli).await.unwrap();

        assert!(output.join("cjs/a.js").is_file());
        assert!(output.join("cjs/a.js.map").is_file());
        assert!(output.join("esm/a.js").is_file());
        assert!(output.join("esm/a.js.map").is_file());
    }
}
