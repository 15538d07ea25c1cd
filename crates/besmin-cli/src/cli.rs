//! Command-line interface definition.
//!
//! The surface is flat by design: two positional directories, bare format
//! keys, and mode flags. Both positionals are optional at the clap level so
//! that missing-argument handling stays ours (usage message on stderr, exit
//! status 1) instead of clap's.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use besmin_transform::ModuleFormat;

/// besmin - validate, transform and minify script trees
#[derive(Parser, Debug)]
#[command(
    name = "besmin",
    version,
    about = "Validate, transform and minify JavaScript/TypeScript trees",
    long_about = "besmin walks an input directory of script files, validates each file's\n\
                  syntax, transforms it per selected module format (esm, cjs, amd, umd,\n\
                  sysjs), minifies the result, and writes a mirrored output tree per\n\
                  format, with source maps."
)]
pub struct Cli {
    /// Input directory to read script sources from
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Output directory; one subdirectory is created per selected format
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Module format keys to build (any of: cjs, sysjs, amd, umd, esm)
    ///
    /// Keys may be repeated or combined in any order; the build processes
    /// them in the order given. With no keys, only esm is built. Words that
    /// are not recognized format keys are ignored.
    #[arg(value_name = "FORMAT")]
    pub formats: Vec<String>,

    /// Keep running after the build, rebuilding changed files
    #[arg(long)]
    pub watch: bool,

    /// Validate syntax only, skip the build entirely
    #[arg(long)]
    pub fix: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Collect recognized format keys from the trailing CLI words.
///
/// Unrecognized words are silently skipped, duplicates keep their first
/// position, and an empty selection falls back to `esm`.
pub fn select_formats(words: &[String]) -> Vec<ModuleFormat> {
    let mut formats: Vec<ModuleFormat> = Vec::new();
    for word in words {
        if let Ok(format) = ModuleFormat::from_str(word) {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
    }
    if formats.is_empty() {
        formats.push(ModuleFormat::Esm);
    }
    formats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_selection_defaults_to_esm() {
        assert_eq!(select_formats(&[]), vec![ModuleFormat::Esm]);
    }

    #[test]
    fn test_selection_preserves_argument_order() {
        assert_eq!(
            select_formats(&words(&["umd", "cjs", "esm"])),
            vec![ModuleFormat::Umd, ModuleFormat::Cjs, ModuleFormat::Esm]
        );
    }

    #[test]
    fn test_unknown_keys_are_silently_skipped() {
        assert_eq!(
            select_formats(&words(&["iife", "cjs", "bundle"])),
            vec![ModuleFormat::Cjs]
        );
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        assert_eq!(
            select_formats(&words(&["cjs", "amd", "cjs"])),
            vec![ModuleFormat::Cjs, ModuleFormat::Amd]
        );
    }

    #[test]
    fn test_cli_parses_full_invocation() {
        let cli = Cli::parse_from([
            "besmin", "src", "out", "cjs", "sysjs", "--watch", "--verbose",
        ]);
        assert_eq!(cli.input_dir.as_deref(), Some(std::path::Path::new("src")));
        assert_eq!(cli.output_dir.as_deref(), Some(std::path::Path::new("out")));
        assert_eq!(cli.formats, words(&["cjs", "sysjs"]));
        assert!(cli.watch);
        assert!(!cli.fix);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parses_without_arguments() {
        let cli = Cli::parse_from(["besmin"]);
        assert!(cli.input_dir.is_none());
        assert!(cli.output_dir.is_none());
        assert!(cli.formats.is_empty());
    }
}
