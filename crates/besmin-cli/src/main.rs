//! besmin - validate, transform and minify script trees.
//!
//! Entry point: parses arguments, initializes logging and colors, then
//! hands the invocation to the orchestrator.

use besmin_cli::{cli, error, logger, orchestrator, ui};
use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    orchestrator::run(args)
        .await
        .map_err(error::cli_error_to_miette)
}
