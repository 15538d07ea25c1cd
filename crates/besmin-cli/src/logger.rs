//! Logging infrastructure.
//!
//! Structured logging via the `tracing` ecosystem. Verbosity is controlled
//! by `--verbose`/`--quiet`, with `RUST_LOG` as the escape hatch for custom
//! filters.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber with the specified options.
///
/// Call once at startup, before any logging occurs.
///
/// The logging level is determined in this order:
/// 1. `--verbose` flag: DEBUG for besmin crates
/// 2. `--quiet` flag: errors only
/// 3. `RUST_LOG` environment variable: custom filter
/// 4. Default: INFO for besmin crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("besmin_cli=debug,besmin_pipeline=debug,besmin_transform=debug")
    } else if quiet {
        EnvFilter::new("besmin_cli=error,besmin_pipeline=error,besmin_transform=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("besmin_cli=info,besmin_pipeline=info,besmin_transform=info")
        })
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
