//! `favserv` CLI - Command-line interface for the favorite-server manager
//!
//! Provides commands for listing, adding, updating and deleting favorite
//! game servers, connecting to them through the configured launcher, and
//! listing the identities available for auto-selection.

mod cli;
mod commands;
mod error;
mod format;
mod util;

use clap::Parser;
use cli::Cli;
use favserv_core::{TracingConfig, TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    init_logging(&cli);

    let result = commands::dispatch(config_path, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}

/// Installs the stderr subscriber at the level chosen by `-v`/`--quiet` or
/// the settings file
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        TracingLevel::Error
    } else if let Some(level) = TracingLevel::from_verbosity(cli.verbose) {
        level
    } else {
        util::load_settings(cli.config.as_deref())
            .map(|settings| settings.logging.tracing_level())
            .unwrap_or_default()
    };

    if let Err(e) = init_tracing(&TracingConfig::new().with_level(level)) {
        if !cli.quiet {
            eprintln!("Warning: {e}");
        }
    }
}
