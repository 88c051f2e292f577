//! # teamsync entry point
//!
//! Loads `.env`, parses arguments, sets up logging and runs a single
//! reconciliation pass. See the crate docs for exit statuses.

use std::process::ExitCode;

use clap::Parser;

use teamsync_cli::config::SyncArgs;
use teamsync_cli::sync::run_sync;
use teamsync_cli::{logging, EXIT_FATAL};

#[tokio::main]
async fn main() -> ExitCode {
    // Must run before parsing so clap sees the variables.
    let dotenv = dotenvy::dotenv();
    let args = SyncArgs::parse();

    let level = match logging::level_filter(&args.log_level, args.verbose) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_FATAL);
        }
    };
    logging::init(level);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env file: {e}"),
    }

    let config = match args.resolve(std::env::var("GITHUB_TOKEN").ok()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {e:#}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    match run_sync(config).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
