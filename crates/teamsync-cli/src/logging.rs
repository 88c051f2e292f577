//! Log threshold parsing and subscriber setup.
//!
//! `LOG_LEVEL` takes either the numeric levels used by many ops tools
//! (10 debug, 20 info, 30 warning, 40 error, 50 critical) or a level name.
//! Each `-v` lowers the threshold by one step. `RUST_LOG`, when set,
//! replaces the computed filter entirely.

use anyhow::{bail, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const STEPS: [LevelFilter; 5] = [
    LevelFilter::ERROR,
    LevelFilter::WARN,
    LevelFilter::INFO,
    LevelFilter::DEBUG,
    LevelFilter::TRACE,
];

/// Resolve the threshold from `LOG_LEVEL` and the `-v` count.
pub fn level_filter(raw: &str, verbose: u8) -> Result<LevelFilter> {
    let raw = raw.trim();
    let base = match raw.parse::<i64>() {
        Ok(n) if n < 10 => LevelFilter::TRACE,
        Ok(n) if n < 20 => LevelFilter::DEBUG,
        Ok(n) if n < 30 => LevelFilter::INFO,
        Ok(n) if n < 40 => LevelFilter::WARN,
        Ok(_) => LevelFilter::ERROR,
        Err(_) => match raw.to_ascii_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" | "warning" => LevelFilter::WARN,
            "error" | "critical" | "fatal" => LevelFilter::ERROR,
            "off" => LevelFilter::OFF,
            _ => bail!("unrecognised LOG_LEVEL {raw:?}"),
        },
    };
    if base == LevelFilter::OFF {
        return Ok(base);
    }
    let step = STEPS.iter().position(|l| *l == base).unwrap_or(2);
    let raised = (step + usize::from(verbose)).min(STEPS.len() - 1);
    Ok(STEPS[raised])
}

/// Install the global subscriber. Logs go to stderr; stdout carries the report.
pub fn init(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
