//! Running one pass from a checked [`SyncConfig`].

use anyhow::{Context, Result};
use teamsync_engine::reconcile;
use teamsync_github::GithubClient;

use crate::config::{OutputFormat, SyncConfig};
use crate::report;

/// Reconcile, print the report and return the exit status.
///
/// Fatal errors (authentication, missing team, exhausted retries on a read)
/// are returned as `Err`.
pub async fn run_sync(config: SyncConfig) -> Result<u8> {
    tracing::debug!(api_url = %config.github.api_url, retry = ?config.github.retry, "configuring GitHub client");
    let client = GithubClient::new(config.github).context("failed to build GitHub client")?;

    let report = reconcile(&client, &config.settings)
        .await
        .context("reconciliation aborted")?;

    let rendered = match config.output {
        OutputFormat::Text => report::render_text(&report),
        OutputFormat::Json => report::render_json(&report)?,
    };
    println!("{}", rendered.trim_end());

    let counts = report.counts();
    if report.has_failures() {
        for failure in report.failures() {
            tracing::error!(login = %failure.login, action = %failure.kind, "{}", failure.outcome);
        }
        tracing::warn!(failed = counts.failed, "finished with failed actions");
    } else {
        tracing::info!(applied = counts.applied, skipped = counts.skipped, "finished");
    }
    Ok(report::exit_code(&report))
}
