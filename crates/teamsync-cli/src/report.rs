//! Rendering a [`ReconcileReport`] for stdout.

use std::fmt::Write as _;

use anyhow::Result;
use teamsync_engine::{ReconcileReport, TeamStatus};

use crate::EXIT_ACTION_FAILED;

/// Human-readable summary, one action per line.
pub fn render_text(report: &ReconcileReport) -> String {
    let mut out = String::new();
    let status = match report.team.status {
        TeamStatus::Existing => "existing",
        TeamStatus::Created => "created",
        TeamStatus::WouldCreate => "would be created",
    };
    let counts = report.counts();

    let _ = writeln!(out, "organization: {}", report.org);
    let _ = writeln!(out, "team: {} ({}, {status})", report.team.name, report.team.slug);
    let _ = writeln!(out, "mode: {}", if report.dry_run { "dry run" } else { "live" });
    let _ = writeln!(
        out,
        "members: {} in organization, {} desired, {} in team",
        report.org_members, report.desired, report.actual
    );
    let _ = writeln!(
        out,
        "plan: {} to add, {} to remove",
        report.plan.to_add().len(),
        report.plan.to_remove().len()
    );
    for result in &report.results {
        let _ = writeln!(out, "  {} {}: {}", result.kind, result.login, result.outcome);
    }
    let _ = writeln!(
        out,
        "summary: {} applied, {} skipped, {} failed, {} API calls",
        counts.applied, counts.skipped, counts.failed, report.api_calls
    );
    out
}

pub fn render_json(report: &ReconcileReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Process exit status for a completed pass.
pub fn exit_code(report: &ReconcileReport) -> u8 {
    if report.has_failures() {
        EXIT_ACTION_FAILED
    } else {
        0
    }
}
