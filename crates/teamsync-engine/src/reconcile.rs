//! # Reconciliation Pass
//!
//! One linear pass: resolve team → admit org roster → read team roster →
//! plan → execute. Nothing is carried between passes; rerunning after an
//! interruption simply plans whatever is left.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;
use teamsync_core::{ActionOutcome, ActionResult, FilterRuleSet, MembershipPlan};

use crate::admission::admit_roster;
use crate::directory::TeamDirectory;
use crate::error::ReconcileError;
use crate::executor::ActionExecutor;
use crate::pacing::Pacer;
use crate::roster::RosterFetcher;
use crate::team::{resolve_team, ResolvedTeam};

/// Immutable inputs of one pass.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub org: String,
    pub team: String,
    pub rules: FilterRuleSet,
    pub dry_run: bool,
    /// Spacing between upstream calls.
    pub delay: Duration,
    /// Create the team when it does not exist.
    pub create_team: bool,
}

/// Per-outcome tallies of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Everything a pass decided and did.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub org: String,
    pub team: ResolvedTeam,
    pub dry_run: bool,
    pub org_members: usize,
    pub desired: usize,
    pub actual: usize,
    pub plan: MembershipPlan,
    pub results: Vec<ActionResult>,
    pub api_calls: u64,
}

impl ReconcileReport {
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(ActionResult::is_failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionResult> {
        self.results.iter().filter(|r| r.is_failed())
    }

    pub fn counts(&self) -> OutcomeCounts {
        self.results
            .iter()
            .fold(OutcomeCounts::default(), |mut counts, r| {
                match r.outcome {
                    ActionOutcome::Applied => counts.applied += 1,
                    ActionOutcome::SkippedDryRun => counts.skipped += 1,
                    ActionOutcome::Failed { .. } => counts.failed += 1,
                }
                counts
            })
    }
}

/// Drives one pass against a [`TeamDirectory`].
pub struct Reconciler<'a, D: TeamDirectory + ?Sized> {
    directory: &'a D,
    settings: &'a RunSettings,
    pacer: Pacer,
}

impl<'a, D: TeamDirectory + ?Sized> Reconciler<'a, D> {
    pub fn new(directory: &'a D, settings: &'a RunSettings) -> Self {
        Self {
            directory,
            settings,
            pacer: Pacer::new(settings.delay),
        }
    }

    /// Run the pass. Fatal errors abort before any action is executed.
    pub async fn run(&self) -> Result<ReconcileReport, ReconcileError> {
        let s = self.settings;
        tracing::info!(
            org = %s.org,
            team = %s.team,
            dry_run = s.dry_run,
            delay = ?self.pacer.delay(),
            rules = s.rules.rules().len(),
            "starting reconciliation pass"
        );

        let team = resolve_team(
            self.directory,
            &self.pacer,
            &s.org,
            &s.team,
            s.dry_run,
            s.create_team,
        )
        .await?;

        let fetcher = RosterFetcher::new(self.directory, &self.pacer);

        let admission = admit_roster(
            fetcher.org_members(&s.org),
            &s.rules,
            self.directory,
            &self.pacer,
        )
        .await?;
        tracing::info!(
            examined = admission.examined,
            admitted = admission.desired.len(),
            rejected = admission.rejected(),
            profiles_fetched = admission.profiles_fetched,
            "computed desired membership"
        );

        let actual = if team.has_members() {
            fetcher.team_members(&s.org, &team.slug).collect_logins().await?
        } else {
            BTreeSet::new()
        };
        tracing::info!(team = %team.slug, members = actual.len(), "read current membership");

        let plan = MembershipPlan::compute(&admission.desired, &actual);
        if plan.is_empty() {
            tracing::info!("no action required");
        } else {
            tracing::info!(add = plan.to_add().len(), remove = plan.to_remove().len(), "planned changes");
        }
        if admission.desired.is_empty() && !actual.is_empty() {
            tracing::warn!(
                members = actual.len(),
                "desired set is empty; this plan removes every team member"
            );
        }

        let executor = ActionExecutor::new(self.directory, &self.pacer, &s.org, &team.slug, s.dry_run);
        let results = executor.execute(&plan).await;

        Ok(ReconcileReport {
            org: s.org.clone(),
            team,
            dry_run: s.dry_run,
            org_members: admission.examined,
            desired: admission.desired.len(),
            actual: actual.len(),
            plan,
            results,
            api_calls: self.pacer.calls(),
        })
    }
}

/// Run a single reconciliation pass.
pub async fn reconcile<D: TeamDirectory + ?Sized>(
    directory: &D,
    settings: &RunSettings,
) -> Result<ReconcileReport, ReconcileError> {
    Reconciler::new(directory, settings).run().await
}
