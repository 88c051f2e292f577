//! # Action Executor
//!
//! Applies a [`MembershipPlan`] one action at a time: all adds, then all
//! removes, each in login order. A failed call is recorded and the next
//! action proceeds. In a dry run no API call is issued and every action is
//! recorded as skipped.

use teamsync_core::{ActionKind, ActionOutcome, ActionResult, Login, MembershipPlan};

use crate::directory::TeamDirectory;
use crate::pacing::Pacer;

pub struct ActionExecutor<'a, D: TeamDirectory + ?Sized> {
    directory: &'a D,
    pacer: &'a Pacer,
    org: &'a str,
    team_slug: &'a str,
    dry_run: bool,
}

impl<'a, D: TeamDirectory + ?Sized> ActionExecutor<'a, D> {
    pub fn new(directory: &'a D, pacer: &'a Pacer, org: &'a str, team_slug: &'a str, dry_run: bool) -> Self {
        Self {
            directory,
            pacer,
            org,
            team_slug,
            dry_run,
        }
    }

    /// Execute every planned action and report each outcome.
    pub async fn execute(&self, plan: &MembershipPlan) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(plan.len());
        for (kind, login) in plan.actions() {
            let outcome = self.apply(kind, login).await;
            match &outcome {
                ActionOutcome::Failed { detail } => {
                    tracing::error!(%login, action = %kind, team = self.team_slug, "{detail}");
                }
                outcome => tracing::info!(%login, action = %kind, team = self.team_slug, %outcome),
            }
            results.push(ActionResult::new(login.clone(), kind, outcome));
        }
        results
    }

    async fn apply(&self, kind: ActionKind, login: &Login) -> ActionOutcome {
        match kind {
            ActionKind::Add => tracing::info!(%login, "in the org but not the team, so adding them"),
            ActionKind::Remove => tracing::info!(%login, "in the team but shouldn't be, so removing them"),
        }
        if self.dry_run {
            tracing::debug!("dry run, not calling the GitHub API");
            return ActionOutcome::SkippedDryRun;
        }

        self.pacer.ready().await;
        let result = match kind {
            ActionKind::Add => self.directory.add_team_member(self.org, self.team_slug, login).await,
            ActionKind::Remove => self.directory.remove_team_member(self.org, self.team_slug, login).await,
        };
        match result {
            Ok(()) => ActionOutcome::Applied,
            Err(e) => ActionOutcome::Failed { detail: e.to_string() },
        }
    }
}
