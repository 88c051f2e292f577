//! Desired-set computation: org roster → (optional profile fetch) → filter.

use std::collections::BTreeSet;

use teamsync_core::{FilterRuleSet, Login, UserRecord, Verdict};
use teamsync_github::GithubApiError;

use crate::directory::TeamDirectory;
use crate::error::ReconcileError;
use crate::pacing::Pacer;
use crate::roster::MemberStream;

/// Outcome of admitting an organization roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Admission {
    pub desired: BTreeSet<Login>,
    /// Members seen on the roster.
    pub examined: usize,
    /// Full profiles fetched for rules on non-summary fields.
    pub profiles_fetched: usize,
}

impl Admission {
    pub fn rejected(&self) -> usize {
        self.examined - self.desired.len()
    }
}

/// Evaluate every member of `roster` against `rules`.
///
/// When a rule names a field the summary record lacks, the user's full
/// profile is fetched (paced) and merged before evaluation. A profile that
/// 404s keeps the summary record; any other failure is fatal.
pub async fn admit_roster<D: TeamDirectory + ?Sized>(
    mut roster: MemberStream<'_, D>,
    rules: &FilterRuleSet,
    directory: &D,
    pacer: &Pacer,
) -> Result<Admission, ReconcileError> {
    let mut admission = Admission::default();
    while let Some(user) = roster.next().await? {
        admission.examined += 1;
        let user = if rules.references_missing_field(&user) {
            admission.profiles_fetched += 1;
            with_profile(user, directory, pacer).await?
        } else {
            user
        };

        match rules.evaluate(&user) {
            Verdict::Admitted => {
                tracing::debug!(login = %user.login(), "admitted");
                admission.desired.insert(user.login().clone());
            }
            Verdict::Rejected { field, reason } => {
                tracing::debug!(login = %user.login(), %field, ?reason, "rejected by filter");
            }
        }
    }
    Ok(admission)
}

async fn with_profile<D: TeamDirectory + ?Sized>(
    user: UserRecord,
    directory: &D,
    pacer: &Pacer,
) -> Result<UserRecord, ReconcileError> {
    pacer.ready().await;
    match directory.user_profile(user.login()).await {
        Ok(profile) => Ok(user.merged_with(profile)),
        Err(GithubApiError::NotFound { .. }) => {
            tracing::warn!(login = %user.login(), "profile not found; filtering on summary fields only");
            Ok(user)
        }
        Err(source) => Err(ReconcileError::fetch(format!("profile of {}", user.login()), source)),
    }
}
