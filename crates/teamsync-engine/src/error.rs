//! Fatal reconciliation errors.
//!
//! Anything here aborts the pass before a single action is executed.
//! Per-action failures are not errors; they are recorded as
//! [`teamsync_core::ActionOutcome::Failed`].

use teamsync_github::GithubApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    /// A read failed after the client exhausted its retries.
    #[error("failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        source: GithubApiError,
    },

    /// The team is absent and creation is disabled.
    #[error("team {team:?} does not exist in organization {org:?} and team creation is disabled")]
    TeamNotFound { org: String, team: String },

    /// Creating the missing team failed.
    #[error("failed to create team {team:?} in organization {org:?}: {source}")]
    CreateTeam {
        org: String,
        team: String,
        source: GithubApiError,
    },
}

impl ReconcileError {
    pub(crate) fn fetch(what: impl Into<String>, source: GithubApiError) -> Self {
        Self::Fetch {
            what: what.into(),
            source,
        }
    }

    /// The upstream error behind this failure, if any.
    pub fn api_error(&self) -> Option<&GithubApiError> {
        match self {
            ReconcileError::Fetch { source, .. } | ReconcileError::CreateTeam { source, .. } => Some(source),
            ReconcileError::TeamNotFound { .. } => None,
        }
    }
}
