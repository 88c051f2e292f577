//! Action outcomes produced by the executor and consumed by reporting.

use serde::Serialize;

use crate::user::Login;

/// The kind of membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Put the user on the team.
    Add,
    /// Take the user off the team.
    Remove,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Add => f.write_str("add"),
            ActionKind::Remove => f.write_str("remove"),
        }
    }
}

/// What happened when an action was executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ActionOutcome {
    /// The API call succeeded.
    Applied,
    /// Dry run: no API call was issued.
    SkippedDryRun,
    /// The API call failed; the run continued.
    Failed {
        /// The error as reported by the client.
        detail: String,
    },
}

impl std::fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionOutcome::Applied => f.write_str("applied"),
            ActionOutcome::SkippedDryRun => f.write_str("skipped-dry-run"),
            ActionOutcome::Failed { detail } => write!(f, "failed: {detail}"),
        }
    }
}

/// One outcome record per planned action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    /// The user the action targeted.
    pub login: Login,
    /// Add or remove.
    pub kind: ActionKind,
    /// How it went.
    #[serde(flatten)]
    pub outcome: ActionOutcome,
}

impl ActionResult {
    /// Record the outcome of one action.
    pub fn new(login: Login, kind: ActionKind, outcome: ActionOutcome) -> Self {
        Self {
            login,
            kind,
            outcome,
        }
    }

    /// Whether the API call failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Failed { .. })
    }
}
