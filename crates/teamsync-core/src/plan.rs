//! # Reconciliation Planner
//!
//! `to_add = desired − actual`, `to_remove = actual − desired`. Both sets are
//! `BTreeSet`s, so iteration is lexicographic by login and a dry run prints
//! the same plan for the same inputs.
//!
//! An empty desired set plans removal of the whole team. That is computed,
//! not special-cased; operators review dry-run output before trusting it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::outcome::ActionKind;
use crate::user::Login;

/// The add/remove actions that move `actual` to `desired`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipPlan {
    to_add: BTreeSet<Login>,
    to_remove: BTreeSet<Login>,
}

impl MembershipPlan {
    /// Diff the desired set against the actual set.
    pub fn compute(desired: &BTreeSet<Login>, actual: &BTreeSet<Login>) -> Self {
        Self {
            to_add: desired.difference(actual).cloned().collect(),
            to_remove: actual.difference(desired).cloned().collect(),
        }
    }

    /// Logins that are desired but not on the team.
    pub fn to_add(&self) -> &BTreeSet<Login> {
        &self.to_add
    }

    /// Logins on the team that are not desired.
    pub fn to_remove(&self) -> &BTreeSet<Login> {
        &self.to_remove
    }

    /// Whether the team already matches the desired set.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of actions.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }

    /// Actions in execution order: every add, then every remove.
    pub fn actions(&self) -> impl Iterator<Item = (ActionKind, &Login)> {
        self.to_add
            .iter()
            .map(|l| (ActionKind::Add, l))
            .chain(self.to_remove.iter().map(|l| (ActionKind::Remove, l)))
    }

    /// The membership that results from fully applying this plan to `actual`.
    pub fn apply_to(&self, actual: &BTreeSet<Login>) -> BTreeSet<Login> {
        actual
            .difference(&self.to_remove)
            .cloned()
            .chain(self.to_add.iter().cloned())
            .collect()
    }
}

/// Free-function form of [`MembershipPlan::compute`].
pub fn plan(desired: &BTreeSet<Login>, actual: &BTreeSet<Login>) -> MembershipPlan {
    MembershipPlan::compute(desired, actual)
}
