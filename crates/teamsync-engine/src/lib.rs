//! # teamsync-engine: Membership Reconciliation Engine
//!
//! Makes one GitHub team's membership equal to the set of organization
//! members admitted by a [`teamsync_core::FilterRuleSet`].
//!
//! ## Pass Structure
//!
//! ```text
//! resolve team ─▶ org roster ─▶ admit ─▶ desired ┐
//!                 team roster ─────────▶ actual  ┴▶ plan ─▶ execute ─▶ report
//! ```
//!
//! - Execution is sequential. A single [`Pacer`] spaces every upstream
//!   call by the configured delay.
//! - Reads fail the pass ([`ReconcileError`]); writes never do, their
//!   failures are recorded per action.
//! - The engine only reaches GitHub through [`TeamDirectory`], so every
//!   stage runs against an in-memory directory in tests.

pub mod admission;
pub mod directory;
pub mod error;
pub mod executor;
pub mod pacing;
pub mod reconcile;
pub mod roster;
pub mod team;

pub use directory::TeamDirectory;
pub use error::ReconcileError;
pub use executor::ActionExecutor;
pub use pacing::Pacer;
pub use reconcile::{reconcile, OutcomeCounts, ReconcileReport, Reconciler, RunSettings};
pub use roster::{MemberStream, RosterFetcher, RosterSource};
pub use team::{ResolvedTeam, TeamStatus};
