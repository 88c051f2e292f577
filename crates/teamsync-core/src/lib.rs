//! # teamsync-core: Domain Types for Team Reconciliation
//!
//! The pure half of teamsync. Nothing in this crate performs I/O; every
//! function is a deterministic function of its inputs, which keeps the
//! admission and planning rules testable without an upstream API.
//!
//! ## Pipeline Pieces
//!
//! 1. [`UserRecord`]: one organization or team member as returned by the
//!    API, a validated [`Login`] plus an open map of other attributes.
//! 2. [`FilterRuleSet`]: per-field `reject`/`allow` regex lists, compiled
//!    once at startup. [`FilterRuleSet::admit`] is the admission decision.
//! 3. [`MembershipPlan`]: `desired − actual` and `actual − desired`, in
//!    lexicographic login order.
//! 4. [`ActionResult`]: the outcome of executing one planned action.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `teamsync-*` crates (this is the leaf of the DAG).
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Invalid regex patterns are a configuration error at load time, never a
//!   per-user runtime failure.

#![deny(missing_docs)]

pub mod error;
pub mod filter;
pub mod outcome;
pub mod plan;
pub mod user;

pub use error::{FilterConfigError, MissingFieldError, ValidationError};
pub use filter::{admit, FieldRule, FilterRuleSet, Rejection, Verdict};
pub use outcome::{ActionKind, ActionOutcome, ActionResult};
pub use plan::{plan, MembershipPlan};
pub use user::{Login, UserRecord};
