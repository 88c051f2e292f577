//! # teamsync-cli: Command-Line Front End
//!
//! Provides the `teamsync` binary. One invocation runs one reconciliation
//! pass and exits:
//!
//! ```bash
//! PAT=ghp_... ORG=acme TEAM_NAME=Everyone DRY_RUN=false teamsync
//! teamsync --org acme --team Everyone --filters-file filters.yaml --output json
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing and configuration checks live in [`config`]; every
//!   value is validated before the first API call.
//! - Reconciliation logic lives in `teamsync-engine`. This crate wires the
//!   GitHub client to it and renders the result.
//!
//! ## Exit Status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | every action applied (or skipped in a dry run) |
//! | 1 | at least one action failed |
//! | 2 | configuration error or fatal fetch error |

pub mod config;
pub mod logging;
pub mod report;
pub mod sync;

/// Exit status for a pass in which some action failed.
pub const EXIT_ACTION_FAILED: u8 = 1;

/// Exit status for configuration errors and aborted passes.
pub const EXIT_FATAL: u8 = 2;
