//! # Roster Fetcher
//!
//! Turns paged member listings into a lazy, finite, non-restartable
//! sequence of [`UserRecord`]s. Page boundaries are invisible to callers:
//! [`MemberStream::next`] hands out records one at a time and fetches the
//! following page only when the buffer runs dry.
//!
//! Every page fetch waits on the run's [`Pacer`] first. Retrying a failed
//! page is the client's job; when it gives up, the error is returned here
//! and the cursor is left on the failed page.

use std::collections::BTreeSet;

use teamsync_core::{Login, UserRecord};
use url::Url;

use crate::directory::TeamDirectory;
use crate::error::ReconcileError;
use crate::pacing::Pacer;

/// Which listing a stream walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    Organization { org: String },
    Team { org: String, team_slug: String },
}

impl std::fmt::Display for RosterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterSource::Organization { org } => write!(f, "members of organization {org}"),
            RosterSource::Team { org, team_slug } => write!(f, "members of team {org}/{team_slug}"),
        }
    }
}

/// Entry point for member listings.
pub struct RosterFetcher<'a, D: TeamDirectory + ?Sized> {
    directory: &'a D,
    pacer: &'a Pacer,
}

impl<'a, D: TeamDirectory + ?Sized> RosterFetcher<'a, D> {
    pub fn new(directory: &'a D, pacer: &'a Pacer) -> Self {
        Self { directory, pacer }
    }

    /// Members of the organization.
    pub fn org_members(&self, org: &str) -> MemberStream<'a, D> {
        MemberStream::new(
            self.directory,
            self.pacer,
            RosterSource::Organization { org: org.to_string() },
        )
    }

    /// Current members of a team.
    pub fn team_members(&self, org: &str, team_slug: &str) -> MemberStream<'a, D> {
        MemberStream::new(
            self.directory,
            self.pacer,
            RosterSource::Team {
                org: org.to_string(),
                team_slug: team_slug.to_string(),
            },
        )
    }
}

/// A lazy walk over one member listing.
pub struct MemberStream<'a, D: TeamDirectory + ?Sized> {
    directory: &'a D,
    pacer: &'a Pacer,
    source: RosterSource,
    buffer: std::vec::IntoIter<UserRecord>,
    next: Option<Url>,
    started: bool,
    pages: usize,
}

impl<'a, D: TeamDirectory + ?Sized> MemberStream<'a, D> {
    fn new(directory: &'a D, pacer: &'a Pacer, source: RosterSource) -> Self {
        Self {
            directory,
            pacer,
            source,
            buffer: Vec::new().into_iter(),
            next: None,
            started: false,
            pages: 0,
        }
    }

    pub fn source(&self) -> &RosterSource {
        &self.source
    }

    /// Pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// The next record, or `None` once the last page is drained.
    pub async fn next(&mut self) -> Result<Option<UserRecord>, ReconcileError> {
        loop {
            if let Some(user) = self.buffer.next() {
                return Ok(Some(user));
            }
            if self.started && self.next.is_none() {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    async fn fetch_page(&mut self) -> Result<(), ReconcileError> {
        self.pacer.ready().await;
        let cursor = self.next.as_ref();
        let page = match &self.source {
            RosterSource::Organization { org } => self.directory.org_members_page(org, cursor).await,
            RosterSource::Team { org, team_slug } => {
                self.directory.team_members_page(org, team_slug, cursor).await
            }
        }
        .map_err(|source| ReconcileError::fetch(self.source.to_string(), source))?;

        self.pages += 1;
        tracing::debug!(source = %self.source, page = self.pages, records = page.items.len(), "fetched page");
        self.started = true;
        self.next = page.next;
        self.buffer = page.items.into_iter();
        Ok(())
    }

    /// Drain the stream into a set of logins.
    pub async fn collect_logins(mut self) -> Result<BTreeSet<Login>, ReconcileError> {
        let mut logins = BTreeSet::new();
        while let Some(user) = self.next().await? {
            tracing::debug!(login = %user.login(), source = %self.source, "found member");
            logins.insert(user.login().clone());
        }
        Ok(logins)
    }
}
