//! Locating (and, if needed, creating) the target team.
//!
//! Teams are addressed by slug in the API but configured by name. The
//! organization's team list is paged through looking for an exact name
//! match; a slug match is the fallback so `everyone` finds "Everyone".

use serde::Serialize;
use teamsync_github::Team;

use crate::directory::TeamDirectory;
use crate::error::ReconcileError;
use crate::pacing::Pacer;

/// How the target team was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeamStatus {
    Existing,
    Created,
    /// Dry run and the team does not exist yet.
    WouldCreate,
}

/// The team a pass reconciles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTeam {
    pub name: String,
    pub slug: String,
    pub status: TeamStatus,
}

impl ResolvedTeam {
    /// Whether current membership must be fetched. A team created (or to be
    /// created) in this pass has no members.
    pub fn has_members(&self) -> bool {
        self.status == TeamStatus::Existing
    }
}

/// Page through the organization's teams looking for `name`.
pub async fn find_team<D: TeamDirectory + ?Sized>(
    directory: &D,
    pacer: &Pacer,
    org: &str,
    name: &str,
) -> Result<Option<Team>, ReconcileError> {
    let mut cursor = None;
    let mut slug_match = None;
    loop {
        pacer.ready().await;
        let page = directory
            .teams_page(org, cursor.as_ref())
            .await
            .map_err(|source| ReconcileError::fetch(format!("teams of organization {org}"), source))?;

        for team in page.items {
            tracing::debug!(requested = name, found = %team.name, "comparing team");
            if team.name == name {
                return Ok(Some(team));
            }
            if slug_match.is_none() && team.slug == name {
                slug_match = Some(team);
            }
        }

        match page.next {
            Some(next) => cursor = Some(next),
            None => return Ok(slug_match),
        }
    }
}

/// Find the team, creating it when absent and allowed.
///
/// In a dry run a missing team is never created; it is reported as
/// [`TeamStatus::WouldCreate`] with the slug GitHub would most likely assign.
pub async fn resolve_team<D: TeamDirectory + ?Sized>(
    directory: &D,
    pacer: &Pacer,
    org: &str,
    name: &str,
    dry_run: bool,
    create_missing: bool,
) -> Result<ResolvedTeam, ReconcileError> {
    if let Some(team) = find_team(directory, pacer, org, name).await? {
        return Ok(ResolvedTeam {
            name: team.name,
            slug: team.slug,
            status: TeamStatus::Existing,
        });
    }

    if !create_missing {
        return Err(ReconcileError::TeamNotFound {
            org: org.to_string(),
            team: name.to_string(),
        });
    }

    if dry_run {
        tracing::info!(team = name, "team was not found; it would be created");
        return Ok(ResolvedTeam {
            name: name.to_string(),
            slug: slug_hint(name),
            status: TeamStatus::WouldCreate,
        });
    }

    tracing::info!(team = name, "team was not found; creating it");
    pacer.ready().await;
    let team = directory
        .create_team(org, name)
        .await
        .map_err(|source| ReconcileError::CreateTeam {
            org: org.to_string(),
            team: name.to_string(),
            source,
        })?;
    Ok(ResolvedTeam {
        name: team.name,
        slug: team.slug,
        status: TeamStatus::Created,
    })
}

/// Approximation of GitHub's slug rule: lowercase, runs of anything that is
/// not alphanumeric collapse to a single `-`.
pub fn slug_hint(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
