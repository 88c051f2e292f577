//! The upstream API seen by the engine.
//!
//! [`TeamDirectory`] is the only path from the engine to GitHub. The real
//! implementation forwards to [`GithubClient`]; tests substitute an
//! in-memory directory.

use async_trait::async_trait;
use teamsync_core::{Login, UserRecord};
use teamsync_github::{GithubApiError, GithubClient, Page, Team};
use url::Url;

/// Operations a reconciliation pass needs from the upstream API.
///
/// Paged operations take `None` for the first page and the previous page's
/// `next` URL afterwards. Implementations issue exactly one request per call
/// (plus any retries of that same request); pacing is the caller's job.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn org_members_page(
        &self,
        org: &str,
        cursor: Option<&Url>,
    ) -> Result<Page<UserRecord>, GithubApiError>;

    async fn teams_page(&self, org: &str, cursor: Option<&Url>) -> Result<Page<Team>, GithubApiError>;

    async fn create_team(&self, org: &str, name: &str) -> Result<Team, GithubApiError>;

    async fn team_members_page(
        &self,
        org: &str,
        team_slug: &str,
        cursor: Option<&Url>,
    ) -> Result<Page<UserRecord>, GithubApiError>;

    async fn user_profile(&self, login: &Login) -> Result<UserRecord, GithubApiError>;

    async fn add_team_member(&self, org: &str, team_slug: &str, login: &Login) -> Result<(), GithubApiError>;

    async fn remove_team_member(&self, org: &str, team_slug: &str, login: &Login)
        -> Result<(), GithubApiError>;
}

#[async_trait]
impl TeamDirectory for GithubClient {
    async fn org_members_page(
        &self,
        org: &str,
        cursor: Option<&Url>,
    ) -> Result<Page<UserRecord>, GithubApiError> {
        self.orgs().members_page(org, cursor).await
    }

    async fn teams_page(&self, org: &str, cursor: Option<&Url>) -> Result<Page<Team>, GithubApiError> {
        self.teams().teams_page(org, cursor).await
    }

    async fn create_team(&self, org: &str, name: &str) -> Result<Team, GithubApiError> {
        self.teams().create(org, name).await
    }

    async fn team_members_page(
        &self,
        org: &str,
        team_slug: &str,
        cursor: Option<&Url>,
    ) -> Result<Page<UserRecord>, GithubApiError> {
        self.teams().members_page(org, team_slug, cursor).await
    }

    async fn user_profile(&self, login: &Login) -> Result<UserRecord, GithubApiError> {
        self.users().get(login).await
    }

    async fn add_team_member(&self, org: &str, team_slug: &str, login: &Login) -> Result<(), GithubApiError> {
        let membership = self.teams().add_member(org, team_slug, login).await?;
        if membership.is_pending() {
            tracing::info!(%login, team = team_slug, "membership pending until the user accepts the org invitation");
        }
        Ok(())
    }

    async fn remove_team_member(
        &self,
        org: &str,
        team_slug: &str,
        login: &Login,
    ) -> Result<(), GithubApiError> {
        self.teams().remove_member(org, team_slug, login).await
    }
}
