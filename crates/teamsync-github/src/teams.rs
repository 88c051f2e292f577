//! Typed client for organization teams and team memberships.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/orgs/{org}/teams` | List teams (paginated) |
//! | POST   | `/orgs/{org}/teams` | Create team |
//! | GET    | `/orgs/{org}/teams/{team_slug}/members` | List team members (paginated) |
//! | PUT    | `/orgs/{org}/teams/{team_slug}/memberships/{username}` | Add or update membership |
//! | DELETE | `/orgs/{org}/teams/{team_slug}/memberships/{username}` | Remove membership |

use serde::{Deserialize, Serialize};
use teamsync_core::{Login, UserRecord};
use url::Url;

use crate::error::GithubApiError;
use crate::pagination::Page;
use crate::transport::Transport;

/// A team as returned by the teams API.
///
/// Only the fields teamsync reads are modeled; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
}

/// Membership state returned when adding a user.
///
/// `pending` means the user has not yet accepted an organization invitation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamMembership {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TeamMembership {
    pub fn is_pending(&self) -> bool {
        self.state.as_deref() == Some("pending")
    }
}

#[derive(Debug, Serialize)]
struct CreateTeamRequest<'a> {
    name: &'a str,
    privacy: &'a str,
}

#[derive(Debug, Serialize)]
struct MembershipRequest<'a> {
    role: &'a str,
}

/// Client for `/orgs/{org}/teams` endpoints.
#[derive(Debug, Clone)]
pub struct TeamClient {
    transport: Transport,
}

impl TeamClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch one page of the organization's teams.
    pub async fn teams_page(&self, org: &str, cursor: Option<&Url>) -> Result<Page<Team>, GithubApiError> {
        let endpoint = format!("GET /orgs/{org}/teams");
        let url = match cursor {
            Some(next) => next.clone(),
            None => self.transport.first_page(&endpoint, &["orgs", org, "teams"])?,
        };
        self.transport.get_page(&endpoint, url).await
    }

    /// Create a closed team named `name`. Requires `admin:org` scope.
    pub async fn create(&self, org: &str, name: &str) -> Result<Team, GithubApiError> {
        let endpoint = format!("POST /orgs/{org}/teams");
        let url = self.transport.url(&endpoint, &["orgs", org, "teams"])?;
        let body = CreateTeamRequest {
            name,
            privacy: "closed",
        };
        self.transport.post_json(&endpoint, url, &body).await
    }

    /// Fetch one page of a team's members.
    pub async fn members_page(
        &self,
        org: &str,
        team_slug: &str,
        cursor: Option<&Url>,
    ) -> Result<Page<UserRecord>, GithubApiError> {
        let endpoint = format!("GET /orgs/{org}/teams/{team_slug}/members");
        let url = match cursor {
            Some(next) => next.clone(),
            None => self
                .transport
                .first_page(&endpoint, &["orgs", org, "teams", team_slug, "members"])?,
        };
        self.transport.get_page(&endpoint, url).await
    }

    /// Add `login` to the team as a regular member.
    pub async fn add_member(
        &self,
        org: &str,
        team_slug: &str,
        login: &Login,
    ) -> Result<TeamMembership, GithubApiError> {
        let endpoint = format!("PUT /orgs/{org}/teams/{team_slug}/memberships/{login}");
        let url = self.transport.url(
            &endpoint,
            &["orgs", org, "teams", team_slug, "memberships", login.as_str()],
        )?;
        self.transport
            .put_json(&endpoint, url, &MembershipRequest { role: "member" })
            .await
    }

    /// Remove `login` from the team. The user stays in the organization.
    pub async fn remove_member(&self, org: &str, team_slug: &str, login: &Login) -> Result<(), GithubApiError> {
        let endpoint = format!("DELETE /orgs/{org}/teams/{team_slug}/memberships/{login}");
        let url = self.transport.url(
            &endpoint,
            &["orgs", org, "teams", team_slug, "memberships", login.as_str()],
        )?;
        self.transport.delete(&endpoint, url).await
    }
}
