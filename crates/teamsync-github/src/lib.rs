//! # teamsync-github -- Typed Rust client for the GitHub REST API
//!
//! Provides typed access to the endpoints a team reconciliation pass needs:
//! - **Organization members** via `/orgs/{org}/members`
//! - **Teams** and **team memberships** via `/orgs/{org}/teams`
//! - **User profiles** via `/users/{username}`
//!
//! ## Behaviour
//!
//! - Every call goes through [`retry`]: transport failures, rate limits and
//!   gateway errors are retried for that single call with exponential backoff.
//! - List endpoints are fetched one [`Page`] at a time; the caller drives
//!   iteration and decides how to pace it.
//! - Non-2xx responses are classified into [`GithubApiError`] variants
//!   (auth, not-found, rate-limited, transient, other).

pub mod config;
pub mod error;
pub mod orgs;
pub mod pagination;
pub mod retry;
pub mod teams;
pub(crate) mod transport;
pub mod users;

pub use config::{ConfigError, GithubApiConfig};
pub use error::GithubApiError;
pub use pagination::Page;
pub use retry::RetryPolicy;
pub use teams::{Team, TeamMembership};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

/// REST API version pinned via `X-GitHub-Api-Version`.
pub const API_VERSION: &str = "2022-11-28";

/// Top-level GitHub client. Holds sub-clients for each endpoint family.
#[derive(Debug, Clone)]
pub struct GithubClient {
    orgs: orgs::OrgClient,
    teams: teams::TeamClient,
    users: users::UserClient,
    api_url: url::Url,
}

impl GithubClient {
    /// Create a new GitHub client from configuration.
    pub fn new(config: GithubApiConfig) -> Result<Self, GithubApiError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.as_str()))
            .map_err(|_| GithubApiError::Config(ConfigError::MissingToken))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| GithubApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let transport = transport::Transport::new(
            http,
            config.api_url.clone(),
            config.per_page,
            config.retry,
        );

        Ok(Self {
            orgs: orgs::OrgClient::new(transport.clone()),
            teams: teams::TeamClient::new(transport.clone()),
            users: users::UserClient::new(transport),
            api_url: config.api_url,
        })
    }

    /// Access the organization-members client.
    pub fn orgs(&self) -> &orgs::OrgClient {
        &self.orgs
    }

    /// Access the teams and team-memberships client.
    pub fn teams(&self) -> &teams::TeamClient {
        &self.teams
    }

    /// Access the user-profile client.
    pub fn users(&self) -> &users::UserClient {
        &self.users
    }

    /// The API root this client talks to.
    pub fn api_url(&self) -> &url::Url {
        &self.api_url
    }
}
