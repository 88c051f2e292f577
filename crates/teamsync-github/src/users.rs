//! Typed client for user profiles (`GET /users/{username}`).

use teamsync_core::{Login, UserRecord};

use crate::error::GithubApiError;
use crate::transport::Transport;

/// Client for `/users` endpoints.
#[derive(Debug, Clone)]
pub struct UserClient {
    transport: Transport,
}

impl UserClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch the full public profile of `login` (name, email, company, ...).
    pub async fn get(&self, login: &Login) -> Result<UserRecord, GithubApiError> {
        let endpoint = format!("GET /users/{login}");
        let url = self.transport.url(&endpoint, &["users", login.as_str()])?;
        self.transport.get_json(&endpoint, url).await
    }
}
