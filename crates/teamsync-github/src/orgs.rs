//! Typed client for organization membership.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/orgs/{org}/members` | List organization members (paginated) |

use teamsync_core::UserRecord;
use url::Url;

use crate::error::GithubApiError;
use crate::pagination::Page;
use crate::transport::Transport;

/// Client for `/orgs/{org}` endpoints.
#[derive(Debug, Clone)]
pub struct OrgClient {
    transport: Transport,
}

impl OrgClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch one page of organization members.
    ///
    /// Pass `None` for the first page and the previous page's `next` for
    /// the rest. Records are summary user objects (login, id, type, ...).
    pub async fn members_page(
        &self,
        org: &str,
        cursor: Option<&Url>,
    ) -> Result<Page<UserRecord>, GithubApiError> {
        let endpoint = format!("GET /orgs/{org}/members");
        let url = match cursor {
            Some(next) => next.clone(),
            None => self.transport.first_page(&endpoint, &["orgs", org, "members"])?,
        };
        self.transport.get_page(&endpoint, url).await
    }
}
