//! GitHub API client configuration.
//!
//! Defaults target github.com. Point `api_url` at an Enterprise Server
//! (`https://github.example.com/api/v3`) or a compatible endpoint to
//! reconcile elsewhere.

use url::Url;
use zeroize::Zeroizing;

use crate::retry::RetryPolicy;

/// Default REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page size GitHub accepts for list endpoints.
pub const MAX_PER_PAGE: u32 = 100;

/// Configuration for connecting to the GitHub REST API.
///
/// Custom `Debug` implementation redacts the `token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct GithubApiConfig {
    /// REST API root. Path segments are appended to it.
    pub api_url: Url,
    /// Personal access token or installation token.
    pub token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Page size for list endpoints (clamped to 1..=100).
    pub per_page: u32,
    /// Retry behaviour for rate-limited and transient failures.
    pub retry: RetryPolicy,
    /// Value of the `User-Agent` header. GitHub rejects requests without one.
    pub user_agent: String,
}

impl std::fmt::Debug for GithubApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubApiConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("per_page", &self.per_page)
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl GithubApiConfig {
    /// Configuration with default timeouts, page size and retry policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` for an empty token and
    /// `ConfigError::InvalidUrl` when `api_url` cannot serve as a base URL.
    pub fn new(api_url: &str, token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            token,
            timeout_secs: 30,
            per_page: MAX_PER_PAGE,
            retry: RetryPolicy::default(),
            user_agent: format!("teamsync/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Parse and check an API root URL.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(
            raw.to_string(),
            "expected an http(s) base URL".to_string(),
        ));
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("a GitHub token is required")]
    MissingToken,
    #[error("invalid API URL {0:?}: {1}")]
    InvalidUrl(String, String),
}
