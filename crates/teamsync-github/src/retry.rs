//! Retry logic with exponential backoff for GitHub API calls.
//!
//! Retries the single failing call, never a whole paginated sequence.
//! Retryable: transport errors, rate limits (429 / rate-limited 403) and
//! 500/502/503/504. Everything else is returned immediately.
//!
//! A retry is an API call like any other, so it never goes out sooner than
//! [`RetryPolicy::min_delay`] after the attempt it replaces, whatever the
//! server hint says.
//!
//! Calls that are not idempotent (creating a team) are only replayed after a
//! rate-limit response, which GitHub sends without acting on the request. A
//! 5xx or a dropped connection may hide a request that did take effect.

use std::time::Duration;

use crate::error::GithubApiError;

/// How many times and how long to wait before giving up on a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the initial request.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub base_delay: Duration,
    /// Upper bound for any single wait, including server hints.
    pub max_delay: Duration,
    /// Lower bound for any single wait. Set to the run's inter-call delay.
    pub min_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            min_delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (0-based).
    ///
    /// The server hint replaces the computed backoff. The result is capped at
    /// `max_delay` and then raised to `min_delay`.
    pub fn delay_for(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        let backoff = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        hint.unwrap_or(backoff).min(self.max_delay).max(self.min_delay)
    }

    /// The same policy with a floor on every wait.
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }
}

/// Whether replaying a request can duplicate its effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Replay {
    /// GET, PUT and DELETE: every retryable failure is retried.
    Idempotent,
    /// POST: only rate-limit rejections are retried.
    RateLimitOnly,
}

impl Replay {
    fn allows(self, err: &GithubApiError) -> bool {
        match self {
            Replay::Idempotent => err.is_retryable(),
            Replay::RateLimitOnly => matches!(err, GithubApiError::RateLimited { .. }),
        }
    }
}

/// Send a request, retrying retryable failures under `policy`.
///
/// The closure `f` is called up to `policy.max_retries + 1` times. A
/// successful (2xx) response is returned as-is; any other response is
/// classified into a [`GithubApiError`].
pub(crate) async fn send_with_retry<F, Fut>(
    policy: &RetryPolicy,
    replay: Replay,
    endpoint: &str,
    f: F,
) -> Result<reqwest::Response, GithubApiError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        let err = match f().await {
            Ok(resp) if resp.status().is_success() => return Ok(resp),
            Ok(resp) => GithubApiError::from_response(endpoint, resp).await,
            Err(source) => GithubApiError::Http {
                endpoint: endpoint.to_string(),
                source,
            },
        };

        if !replay.allows(&err) || attempt >= policy.max_retries {
            return Err(err);
        }

        let delay = policy.delay_for(attempt, err.retry_after());
        tracing::warn!(
            attempt = attempt + 1,
            max_retries = policy.max_retries,
            "GitHub API call {endpoint} failed, retrying in {delay:?}: {err}"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
