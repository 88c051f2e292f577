//! GitHub API client error types.
//!
//! Every non-2xx response is classified once, here, so callers can decide
//! between "abort the run", "retry this call" and "record and move on"
//! without looking at status codes.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Errors from GitHub API calls.
#[derive(Debug, thiserror::Error)]
pub enum GithubApiError {
    /// 401, or a 403 that is not a rate limit. Fatal.
    #[error("authentication failed calling {endpoint} ({status}): {message}")]
    Auth {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// 404: the organization, team or user does not exist (or is hidden from the token).
    #[error("{endpoint} returned 404: {message}")]
    NotFound { endpoint: String, message: String },
    /// 429, or a 403 carrying primary/secondary rate-limit signals. Retryable.
    #[error("rate limited calling {endpoint}: {message}")]
    RateLimited {
        endpoint: String,
        /// Server-provided wait hint, if any.
        retry_after: Option<Duration>,
        message: String,
    },
    /// HTTP transport error (connection refused, reset, timeout). Retryable.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Any other non-2xx status. Retryable only for 5xx gateway-class statuses.
    #[error("GitHub API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// An endpoint URL could not be built.
    #[error("cannot build URL for {endpoint}: {detail}")]
    Url { endpoint: String, detail: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl GithubApiError {
    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GithubApiError::RateLimited { .. } | GithubApiError::Http { .. } => true,
            GithubApiError::ApiError { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Server-provided wait hint for rate-limit errors.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GithubApiError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubApiError::Auth { status, .. } | GithubApiError::ApiError { status, .. } => {
                Some(*status)
            }
            GithubApiError::NotFound { .. } => Some(404),
            GithubApiError::Http { source, .. } | GithubApiError::Deserialization { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }

    /// Consume a non-2xx response and classify it.
    pub(crate) async fn from_response(endpoint: &str, resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let headers = resp.headers();
        let rate_limit_signal = headers.contains_key(RETRY_AFTER)
            || header_str(headers, "x-ratelimit-remaining") == Some("0");
        let hint = retry_hint(headers, SystemTime::now());
        let body = resp.text().await.unwrap_or_default();
        classify(endpoint, status, rate_limit_signal, hint, body)
    }
}

/// Map a failed status to an error variant.
pub(crate) fn classify(
    endpoint: &str,
    status: u16,
    rate_limit_signal: bool,
    retry_after: Option<Duration>,
    body: String,
) -> GithubApiError {
    let endpoint = endpoint.to_string();
    let message = api_message(&body);
    match status {
        401 => GithubApiError::Auth {
            endpoint,
            status,
            message,
        },
        403 if rate_limit_signal || message.to_ascii_lowercase().contains("rate limit") => {
            GithubApiError::RateLimited {
                endpoint,
                retry_after,
                message,
            }
        }
        403 => GithubApiError::Auth {
            endpoint,
            status,
            message,
        },
        404 => GithubApiError::NotFound { endpoint, message },
        429 => GithubApiError::RateLimited {
            endpoint,
            retry_after,
            message,
        },
        _ => GithubApiError::ApiError {
            endpoint,
            status,
            body,
        },
    }
}

/// How long the server asked us to wait.
///
/// `retry-after` (seconds) wins; otherwise an exhausted primary limit
/// (`x-ratelimit-remaining: 0`) waits until `x-ratelimit-reset`.
pub(crate) fn retry_hint(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    if let Some(secs) = header_str(headers, RETRY_AFTER.as_str()).and_then(|v| v.trim().parse::<u64>().ok()) {
        return Some(Duration::from_secs(secs));
    }
    if header_str(headers, "x-ratelimit-remaining") != Some("0") {
        return None;
    }
    let reset = header_str(headers, "x-ratelimit-reset")?.trim().parse::<u64>().ok()?;
    let now = now.duration_since(UNIX_EPOCH).ok()?.as_secs();
    Some(Duration::from_secs(reset.saturating_sub(now)))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// GitHub error bodies are `{"message": "...", "documentation_url": "..."}`.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
