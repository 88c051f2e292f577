//! Shared request plumbing for the endpoint clients.

use reqwest::header::LINK;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::GithubApiError;
use crate::pagination::{parse_next_link, Page};
use crate::retry::{send_with_retry, Replay, RetryPolicy};

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    api_url: Url,
    per_page: u32,
    retry: RetryPolicy,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, api_url: Url, per_page: u32, retry: RetryPolicy) -> Self {
        Self {
            http,
            api_url,
            per_page: per_page.clamp(1, crate::config::MAX_PER_PAGE),
            retry,
        }
    }

    /// `{api_url}/{segments...}` with each segment percent-encoded.
    pub(crate) fn url(&self, endpoint: &str, segments: &[&str]) -> Result<Url, GithubApiError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| GithubApiError::Url {
                endpoint: endpoint.to_string(),
                detail: format!("{} cannot be a base URL", self.api_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of the first page of a list endpoint.
    pub(crate) fn first_page(&self, endpoint: &str, segments: &[&str]) -> Result<Url, GithubApiError> {
        let mut url = self.url(endpoint, segments)?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", "1");
        Ok(url)
    }

    /// Fetch one page and read its `Link: rel="next"` target.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
    ) -> Result<Page<T>, GithubApiError> {
        tracing::debug!(%url, "fetching page");
        let resp = send_with_retry(&self.retry, Replay::Idempotent, endpoint, || {
            self.http.get(url.clone()).send()
        })
        .await?;

        let next = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_link);

        let items = resp.json().await.map_err(|source| GithubApiError::Deserialization {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok(Page { items, next })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
    ) -> Result<T, GithubApiError> {
        let resp = send_with_retry(&self.retry, Replay::Idempotent, endpoint, || {
            self.http.get(url.clone()).send()
        })
        .await?;
        decode(endpoint, resp).await
    }

    /// POST is replayed only after a rate-limit rejection.
    pub(crate) async fn post_json<B, T>(&self, endpoint: &str, url: Url, body: &B) -> Result<T, GithubApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = send_with_retry(&self.retry, Replay::RateLimitOnly, endpoint, || {
            self.http.post(url.clone()).json(body).send()
        })
        .await?;
        decode(endpoint, resp).await
    }

    pub(crate) async fn put_json<B, T>(&self, endpoint: &str, url: Url, body: &B) -> Result<T, GithubApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = send_with_retry(&self.retry, Replay::Idempotent, endpoint, || {
            self.http.put(url.clone()).json(body).send()
        })
        .await?;
        decode(endpoint, resp).await
    }

    pub(crate) async fn delete(&self, endpoint: &str, url: Url) -> Result<(), GithubApiError> {
        send_with_retry(&self.retry, Replay::Idempotent, endpoint, || {
            self.http.delete(url.clone()).send()
        })
        .await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, resp: reqwest::Response) -> Result<T, GithubApiError> {
    resp.json().await.map_err(|source| GithubApiError::Deserialization {
        endpoint: endpoint.to_string(),
        source,
    })
}
