//! Shared HTTP plumbing for the map service endpoints.
//!
//! All four endpoints are plain unauthenticated GETs. This wraps a single
//! `reqwest::Client` so the parameter resolver and the feed fetcher share one
//! connection pool and one timeout policy.

use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{FeedError, Unavailable, body_excerpt};

/// Timeout-bounded HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
}

impl HttpClient {
    /// Create a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FeedError::ClientBuild)?;

        Ok(Self { http })
    }

    /// GET `url` and return the body as text, unmodified.
    pub async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| unavailable(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::UpstreamUnavailable {
                url: url.to_string(),
                reason: Unavailable::Status {
                    status: status.as_u16(),
                    body: body_excerpt(&body),
                },
            });
        }

        let body = response.text().await.map_err(|e| unavailable(url, e))?;
        trace!(url, bytes = body.len(), "response body received");

        Ok(body)
    }

    /// GET `url` and parse the body as an untyped JSON value.
    ///
    /// A body that is not JSON at all means the endpoint is not serving what
    /// we expect, so it is reported as unavailable. Schema checks happen later.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, FeedError> {
        let body = self.get_text(url).await?;

        serde_json::from_str(&body).map_err(|e| FeedError::UpstreamUnavailable {
            url: url.to_string(),
            reason: Unavailable::NotJson {
                message: e.to_string(),
                body: body_excerpt(&body),
            },
        })
    }
}

fn unavailable(url: &str, err: reqwest::Error) -> FeedError {
    let reason = if err.is_timeout() {
        Unavailable::Timeout
    } else {
        Unavailable::Http(err)
    };

    FeedError::UpstreamUnavailable {
        url: url.to_string(),
        reason,
    }
}
