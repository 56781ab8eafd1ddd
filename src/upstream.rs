//! Upstream fetch.
//!
//! # Responsibilities
//! - Fetch the one configured upstream resource
//! - Read the full body as text
//! - Map connection and body-read failures to `DispatchError::UpstreamFetch`
//!
//! # Design Decisions
//! - No retry and no per-fetch timeout; the server request timeout bounds it
//! - A non-success status still yields its body; only the status is logged
//! - `Upstream` is a trait so the responder can be driven without a network

use futures_util::future::BoxFuture;
use url::Url;

use crate::error::{DispatchError, DispatchResult};

/// Source of the upstream text embedded in plain-HTTP replies.
pub trait Upstream: Send + Sync {
    /// Fetch the resource and return its body as text.
    fn fetch_text(&self) -> BoxFuture<'_, DispatchResult<String>>;

    /// URL reported in logs and errors.
    fn url(&self) -> &str;
}

/// `reqwest`-backed upstream.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    url: Url,
}

impl HttpUpstream {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    async fn fetch(&self) -> DispatchResult<String> {
        let failure = |e: reqwest::Error| DispatchError::UpstreamFetch {
            url: self.url.to_string(),
            detail: e.to_string(),
        };

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(failure)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = %status, "Upstream returned non-success status");
        }

        let text = response.text().await.map_err(failure)?;
        tracing::debug!(url = %self.url, bytes = text.len(), "Upstream fetched");
        Ok(text)
    }
}

impl Upstream for HttpUpstream {
    fn fetch_text(&self) -> BoxFuture<'_, DispatchResult<String>> {
        Box::pin(self.fetch())
    }

    fn url(&self) -> &str {
        self.url.as_str()
    }
}
