//! Plain-HTTP responder.
//!
//! # Responsibilities
//! - Take the next invocation id from the shared counter
//! - Fetch the upstream text
//! - Hold the reply for the configured delay
//! - Compose `Hello World <id><text>\n`

use std::sync::Arc;
use std::time::Duration;

use crate::counter::SharedCounter;
use crate::error::DispatchResult;
use crate::http::{Inbound, Reply};
use crate::upstream::Upstream;

/// Answers every non-upgrade request.
#[derive(Clone)]
pub struct HttpResponder {
    counter: SharedCounter,
    upstream: Arc<dyn Upstream>,
    delay: Duration,
}

impl HttpResponder {
    pub fn new(counter: SharedCounter, upstream: Arc<dyn Upstream>, delay: Duration) -> Self {
        Self {
            counter,
            upstream,
            delay,
        }
    }

    pub fn counter(&self) -> &SharedCounter {
        &self.counter
    }

    pub async fn handle(&self, inbound: &Inbound) -> DispatchResult<Reply> {
        let id = self.counter.next();

        tracing::debug!(
            request_id = %inbound.request_id(),
            invocation = id,
            upstream = %self.upstream.url(),
            "Fetching upstream"
        );

        let text = self.upstream.fetch_text().await?;

        tokio::time::sleep(self.delay).await;

        Ok(Reply::ok(compose_body(id, &text)))
    }
}

fn compose_body(id: u64, text: &str) -> String {
    format!("Hello World {id}{text}\n")
}
