//! Failure translation at the request boundary.
//!
//! # Responsibilities
//! - Pass successful replies through unchanged
//! - Turn a failure on a plain request into 500 + detail
//! - Turn a failure on an upgrade request into a session that delivers one
//!   `{"error": ...}` frame and closes with 1011
//!
//! # Design Decisions
//! - Upgrade-aware clients cannot read an HTTP error body mid-handshake,
//!   so the failure is delivered inside the session instead
//! - Only upgrades the transport can honour get the in-session form; any
//!   other request falls back to 500

use std::future::Future;

use axum::http::StatusCode;

use crate::error::DispatchError;
use crate::http::{Inbound, Reply};
use crate::observability::metrics;
use crate::session::{EndpointPair, Message, CLOSE_INTERNAL_ERROR};

/// Close reason sent with the error frame.
pub const SETUP_FAILURE_REASON: &str = "Uncaught exception during session setup";

/// Run `handler` and translate any failure into a protocol-appropriate reply.
pub async fn translate<F, Fut>(inbound: &Inbound, handler: F) -> Reply
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Reply, DispatchError>>,
{
    match handler().await {
        Ok(reply) => reply,
        Err(err) => failure_reply(inbound, &err),
    }
}

/// Build the reply for a failed request.
pub fn failure_reply(inbound: &Inbound, err: &DispatchError) -> Reply {
    tracing::error!(
        request_id = %inbound.request_id(),
        kind = err.kind(),
        error = %err,
        upgrade = inbound.is_upgradable(),
        "Request failed"
    );
    metrics::record_failure(err.kind());

    if !inbound.is_upgradable() {
        return Reply::text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
    }

    match error_session(&err.to_string()) {
        Ok(reply) => reply,
        Err(session_err) => {
            tracing::error!(error = %session_err, "Failed to deliver error frame");
            Reply::text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn error_session(detail: &str) -> Result<Reply, DispatchError> {
    let (local, server) = EndpointPair::new().split();
    server.accept()?;

    let frame = serde_json::json!({ "error": detail }).to_string();
    server.send(Message::Text(frame))?;
    server.close(CLOSE_INTERNAL_ERROR, SETUP_FAILURE_REASON);

    Ok(Reply::Switching(local))
}
