//! Duplex echo sessions.
//!
//! # Responsibilities
//! - Reject requests that are not usable WebSocket upgrades (426)
//! - Create the endpoint pair and accept the server side
//! - Echo every inbound frame back to the sender
//! - Close both endpoints on peer close, transport error, or shutdown
//!
//! # Data Flow
//! ```text
//! handle() → EndpointPair → server side accepted → echo task spawned
//!          → Reply::Switching(local) → bridge (http/websocket.rs)
//! ```

use axum::http::StatusCode;

use crate::error::DispatchResult;
use crate::http::{Inbound, Reply};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::session::{Endpoint, EndpointPair, Event, SessionId, CLOSE_GOING_AWAY};

/// Body of the 426 reply.
pub const UPGRADE_REQUIRED_BODY: &str = "Expected Upgrade: websocket";

/// Opens one echo session per upgrade request.
#[derive(Debug, Clone)]
pub struct DuplexSession {
    shutdown: Shutdown,
}

impl DuplexSession {
    pub fn new(shutdown: Shutdown) -> Self {
        Self { shutdown }
    }

    pub async fn handle(&self, inbound: &Inbound) -> DispatchResult<Reply> {
        if !inbound.is_upgradable() {
            tracing::debug!(
                request_id = %inbound.request_id(),
                wants_upgrade = inbound.wants_upgrade(),
                "Rejecting non-upgrade request"
            );
            return Ok(Reply::text(StatusCode::UPGRADE_REQUIRED, UPGRADE_REQUIRED_BODY));
        }

        let (local, server) = EndpointPair::new().split();
        server.accept()?;

        let session_id = SessionId::new();
        tracing::info!(
            session_id = %session_id,
            request_id = %inbound.request_id(),
            "Duplex session opened"
        );
        metrics::session_opened();

        tokio::spawn(echo(session_id, server, self.shutdown.clone()));

        Ok(Reply::Switching(local))
    }
}

/// Drive the server-side endpoint until the session closes.
async fn echo(session_id: SessionId, mut server: Endpoint, shutdown: Shutdown) {
    loop {
        tokio::select! {
            event = server.recv() => match event {
                Some(Event::Message(message)) => {
                    tracing::debug!(session_id = %session_id, bytes = message.len(), "Frame received");
                    metrics::record_frame();
                    if let Err(e) = server.send(message) {
                        tracing::debug!(session_id = %session_id, error = %e, "Echo dropped");
                    }
                }
                Some(Event::Close(frame)) => {
                    tracing::info!(
                        session_id = %session_id,
                        code = frame.code,
                        reason = %frame.reason,
                        "Peer closed session"
                    );
                    server.acknowledge_close(&frame);
                    break;
                }
                Some(Event::Error(reason)) => {
                    tracing::warn!(session_id = %session_id, error = %reason, "Transport error");
                    server.abort(reason);
                    break;
                }
                None => {
                    tracing::debug!(session_id = %session_id, "Peer endpoint dropped");
                    server.close(CLOSE_GOING_AWAY, "peer went away");
                    break;
                }
            },
            _ = shutdown.wait() => {
                server.close(CLOSE_GOING_AWAY, "server shutting down");
                break;
            }
        }
    }

    metrics::session_closed();
    tracing::info!(session_id = %session_id, state = %server.state(), "Duplex session closed");
}
