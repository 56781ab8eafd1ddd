//! WebSocket bridge.
//!
//! # Responsibilities
//! - Hand the local endpoint of a session to the upgraded connection
//! - Pump frames between the socket and the endpoint in both directions
//! - Turn socket close frames into endpoint closes, socket errors into
//!   endpoint error signals, and endpoint closes into socket close frames
//!
//! # Data Flow
//! ```text
//! Client ←── WebSocket frames ──→ bridge ←── Endpoint events ──→ echo task
//! ```
//!
//! # Design Decisions
//! - Frame-level forwarding, no buffering beyond the endpoint channel
//! - Ping/pong is answered by the WebSocket implementation

use axum::extract::ws::{self, WebSocket};
use futures_util::SinkExt;

use crate::session::{CloseFrame, Endpoint, Event, Message, CLOSE_INTERNAL_ERROR, CLOSE_NORMAL};

/// Run until either side closes.
pub async fn bridge(mut socket: WebSocket, mut local: Endpoint) {
    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(ws::Message::Text(text))) => {
                    forward(&local, Message::Text(text.as_str().to_string()));
                }
                Some(Ok(ws::Message::Binary(bytes))) => {
                    forward(&local, Message::Binary(bytes.to_vec()));
                }
                Some(Ok(ws::Message::Ping(_) | ws::Message::Pong(_))) => {}
                Some(Ok(ws::Message::Close(frame))) => {
                    let frame = frame
                        .map(|f| CloseFrame::new(f.code, f.reason.as_str()))
                        .unwrap_or_else(|| CloseFrame::new(CLOSE_NORMAL, ""));
                    tracing::debug!(code = frame.code, "Client sent close");
                    local.close(frame.code, frame.reason);
                    // Flushes the close reply queued by the WebSocket layer.
                    let _ = socket.close().await;
                    break;
                }
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "WebSocket transport error");
                    local.fail(e.to_string());
                    break;
                }
                None => {
                    local.fail("connection dropped without close");
                    break;
                }
            },
            event = local.recv() => match event {
                Some(Event::Message(message)) => {
                    if let Err(e) = socket.send(to_socket(message)).await {
                        tracing::debug!(error = %e, "WebSocket send failed");
                        local.fail(e.to_string());
                        break;
                    }
                }
                Some(Event::Close(frame)) => {
                    let _ = socket.send(close_message(frame)).await;
                    break;
                }
                Some(Event::Error(reason)) => {
                    let _ = socket.send(close_message(CloseFrame::new(CLOSE_INTERNAL_ERROR, reason))).await;
                    break;
                }
                None => {
                    let _ = socket.send(close_message(CloseFrame::new(CLOSE_INTERNAL_ERROR, "session ended"))).await;
                    break;
                }
            },
        }
    }
}

fn forward(local: &Endpoint, message: Message) {
    if let Err(e) = local.send(message) {
        tracing::debug!(error = %e, "Dropping client frame");
    }
}

fn to_socket(message: Message) -> ws::Message {
    match message {
        Message::Text(text) => ws::Message::Text(text.into()),
        Message::Binary(bytes) => ws::Message::Binary(bytes.into()),
    }
}

fn close_message(frame: CloseFrame) -> ws::Message {
    ws::Message::Close(Some(ws::CloseFrame {
        code: frame.code,
        reason: frame.reason.into(),
    }))
}
