//! Outbound reply produced by the dispatcher.
//!
//! # Design Decisions
//! - A reply is either a plain HTTP response or a protocol switch
//! - A switch carries the local endpoint and never a body
//! - Conversion into a wire response happens once, in `server.rs`

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::session::Endpoint;

/// Handler result before it reaches the wire.
#[derive(Debug)]
pub enum Reply {
    /// Plain HTTP response.
    Http {
        status: StatusCode,
        body: Option<String>,
    },
    /// 101 Switching Protocols with the local endpoint to hand to the peer.
    Switching(Endpoint),
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::text(StatusCode::OK, body)
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Reply::Http {
            status,
            body: Some(body.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Http { status, .. } => *status,
            Reply::Switching(_) => StatusCode::SWITCHING_PROTOCOLS,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Reply::Http { body, .. } => body.as_deref(),
            Reply::Switching(_) => None,
        }
    }

    /// Take the attached endpoint, if this is a protocol switch.
    pub fn into_endpoint(self) -> Option<Endpoint> {
        match self {
            Reply::Switching(endpoint) => Some(endpoint),
            Reply::Http { .. } => None,
        }
    }
}

/// Build the wire response for a plain HTTP reply.
pub fn http_response(status: StatusCode, body: Option<String>) -> Response {
    match body {
        Some(body) => (status, body).into_response(),
        None => (status, Body::empty()).into_response(),
    }
}
