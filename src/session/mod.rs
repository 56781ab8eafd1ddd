//! Duplex session primitives.
//!
//! # Data Flow
//! ```text
//! EndpointPair::new()
//!     → local endpoint   (handed to the WebSocket bridge)
//!     → server endpoint  (accepted and driven by the echo loop)
//!     → shared SessionState (state.rs), both ends close together
//! ```

pub mod endpoint;
pub mod state;

pub use endpoint::{
    CloseFrame, Endpoint, EndpointPair, Event, Message, CLOSE_GOING_AWAY,
    CLOSE_INTERNAL_ERROR, CLOSE_NORMAL,
};
pub use state::{SessionInput, SessionState};

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by endpoint operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Frames can only flow while the session is open.
    #[error("session is {0}, not open")]
    NotOpen(SessionState),

    #[error("only the server-side endpoint can accept a session")]
    AcceptOnLocal,

    /// The peer endpoint was dropped.
    #[error("peer endpoint is gone")]
    PeerGone,
}

/// Unique identifier for a duplex session, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ws-{}", self.0)
    }
}
