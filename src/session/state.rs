//! Session state machine.
//!
//! # States
//! ```text
//! Connecting ──accept──▶ Open ──peer close / error / local close──▶ Closed
//! ```
//!
//! # Design Decisions
//! - `next` is total: every (state, input) pair has a successor
//! - `Closed` absorbs every input
//! - Messages never change state, so they are not inputs here

/// Lifecycle state shared by both endpoints of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Pair created, server side not yet accepted.
    Connecting,
    /// Server side accepted; frames flow in both directions.
    Open,
    /// Either side closed or the transport failed.
    Closed,
}

/// Inputs that drive the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    /// The server side accepted the session.
    Accept,
    /// The remote peer sent a close.
    PeerClose,
    /// The transport reported an error.
    TransportError,
    /// This side initiated the close.
    LocalClose,
}

impl SessionState {
    /// Compute the successor state for `input`.
    pub fn next(self, input: SessionInput) -> SessionState {
        use SessionInput::*;
        use SessionState::*;

        match (self, input) {
            (Connecting, Accept) => Open,
            (Open, Accept) => Open,
            (Connecting | Open, PeerClose | TransportError | LocalClose) => Closed,
            (Closed, _) => Closed,
        }
    }

    /// Whether frames may be sent in this state.
    pub fn is_open(self) -> bool {
        self == SessionState::Open
    }

    pub fn is_closed(self) -> bool {
        self == SessionState::Closed
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Connecting => "connecting",
            SessionState::Open => "open",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
