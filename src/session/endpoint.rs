//! Linked endpoint pairs.
//!
//! # Responsibilities
//! - Create two endpoints joined by a pair of unbounded channels
//! - Share one state cell so both ends open and close together
//! - Deliver frames, close frames and transport errors to the peer
//!
//! # Data Flow
//! ```text
//! local.send ──▶ [to_server] ──▶ server.recv
//! local.recv ◀── [to_local]  ◀── server.send
//! ```
//!
//! # Design Decisions
//! - Channels are unbounded; there is no flow control on a session
//! - Closing is idempotent and only the first close emits a close frame
//! - Events queued before closure stay readable after it

use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::session::state::{SessionInput, SessionState};
use crate::session::SessionError;

/// Normal closure.
pub const CLOSE_NORMAL: u16 = 1000;
/// Endpoint going away (server shutdown, peer vanished).
pub const CLOSE_GOING_AWAY: u16 = 1001;
/// Abnormal closure: an unexpected condition ended the session.
pub const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// Payload of a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Text(String),
    Binary(Vec<u8>),
}

impl Message {
    pub(crate) fn len(&self) -> usize {
        match self {
            Message::Text(text) => text.len(),
            Message::Binary(bytes) => bytes.len(),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

/// Close code and reason carried by a close frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFrame {
    pub code: u16,
    pub reason: String,
}

impl CloseFrame {
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

/// Everything one endpoint can observe from its peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A data frame.
    Message(Message),
    /// The peer closed the session.
    Close(CloseFrame),
    /// The peer's transport failed.
    Error(String),
}

/// One end of a duplex channel.
#[derive(Debug)]
pub struct Endpoint {
    /// Set on the end retained by the session; only it may accept.
    is_server: bool,
    state: Arc<watch::Sender<SessionState>>,
    outbound: mpsc::UnboundedSender<Event>,
    inbound: mpsc::UnboundedReceiver<Event>,
}

/// Two linked endpoints of one duplex channel.
#[derive(Debug)]
pub struct EndpointPair {
    pub local: Endpoint,
    pub server: Endpoint,
}

impl EndpointPair {
    /// Create a pair in the `Connecting` state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Connecting);
        let state = Arc::new(state);
        let (to_server, from_local) = mpsc::unbounded_channel();
        let (to_local, from_server) = mpsc::unbounded_channel();

        Self {
            local: Endpoint {
                is_server: false,
                state: state.clone(),
                outbound: to_server,
                inbound: from_server,
            },
            server: Endpoint {
                is_server: true,
                state,
                outbound: to_local,
                inbound: from_local,
            },
        }
    }

    pub fn split(self) -> (Endpoint, Endpoint) {
        (self.local, self.server)
    }
}

impl Default for EndpointPair {
    fn default() -> Self {
        Self::new()
    }
}

impl Endpoint {
    /// Current state of the pair.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_closed(&self) -> bool {
        self.state().is_closed()
    }

    /// Accept the session, enabling frame flow on both ends.
    ///
    /// Only the server-side endpoint may accept.
    pub fn accept(&self) -> Result<(), SessionError> {
        if !self.is_server {
            return Err(SessionError::AcceptOnLocal);
        }
        let state = self.transition(SessionInput::Accept);
        if state.is_open() {
            Ok(())
        } else {
            Err(SessionError::NotOpen(state))
        }
    }

    /// Send a frame to the peer.
    pub fn send(&self, message: Message) -> Result<(), SessionError> {
        let state = self.state();
        if !state.is_open() {
            return Err(SessionError::NotOpen(state));
        }
        self.outbound
            .send(Event::Message(message))
            .map_err(|_| SessionError::PeerGone)
    }

    /// Close the session from this side.
    ///
    /// Returns `true` if this call performed the closure.
    pub fn close(&self, code: u16, reason: impl Into<String>) -> bool {
        self.terminate(SessionInput::LocalClose, CloseFrame::new(code, reason))
    }

    /// Answer a peer-initiated close with the same code.
    pub fn acknowledge_close(&self, frame: &CloseFrame) -> bool {
        self.terminate(SessionInput::PeerClose, frame.clone())
    }

    /// Close after a transport error, with abnormal-closure code 1011.
    pub fn abort(&self, reason: impl Into<String>) -> bool {
        self.terminate(
            SessionInput::TransportError,
            CloseFrame::new(CLOSE_INTERNAL_ERROR, reason),
        )
    }

    /// Report a transport failure to the peer.
    ///
    /// State is left to the peer, which decides how to close.
    pub fn fail(&self, reason: impl Into<String>) {
        let _ = self.outbound.send(Event::Error(reason.into()));
    }

    /// Receive the next event from the peer.
    ///
    /// Returns `None` once the peer endpoint has been dropped and every
    /// queued event has been read.
    pub async fn recv(&mut self) -> Option<Event> {
        self.inbound.recv().await
    }

    /// Resolve once the pair is closed.
    pub async fn closed(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| state.is_closed()).await;
    }

    fn transition(&self, input: SessionInput) -> SessionState {
        self.state.send_if_modified(|state| {
            let next = state.next(input);
            let changed = next != *state;
            *state = next;
            changed
        });
        self.state()
    }

    fn terminate(&self, input: SessionInput, frame: CloseFrame) -> bool {
        let mut closed_here = false;
        self.state.send_if_modified(|state| {
            if state.is_closed() {
                return false;
            }
            *state = state.next(input);
            closed_here = true;
            true
        });

        if closed_here {
            let _ = self.outbound.send(Event::Close(frame));
        }
        closed_here
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_starts_connecting() {
        let pair = EndpointPair::new();
        assert_eq!(pair.local.state(), SessionState::Connecting);
        assert_eq!(pair.server.state(), SessionState::Connecting);
        assert!(!pair.local.is_server);
        assert!(pair.server.is_server);
    }

    #[test]
    fn send_before_accept_is_rejected() {
        let pair = EndpointPair::new();
        let err = pair.server.send("early".into()).unwrap_err();
        assert!(matches!(err, SessionError::NotOpen(SessionState::Connecting)));
    }

    #[test]
    fn only_server_side_accepts() {
        let pair = EndpointPair::new();
        assert!(matches!(pair.local.accept(), Err(SessionError::AcceptOnLocal)));
        pair.server.accept().unwrap();
        assert_eq!(pair.local.state(), SessionState::Open);
    }

    #[tokio::test]
    async fn frames_cross_in_both_directions() {
        let (mut local, mut server) = EndpointPair::new().split();
        server.accept().unwrap();

        local.send("ping".into()).unwrap();
        assert_eq!(server.recv().await, Some(Event::Message("ping".into())));

        server.send(Message::Binary(vec![1, 2, 3])).unwrap();
        assert_eq!(local.recv().await, Some(Event::Message(Message::Binary(vec![1, 2, 3]))));
    }

    #[tokio::test]
    async fn close_reaches_both_ends() {
        let (mut local, server) = EndpointPair::new().split();
        server.accept().unwrap();

        assert!(server.close(CLOSE_INTERNAL_ERROR, "broken"));
        assert!(!server.close(CLOSE_NORMAL, "again"));
        assert!(local.is_closed());
        assert!(server.is_closed());

        assert_eq!(
            local.recv().await,
            Some(Event::Close(CloseFrame::new(CLOSE_INTERNAL_ERROR, "broken")))
        );
        assert!(matches!(
            local.send("late".into()),
            Err(SessionError::NotOpen(SessionState::Closed))
        ));
    }

    #[tokio::test]
    async fn queued_frames_survive_closure() {
        let (mut local, server) = EndpointPair::new().split();
        server.accept().unwrap();
        server.send("last words".into()).unwrap();
        server.abort("setup failed");

        assert_eq!(local.recv().await, Some(Event::Message("last words".into())));
        assert!(matches!(
            local.recv().await,
            Some(Event::Close(CloseFrame { code: CLOSE_INTERNAL_ERROR, .. }))
        ));
    }

    #[tokio::test]
    async fn closed_resolves_after_close() {
        let (local, server) = EndpointPair::new().split();
        server.accept().unwrap();

        let waiter = tokio::spawn(async move { local.closed().await });
        server.close(CLOSE_NORMAL, "done");
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn dropped_peer_ends_recv() {
        let (local, mut server) = EndpointPair::new().split();
        drop(local);
        assert_eq!(server.recv().await, None);
    }
}
