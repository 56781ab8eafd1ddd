//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound
//!     → translate.rs (failure boundary, always active)
//!     → Dispatcher::handle
//!         Upgrade: websocket → duplex.rs (echo session, 101 / 426)
//!         otherwise          → responder.rs (fetch + delay, 200)
//!     → Reply
//! ```

pub mod duplex;
pub mod responder;
pub mod translate;

pub use duplex::DuplexSession;
pub use responder::HttpResponder;
pub use translate::translate;

use crate::error::DispatchResult;
use crate::http::{Inbound, Reply};

/// Routes each request to the responder or the duplex session.
#[derive(Clone)]
pub struct Dispatcher {
    responder: HttpResponder,
    session: DuplexSession,
}

impl Dispatcher {
    pub fn new(responder: HttpResponder, session: DuplexSession) -> Self {
        Self { responder, session }
    }

    pub fn responder(&self) -> &HttpResponder {
        &self.responder
    }

    /// Route by upgrade intent.
    pub async fn handle(&self, inbound: &Inbound) -> DispatchResult<Reply> {
        if inbound.wants_upgrade() {
            self.session.handle(inbound).await
        } else {
            self.responder.handle(inbound).await
        }
    }

    /// `handle` behind the failure-translation boundary.
    pub async fn serve(&self, inbound: &Inbound) -> Reply {
        translate(inbound, || self.handle(inbound)).await
    }
}
