//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handshake attempt)
//!     → request.rs (Inbound: method, headers, upgrade intent)
//!     → dispatch (responder or duplex session)
//!     → response.rs (Reply → status + body, or 101)
//!     → websocket.rs (bridge socket ↔ local endpoint)
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use request::{Inbound, WEBSOCKET_PROTOCOL, X_REQUEST_ID};
pub use response::Reply;
pub use server::HttpServer;
