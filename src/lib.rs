//! Edge request dispatcher: plain HTTP via one upstream fetch, WebSocket
//! upgrades via a duplex echo session.

pub mod config;
pub mod counter;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;
pub mod upstream;

pub use config::DispatchConfig;
pub use dispatch::Dispatcher;
pub use error::DispatchError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
