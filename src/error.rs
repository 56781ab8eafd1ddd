//! Request-path error definitions.

use thiserror::Error;

use crate::session::SessionError;

/// Failures that escape a request handler.
///
/// A rejected upgrade is not an error: it is answered inline with 426.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Network or remote failure while fetching the upstream resource.
    #[error("upstream fetch from {url} failed: {detail}")]
    UpstreamFetch { url: String, detail: String },

    /// Endpoint misuse during session setup.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Any other failure escaping a handler; translated like the others.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UpstreamFetch { .. } => "upstream_fetch",
            DispatchError::Session(_) => "session",
            DispatchError::Internal(_) => "internal",
        }
    }
}

/// Result type for request handlers.
pub type DispatchResult<T> = Result<T, DispatchError>;
