//! Inbound request view.
//!
//! # Responsibilities
//! - Carry method and headers from the HTTP layer to the dispatcher
//! - Answer whether the client asked for a WebSocket upgrade
//! - Record whether the transport can actually perform that upgrade
//!
//! # Design Decisions
//! - Header *names* are case-insensitive (HTTP semantics)
//! - The `Upgrade` *value* must be exactly `websocket`
//! - The request ID is read from `x-request-id`, set by the middleware stack

use axum::http::{header, HeaderMap, Method};

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The only `Upgrade` value that selects the duplex path.
pub const WEBSOCKET_PROTOCOL: &str = "websocket";

/// What the dispatcher needs to know about a request.
#[derive(Debug, Clone)]
pub struct Inbound {
    method: Method,
    headers: HeaderMap,
    upgradable: bool,
}

impl Inbound {
    /// Create a request view that the transport cannot upgrade.
    pub fn new(method: Method, headers: HeaderMap) -> Self {
        Self {
            method,
            headers,
            upgradable: false,
        }
    }

    /// Mark whether the transport accepted the upgrade handshake.
    pub fn with_upgradable(mut self, upgradable: bool) -> Self {
        self.upgradable = upgradable;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Whether the client asked for `Upgrade: websocket`.
    pub fn wants_upgrade(&self) -> bool {
        self.headers
            .get(header::UPGRADE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == WEBSOCKET_PROTOCOL)
    }

    /// Whether the request is an upgrade the transport can honour.
    pub fn is_upgradable(&self) -> bool {
        self.wants_upgrade() && self.upgradable
    }

    pub fn request_id(&self) -> &str {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_upgrade(value: &'static str) -> Inbound {
        let mut headers = HeaderMap::new();
        headers.insert(header::UPGRADE, HeaderValue::from_static(value));
        Inbound::new(Method::GET, headers)
    }

    #[test]
    fn upgrade_value_is_case_sensitive() {
        assert!(with_upgrade("websocket").wants_upgrade());
        assert!(!with_upgrade("WebSocket").wants_upgrade());
        assert!(!with_upgrade("h2c").wants_upgrade());
        assert!(!Inbound::new(Method::GET, HeaderMap::new()).wants_upgrade());
    }

    #[test]
    fn upgradable_requires_intent() {
        let plain = Inbound::new(Method::GET, HeaderMap::new()).with_upgradable(true);
        assert!(!plain.is_upgradable());

        assert!(!with_upgrade("websocket").is_upgradable());
        assert!(with_upgrade("websocket").with_upgradable(true).is_upgradable());
    }

    #[test]
    fn request_id_defaults_to_unknown() {
        let inbound = Inbound::new(Method::GET, HeaderMap::new());
        assert_eq!(inbound.request_id(), "unknown");

        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(Inbound::new(Method::GET, headers).request_id(), "abc");
    }
}
