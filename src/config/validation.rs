//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the bind address resolves (`host:port`, names allowed) and the
//!   metrics address parses as a literal `ip:port`
//! - Check the upstream URL is an absolute http(s) URL
//! - Check the reply delay fits inside the request timeout
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>

use std::net::{SocketAddr, ToSocketAddrs};
use thiserror::Error;
use url::Url;

use crate::config::schema::DispatchConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid upstream url '{0}'")]
    InvalidUpstreamUrl(String),

    #[error("upstream url scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("upstream.delay_ms ({delay_ms}) must be shorter than the request timeout ({request_secs}s)")]
    DelayExceedsTimeout { delay_ms: u64, request_secs: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !resolves(&config.listener.bind_address) {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    match Url::parse(&config.upstream.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string())),
        Err(_) => errors.push(ValidationError::InvalidUpstreamUrl(config.upstream.url.clone())),
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    } else if config.upstream.delay() >= config.timeouts.request() {
        errors.push(ValidationError::DelayExceedsTimeout {
            delay_ms: config.upstream.delay_ms,
            request_secs: config.timeouts.request_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether `address` names at least one socket address, as the listener bind does.
fn resolves(address: &str) -> bool {
    address
        .to_socket_addrs()
        .is_ok_and(|mut addrs| addrs.next().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&DispatchConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = DispatchConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.upstream.url = "not a url".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::InvalidUpstreamUrl("not a url".into())));
    }

    #[test]
    fn bind_address_accepts_host_names() {
        let mut config = DispatchConfig::default();
        config.listener.bind_address = "localhost:8080".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.listener.bind_address = "localhost".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidAddress {
                field: "listener.bind_address",
                value: "localhost".into(),
            }])
        );
    }

    #[test]
    fn rejects_non_http_scheme() {
        let mut config = DispatchConfig::default();
        config.upstream.url = "ftp://example.com/file".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::UnsupportedScheme("ftp".into())])
        );
    }

    #[test]
    fn delay_must_fit_inside_timeout() {
        let mut config = DispatchConfig::default();
        config.timeouts.request_secs = 2;
        config.upstream.delay_ms = 2000;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::DelayExceedsTimeout {
                delay_ms: 2000,
                request_secs: 2
            }])
        );
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = DispatchConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
