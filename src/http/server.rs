//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Attempt the WebSocket handshake for upgrade requests
//! - Convert dispatcher replies into wire responses
//! - Bind server to listener and shut down gracefully

use axum::{
    body::Body,
    extract::{ws::WebSocketUpgrade, FromRequestParts, State},
    http::{Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::{validate_config, ConfigError, DispatchConfig, ValidationError};
use crate::counter::SharedCounter;
use crate::dispatch::{Dispatcher, DuplexSession, HttpResponder};
use crate::http::request::Inbound;
use crate::http::response::{http_response, Reply};
use crate::http::websocket::bridge;
use crate::lifecycle::{shutdown_signal, Shutdown};
use crate::observability::metrics;
use crate::session::CLOSE_INTERNAL_ERROR;
use crate::upstream::{HttpUpstream, Upstream};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the dispatcher.
pub struct HttpServer {
    router: Router,
    config: DispatchConfig,
    counter: SharedCounter,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a server fetching from the configured upstream URL.
    pub fn new(config: DispatchConfig, shutdown: Shutdown) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let url = Url::parse(&config.upstream.url).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidUpstreamUrl(
                config.upstream.url.clone(),
            )])
        })?;

        Ok(Self::with_upstream(config, Arc::new(HttpUpstream::new(url)), shutdown))
    }

    /// Create a server with an explicit upstream source.
    pub fn with_upstream(
        config: DispatchConfig,
        upstream: Arc<dyn Upstream>,
        shutdown: Shutdown,
    ) -> Self {
        let counter = SharedCounter::new();
        let dispatcher = Dispatcher::new(
            HttpResponder::new(counter.clone(), upstream, config.upstream.delay()),
            DuplexSession::new(shutdown.clone()),
        );

        let state = AppState {
            dispatcher: Arc::new(dispatcher),
        };

        let router = Self::build_router(config.timeouts.request(), state);
        Self {
            router,
            config,
            counter,
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_timeout: Duration, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    // Outside the timeout so 408 responses carry the id too.
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            delay_ms = self.config.upstream.delay_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(self.shutdown))
            .await?;

        tracing::info!(invocations = self.counter.current(), "HTTP server stopped");
        Ok(())
    }

    /// Router with middleware, for driving the server without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn counter(&self) -> &SharedCounter {
        &self.counter
    }
}

/// Single entry point for every request.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (mut parts, _body) = request.into_parts();
    let inbound = Inbound::new(parts.method.clone(), parts.headers.clone());

    let upgrade = if inbound.wants_upgrade() {
        match WebSocketUpgrade::from_request_parts(&mut parts, &state).await {
            Ok(upgrade) => Some(upgrade),
            Err(rejection) => {
                tracing::debug!(
                    request_id = %inbound.request_id(),
                    reason = %rejection,
                    "WebSocket handshake rejected"
                );
                None
            }
        }
    } else {
        None
    };

    let inbound = inbound.with_upgradable(upgrade.is_some());
    let kind = if inbound.wants_upgrade() { "upgrade" } else { "http" };

    let reply = state.dispatcher.serve(&inbound).await;
    metrics::record_request(kind, reply.status().as_u16(), start);

    tracing::debug!(
        request_id = %inbound.request_id(),
        method = %inbound.method(),
        status = %reply.status(),
        "Request dispatched"
    );

    match (reply, upgrade) {
        (Reply::Http { status, body }, _) => http_response(status, body),
        (Reply::Switching(local), Some(upgrade)) => upgrade
            .on_failed_upgrade(|e: axum::Error| {
                tracing::warn!(error = %e, "WebSocket upgrade failed")
            })
            .on_upgrade(move |socket| bridge(socket, local)),
        (Reply::Switching(local), None) => {
            tracing::error!(request_id = %inbound.request_id(), "Session opened without an upgradable connection");
            local.close(CLOSE_INTERNAL_ERROR, "connection not upgradable");
            http_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("connection not upgradable".to_string()),
            )
        }
    }
}
