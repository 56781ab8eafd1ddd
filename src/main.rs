//! Edge request dispatcher.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http server ──▶ translate (failure boundary) ──▶ Dispatcher
//!                                                                 │
//!                        ┌────────────────────────────────────────┴──┐
//!                        │ no upgrade                 Upgrade: websocket
//!                        ▼                                           ▼
//!                 HttpResponder                               DuplexSession
//!           counter → fetch → delay                  endpoint pair → echo task
//!                        │                                           │
//!                        ▼                                           ▼
//!               200 "Hello World …"                     101 + ws bridge (frames)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_dispatch::config::{load_config, DispatchConfig};
use edge_dispatch::observability::{logging, metrics};
use edge_dispatch::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "edge-dispatch")]
#[command(about = "Edge request dispatcher with WebSocket echo sessions", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DispatchConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!("edge-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        delay_ms = config.upstream.delay_ms,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, Shutdown::new())?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
