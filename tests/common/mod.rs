//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use edge_dispatch::config::DispatchConfig;
use edge_dispatch::{HttpServer, Shutdown};

/// Start a mock upstream that answers every request with `200 OK` and `body`.
///
/// Returns the bound address.
pub async fn start_mock_upstream(body: &'static str) -> SocketAddr {
    start_mock_upstream_with_status("200 OK", body).await
}

/// Start a mock upstream that answers every request with `status_line` and `body`.
pub async fn start_mock_upstream_with_status(
    status_line: &'static str,
    body: &'static str,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Config pointing at `upstream` with a short reply delay.
pub fn test_config(upstream: SocketAddr) -> DispatchConfig {
    let mut config = DispatchConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.url = format!("http://{}/", upstream);
    config.upstream.delay_ms = 50;
    config.timeouts.request_secs = 5;
    config
}

/// Start the dispatcher on an ephemeral port.
pub async fn start_server(config: DispatchConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, shutdown.clone()).expect("valid config");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    (addr, shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
