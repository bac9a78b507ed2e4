//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use iviewer_routes::config::ServerConfig;
use iviewer_routes::http::{HttpServer, ViewHandler};
use iviewer_routes::lifecycle::Shutdown;

/// A config mounting the routes under `prefix`.
pub fn config_with_prefix(prefix: &str) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.routing.mount_prefix = prefix.to_string();
    config
}

/// Start a server on an ephemeral port. Returns its address and the
/// coordinator that stops it.
pub async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    spawn(server).await
}

/// Start a server with a custom view handler.
#[allow(dead_code)]
pub async fn start_server_with(config: ServerConfig, handler: Arc<dyn ViewHandler>) -> (SocketAddr, Shutdown) {
    let server = HttpServer::with_handler(config, handler).unwrap();
    spawn(server).await
}

async fn spawn(server: HttpServer) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind(&server.config().listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
