//! Shared helpers for server tests

#![allow(clippy::expect_used)]

use super::{ServeError, Server, ServerHandle};
use crate::config::ServerConfig;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Bind an ephemeral loopback port for a test server
pub async fn ephemeral_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");
    (listener, addr)
}

/// Build a server on an ephemeral port, optionally with a custom router
pub async fn test_server(config: &ServerConfig, router: Option<Router>) -> (Server, SocketAddr) {
    let (listener, addr) = ephemeral_listener().await;
    let mut server = Server::new(config).listener(listener);
    if let Some(router) = router {
        server = server.router(router);
    }
    (server, addr)
}

/// Start a default health server in the background
pub async fn spawn_server() -> (
    SocketAddr,
    ServerHandle,
    JoinHandle<Result<(), ServeError>>,
) {
    let (server, addr) = test_server(&ServerConfig::default(), None).await;
    let handle = server.handle();
    let task = tokio::spawn(server.listen_and_serve());
    (addr, handle, task)
}
