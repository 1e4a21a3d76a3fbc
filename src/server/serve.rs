//! Connection loop for the health server
//!
//! Connections are served over HTTP/1.1 only, without upgrade support, so a
//! connection is never handed off to another protocol handler that would
//! escape the header timeout and the graceful shutdown below.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use super::health::build_router;
use super::shutdown::{shutdown_channel, ShutdownController, ShutdownError, ShutdownSignal};
use crate::config::ServerConfig;

/// Pause after an accept error that is not tied to a single connection
/// (e.g. file descriptor exhaustion)
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Reasons the serving task stopped
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Returned after an intentional stop; not a failure
    #[error("server closed")]
    Closed,

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("failed to register signal handlers: {0}")]
    Signal(#[source] io::Error),
}

impl ServeError {
    /// Whether this is the sentinel for an intentional stop
    pub fn is_closed(&self) -> bool {
        matches!(self, ServeError::Closed)
    }
}

/// Handle for stopping a running [`Server`] from another task
#[derive(Debug, Clone)]
pub struct ServerHandle {
    stop: Arc<ShutdownController>,
    drained: ShutdownSignal,
}

impl ServerHandle {
    /// Stop accepting connections and wait for open ones to finish
    ///
    /// Only the first call stops the server; every call waits on the same
    /// drain. The wait is cut off after `timeout`. Returns
    /// [`ShutdownError::Stopped`] if the server is gone without having drained.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), ShutdownError> {
        if self.stop.shutdown() {
            info!("Stop requested, no longer accepting connections");
        }

        let mut drained = self.drained.clone();
        tokio::time::timeout(timeout, drained.wait())
            .await
            .map_err(|_| ShutdownError::Timeout(timeout))?;

        // wait() also returns once the serving side is dropped
        if drained.is_shutdown() {
            Ok(())
        } else {
            Err(ShutdownError::Stopped)
        }
    }

    /// Whether the server has finished draining
    pub fn is_drained(&self) -> bool {
        self.drained.is_shutdown()
    }
}

/// Health server, not yet listening
pub struct Server {
    addr: String,
    router: Router,
    read_header_timeout: Duration,
    listener: Option<TcpListener>,
    handle: ServerHandle,
    stop: ShutdownSignal,
    drained: ShutdownController,
}

impl Server {
    /// Create a server for the configured address serving [`build_router`]
    pub fn new(config: &ServerConfig) -> Self {
        let (stop_controller, stop_signal) = shutdown_channel();
        let (drained_controller, drained_signal) = shutdown_channel();

        Self {
            addr: config.bind_addr(),
            router: build_router(),
            read_header_timeout: config.read_header_timeout,
            listener: None,
            handle: ServerHandle {
                stop: Arc::new(stop_controller),
                drained: drained_signal,
            },
            stop: stop_signal,
            drained: drained_controller,
        }
    }

    /// Serve a different router
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Serve on an already bound listener instead of binding the configured address
    pub fn listener(mut self, listener: TcpListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Get a handle for stopping the server
    pub fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    /// Bind and accept connections until a stop is requested
    ///
    /// Returns [`ServeError::Closed`] once every connection has drained after
    /// a stop, or [`ServeError::Bind`] if the address cannot be bound.
    pub async fn listen_and_serve(self) -> Result<(), ServeError> {
        let Self {
            addr,
            router,
            read_header_timeout,
            listener,
            // Held so the stop flag stays open while serving
            handle: _handle,
            mut stop,
            drained,
        } = self;

        let listener = match listener {
            Some(listener) => listener,
            None => TcpListener::bind(&addr)
                .await
                .map_err(|source| ServeError::Bind { addr, source })?,
        };
        // Log after successful bind - server is actually listening
        match listener.local_addr() {
            Ok(local) => info!(addr = %local, "Health server listening (HTTP)"),
            Err(_) => info!("Health server listening (HTTP)"),
        }

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(read_header_timeout);

        let service = TowerToHyperService::new(router);
        let graceful = GracefulShutdown::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        serve_connection(&builder, &graceful, stream, remote, service.clone());
                    }
                    Err(e) => handle_accept_error(e).await,
                },
                _ = stop.wait() => break,
            }
        }

        drop(listener);
        debug!("Listener closed, draining connections");
        graceful.shutdown().await;
        drained.shutdown();
        info!("All connections drained");

        Err(ServeError::Closed)
    }
}

/// Spawn a task serving one connection, tracked for graceful shutdown
fn serve_connection(
    builder: &http1::Builder,
    graceful: &GracefulShutdown,
    stream: TcpStream,
    remote: SocketAddr,
    service: TowerToHyperService<Router>,
) {
    let conn = builder.serve_connection(TokioIo::new(stream), service);
    let conn = graceful.watch(conn);

    tokio::spawn(async move {
        // Includes header timeouts and clients going away mid-response
        if let Err(e) = conn.await {
            debug!(remote = %remote, error = %e, "Connection closed with error");
        }
    });
}

/// Errors raised for a single connection that never made it through accept
fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}

async fn handle_accept_error(e: io::Error) {
    if is_connection_error(&e) {
        debug!(error = %e, "Connection dropped before accept");
        return;
    }

    warn!(error = %e, "Failed to accept connection, backing off");
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}
