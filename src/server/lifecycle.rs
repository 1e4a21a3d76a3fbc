//! Server lifecycle: serve until told to stop, then drain
//!
//! The main task races two events, whichever comes first:
//! 1. A termination signal (SIGINT/SIGTERM)
//! 2. The serving task exiting on its own
//!
//! A signal or the closed sentinel leads to a graceful shutdown bounded by a
//! timeout. Any other serving error is fatal and skips the shutdown.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::task::JoinError;
use tracing::{error, info, warn};

use super::serve::{ServeError, Server};
use super::shutdown::{wait_for_signal, ShutdownError};
use crate::config::ServerConfig;

/// Run the health server until SIGINT or SIGTERM
pub async fn run(config: &ServerConfig) -> Result<(), ServeError> {
    run_until(Server::new(config), wait_for_signal(), config.shutdown_timeout).await
}

/// Run `server` until `trigger` resolves or the server stops by itself
///
/// `trigger` yields the name of what asked for the stop. A timed out drain
/// is logged and still returns `Ok`. A serving error is returned even when it
/// races with the trigger.
pub async fn run_until<F>(
    server: Server,
    trigger: F,
    shutdown_timeout: Duration,
) -> Result<(), ServeError>
where
    F: Future<Output = io::Result<&'static str>>,
{
    let handle = server.handle();
    let mut serving = tokio::spawn(server.listen_and_serve());

    let serving_done = tokio::select! {
        signal = trigger => match signal {
            Ok(signal) => {
                info!(signal = signal, "Shutdown signal received");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to wait for shutdown signal");
                serving.abort();
                return Err(ServeError::Signal(e));
            }
        },
        result = &mut serving => {
            fatal_or_closed(result)?;
            true
        }
    };

    match handle.shutdown(shutdown_timeout).await {
        Ok(()) => info!("Server shut down gracefully"),
        // Serving task ended on its own while we were asking it to stop
        Err(ShutdownError::Stopped) if !serving_done => {
            fatal_or_closed(serving.await)?;
        }
        Err(e) => warn!(error = %e, "Graceful shutdown failed"),
    }

    Ok(())
}

/// Pass the closed sentinel through as success, log anything else as fatal
fn fatal_or_closed(joined: Result<Result<(), ServeError>, JoinError>) -> Result<(), ServeError> {
    match joined.map_err(ServeError::from).and_then(|served| served) {
        Ok(()) => Ok(()),
        Err(e) if e.is_closed() => Ok(()),
        Err(e) => {
            error!(error = %e, "Server error");
            Err(e)
        }
    }
}
