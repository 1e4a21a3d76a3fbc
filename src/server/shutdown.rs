//! Graceful shutdown handling
//!
//! Handles SIGTERM and SIGINT signals for clean shutdown, and provides the
//! one-way flag used to hand a stop request to the serving task and the
//! drain notification back to the caller.

use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Failure to finish a graceful shutdown
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("connections did not drain within {0:?}")]
    Timeout(Duration),

    /// The serving task exited without draining (never started, failed, or panicked)
    #[error("server stopped without draining")]
    Stopped,
}

/// Receiving half of a shutdown flag
///
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait for shutdown signal
    pub async fn wait(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                // Sender dropped, treat as shutdown
                break;
            }
        }
    }

    /// Check if shutdown was signaled (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Sending half of a shutdown flag
#[derive(Debug)]
pub struct ShutdownController {
    sender: watch::Sender<bool>,
}

impl ShutdownController {
    /// Trigger shutdown
    ///
    /// Returns `true` only for the call that flipped the flag; later calls
    /// are no-ops. Works whether or not any receiver is still alive.
    pub fn shutdown(&self) -> bool {
        let first = self.sender.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });
        if first {
            debug!("Shutdown signal sent");
        }
        first
    }
}

/// Create a new shutdown signal pair
///
/// Returns (controller, signal) where:
/// - controller: Used to trigger shutdown
/// - signal: Cloned and passed to components that need to listen
pub fn shutdown_channel() -> (ShutdownController, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownController { sender }, ShutdownSignal { receiver })
}

/// Wait for SIGTERM or SIGINT signal
///
/// Handlers are registered on first poll. Returns the name of the signal
/// that was received, or the registration error.
#[cfg(unix)]
pub async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => Ok("SIGTERM"),
        _ = sigint.recv() => Ok("SIGINT"),
    }
}

/// Wait for Ctrl+C signal (Windows)
#[cfg(not(unix))]
pub async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("CTRL_C")
}
