//! HTTP server for the health endpoint
//!
//! Provides the liveness probe:
//! - `/healthz` - Process is running
//!
//! Also provides graceful shutdown handling for SIGTERM/SIGINT.

mod health;
pub mod lifecycle;
mod serve;
pub mod shutdown;

pub use health::build_router;
pub use lifecycle::{run, run_until};
pub use serve::{ServeError, Server, ServerHandle};
pub use shutdown::{
    shutdown_channel, wait_for_signal, ShutdownController, ShutdownError, ShutdownSignal,
};

#[cfg(test)]
mod test_support;

#[cfg(test)]
#[path = "health_test.rs"]
mod health_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;

#[cfg(test)]
#[path = "serve_test.rs"]
mod serve_tests;

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_tests;
