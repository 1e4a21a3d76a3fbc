//! Service template: a health-check HTTP server with graceful shutdown.
//!
//! - [`config`] - Listener configuration from the environment
//! - [`server`] - Health endpoint, connection loop, and shutdown lifecycle
//! - [`version`] - Build version string used by the `seed` command

pub mod config;
pub mod server;
pub mod version;
