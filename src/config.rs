//! Listener configuration
//!
//! The only environment input is `PORT`. Timeouts are fixed constants that
//! tests may override on the struct directly.

use std::time::Duration;

/// Port used when `PORT` is unset or empty
pub const DEFAULT_PORT: &str = "8080";

/// Upper bound for a client to deliver its request head
pub const READ_HEADER_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for in-flight requests to drain after a stop
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the listen port
const PORT_VAR: &str = "PORT";

/// Server configuration, immutable once the server starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port as given; not validated beyond what bind enforces
    pub port: String,
    pub read_header_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Create a config for the given port with default timeouts
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            read_header_timeout: READ_HEADER_TIMEOUT,
            shutdown_timeout: SHUTDOWN_TIMEOUT,
        }
    }

    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using a custom variable lookup
    ///
    /// An empty value is treated the same as an unset one.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup(PORT_VAR)
            .filter(|port| !port.is_empty())
            .unwrap_or_else(|| DEFAULT_PORT.to_string());
        Self::new(port)
    }

    /// Address handed to the listener: all interfaces on the configured port
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
