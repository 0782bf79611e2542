//! Configuration for the SSSP client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::transport::TransportKind;

/// Default SAVDI daemon socket path
pub const DEFAULT_SOCKET: &str = "/var/lib/savdid/sssp.sock";

/// Default connect and per-command timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default sleep between connect retries
pub const DEFAULT_RETRY_SLEEP: Duration = Duration::from_secs(1);

/// Connection settings for a [`Client`](crate::Client) session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Transport kind (Unix-domain or TCP)
    pub transport: TransportKind,

    /// Daemon address: a socket path for Unix kinds, `host:port` for TCP kinds
    pub address: String,

    // -------------------------------------------------------------------------
    // Timeout Configuration
    // -------------------------------------------------------------------------
    /// Timeout applied to each connect attempt
    pub connect_timeout: Duration,

    /// Deadline applied to every read and write within a command exchange
    pub cmd_timeout: Duration,

    // -------------------------------------------------------------------------
    // Retry Configuration
    // -------------------------------------------------------------------------
    /// Extra connect attempts after a timeout (total attempts = retries + 1)
    pub connect_retries: u32,

    /// Fixed sleep between connect attempts; no backoff growth
    pub retry_sleep: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: TransportKind::Unix,
            address: DEFAULT_SOCKET.to_string(),
            connect_timeout: DEFAULT_TIMEOUT,
            cmd_timeout: DEFAULT_TIMEOUT,
            connect_retries: 0,
            retry_sleep: DEFAULT_RETRY_SLEEP,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the transport kind
    pub fn transport(mut self, kind: TransportKind) -> Self {
        self.config.transport = kind;
        self
    }

    /// Set the daemon address (socket path or `host:port`)
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Shorthand for a Unix-domain socket target
    pub fn unix(self, path: impl Into<String>) -> Self {
        self.transport(TransportKind::Unix).address(path)
    }

    /// Shorthand for a TCP target
    pub fn tcp(self, address: impl Into<String>) -> Self {
        self.transport(TransportKind::Tcp).address(address)
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the per-command I/O deadline
    pub fn cmd_timeout(mut self, timeout: Duration) -> Self {
        self.config.cmd_timeout = timeout;
        self
    }

    /// Set the number of extra connect attempts after a timeout
    pub fn connect_retries(mut self, retries: u32) -> Self {
        self.config.connect_retries = retries;
        self
    }

    /// Set the sleep between connect retries
    pub fn retry_sleep(mut self, sleep: Duration) -> Self {
        self.config.retry_sleep = sleep;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
