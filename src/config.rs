//! Configuration for memcwire
//!
//! Centralized configuration with sensible defaults. A `Config` is handed to
//! every client and server connection, so the body limit is scoped per
//! listener or per client rather than process-wide.

use crate::error::{McError, Result};

/// Default maximum accepted value length (1,000,000 bytes)
pub const DEFAULT_MAX_BODY_LEN: u32 = 1_000_000;

/// Main configuration for a memcwire client or server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Largest value length a decoded header may declare.
    /// Larger declarations are rejected before any buffer is allocated.
    pub max_body_len: u32,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_body_len: DEFAULT_MAX_BODY_LEN,
            listen_addr: "127.0.0.1:11211".to_string(),
            max_connections: 1024,
            // memcached clients keep idle connections open
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the values that would make a server or client unusable
    pub fn validate(&self) -> Result<()> {
        if self.max_body_len == 0 {
            return Err(McError::Config("max_body_len must be non-zero".to_string()));
        }
        if self.max_connections == 0 {
            return Err(McError::Config(
                "max_connections must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximum accepted value length (in bytes)
    pub fn max_body_len(mut self, len: u32) -> Self {
        self.config.max_body_len = len;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
