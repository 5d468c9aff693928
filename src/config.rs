//! Configuration for API sessions
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{ApiError, Result};

/// Default API port (plaintext service)
pub const DEFAULT_PORT: u16 = 8728;

/// Main configuration for an API session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Device address (host:port)
    pub address: String,

    /// Timeout applied to the dial and to every single read/write (milliseconds)
    pub timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Framing Configuration
    // -------------------------------------------------------------------------
    /// Largest word length accepted from the device (bytes)
    pub max_word_len: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: format!("192.168.88.1:{}", DEFAULT_PORT),
            timeout_ms: 5000,
            max_word_len: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Per-operation timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject settings a session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(ApiError::Config("address must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(ApiError::Config("timeout_ms must be greater than zero".to_string()));
        }
        if self.max_word_len == 0 {
            return Err(ApiError::Config("max_word_len must be greater than zero".to_string()));
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
    /// Set the device address (host:port)
    pub fn address(mut self, addr: impl Into<String>) -> Self {
        self.config.address = addr.into();
        self
    }

    /// Set the per-operation timeout (in milliseconds)
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set the largest accepted word length (in bytes)
    pub fn max_word_len(mut self, len: u32) -> Self {
        self.config.max_word_len = len;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
