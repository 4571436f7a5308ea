//! Configuration for memctl
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::locator::HashAlgorithm;

/// Client configuration
///
/// Two deadlines are carried, matching the two traffic classes:
/// control traffic (stats, topology queries, item dumps) runs on a short
/// deadline, while data traffic (get/set/delete payloads) gets a longer one.
/// Both apply per call, to connect as well as read/write.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Timeout Configuration
    // -------------------------------------------------------------------------
    /// Deadline for control operations (milliseconds)
    pub control_timeout_ms: u64,

    /// Deadline for data operations (milliseconds)
    pub data_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Routing Configuration
    // -------------------------------------------------------------------------
    /// Key-hashing algorithm used to map keys to nodes
    pub hash_algorithm: HashAlgorithm,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            control_timeout_ms: 100,
            data_timeout_ms: 10_000,
            hash_algorithm: HashAlgorithm::Native,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Control deadline as a `Duration`
    pub fn control_timeout(&self) -> Duration {
        Duration::from_millis(self.control_timeout_ms)
    }

    /// Data deadline as a `Duration`
    pub fn data_timeout(&self) -> Duration {
        Duration::from_millis(self.data_timeout_ms)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the control-operation timeout (in milliseconds)
    pub fn control_timeout_ms(mut self, ms: u64) -> Self {
        self.config.control_timeout_ms = ms;
        self
    }

    /// Set the data-operation timeout (in milliseconds)
    pub fn data_timeout_ms(mut self, ms: u64) -> Self {
        self.config.data_timeout_ms = ms;
        self
    }

    /// Set the key-hashing algorithm
    pub fn hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.hash_algorithm = algorithm;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
