//! Error types for memctl
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using McError
pub type Result<T> = std::result::Result<T, McError>;

/// Unified error type for memctl operations
#[derive(Debug, Error)]
pub enum McError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Cache miss")]
    CacheMiss,

    #[error("Key not found")]
    KeyNotFound,

    #[error("Set failed: server replied {0:?}")]
    SetFailed(String),

    #[error("Delete failed: server replied {0:?}")]
    DeleteFailed(String),

    // -------------------------------------------------------------------------
    // Routing Errors
    // -------------------------------------------------------------------------
    #[error("No available server")]
    NoAvailableServer,

    #[error("Invalid server index: {0}")]
    InvalidServerIndex(usize),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl McError {
    /// Classify an I/O error, separating deadline expiry from other failures.
    ///
    /// Read/write timeouts surface as `WouldBlock` on Unix and `TimedOut` on
    /// Windows; both become [`McError::Timeout`] so callers can distinguish a
    /// slow or unreachable server from a protocol violation.
    pub fn from_io(err: std::io::Error, context: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                McError::Timeout(format!("{}: {}", context, err))
            }
            _ => McError::Io(err),
        }
    }
}
