//! Error types for the API client
//!
//! Every error returned by a session is terminal: the session has already
//! dropped its connection by the time the caller sees it.

use thiserror::Error;

/// Result type alias using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Unified error type for API client operations
#[derive(Debug, Error)]
pub enum ApiError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Short write: wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    #[error("Short read: got {read} bytes, {expected} remaining")]
    ShortRead { read: usize, expected: usize },

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Invalid length prefix byte: 0x{0:02x}")]
    InvalidLength(u8),

    #[error("Word too large: {len} bytes (max {max})")]
    WordTooLarge { len: u64, max: u64 },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Device trap: {}", .message.as_deref().unwrap_or("!trap without message received"))]
    Trap { message: Option<String> },

    #[error("Invalid login challenge: {0}")]
    Challenge(#[from] hex::FromHexError),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Operation cancelled by stop signal")]
    Cancelled,

    #[error("Session already connected")]
    AlreadyConnected,

    #[error("Session not connected")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Build a protocol violation error
    pub fn protocol(msg: impl Into<String>) -> Self {
        ApiError::Protocol(msg.into())
    }
}
