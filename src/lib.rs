//! # mikrotik-api
//!
//! Blocking client for the MikroTik RouterOS API:
//! - Variable-length word framing
//! - Sentence assembly and reply parsing
//! - Plaintext and challenge-response login
//! - Per-call deadlines and cooperative cancellation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ commands / sentences
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Session                                │
//! │          (login, send_read_done, query, close)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ words
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Connection                               │
//! │     (length prefix, deadlines, counters, stop signal)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ bytes
//!                ┌──────▼──────┐
//!                │  Transport  │
//!                │ (TcpStream) │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod auth;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ApiError, Result};
pub use config::Config;
pub use network::{Session, SessionState, StopSignal, Traffic};
pub use protocol::{Command, Sentence, Status};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
