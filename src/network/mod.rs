//! Network Module
//!
//! Client side of an API connection.
//!
//! ## Layers
//! - `Transport`: blocking byte stream with per-call deadlines
//! - `Connection`: word framing, traffic counters, stop polling
//! - `Session`: sentences, login, connection lifecycle

mod cancel;
mod connection;
mod session;
mod transport;

pub use cancel::{StopSignal, STOP};
pub use connection::{Connection, Traffic};
pub use session::{Session, SessionState};
pub use transport::{dial, Transport};
