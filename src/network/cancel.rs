//! External stop signal
//!
//! Cancellation is cooperative: the connection polls the signal after every
//! single read or write, so a stop takes effect once the in-flight syscall
//! returns.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

/// Message that cancels the current operation
pub const STOP: &str = "stop";

/// Receiving end of a stop channel
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: Receiver<String>,
}

impl StopSignal {
    /// Wrap an existing receiver
    pub fn new(rx: Receiver<String>) -> Self {
        Self { rx }
    }

    /// Create a sender and its signal
    pub fn channel() -> (Sender<String>, Self) {
        let (tx, rx) = channel::unbounded();
        (tx, Self::new(rx))
    }

    /// Non-blocking poll. Consumes at most one pending message and reports
    /// whether it was a stop request; other messages are dropped.
    pub fn stop_requested(&self) -> bool {
        match self.rx.try_recv() {
            Ok(cmd) => cmd == STOP,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        }
    }
}

impl From<Receiver<String>> for StopSignal {
    fn from(rx: Receiver<String>) -> Self {
        Self::new(rx)
    }
}
