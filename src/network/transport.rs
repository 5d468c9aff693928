//! Byte stream transport
//!
//! The session talks to the device through any stream that can bound a single
//! read or write by a deadline and be torn down explicitly.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::Result;

/// Blocking byte stream used by a session
pub trait Transport: Read + Write {
    /// Bound the next read or write to `timeout` from now
    fn set_deadline(&mut self, timeout: Duration) -> io::Result<()>;

    /// Tear the stream down. Called once when the session drops it.
    fn close(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn set_deadline(&mut self, timeout: Duration) -> io::Result<()> {
        self.set_read_timeout(Some(timeout))?;
        self.set_write_timeout(Some(timeout))
    }

    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn set_deadline(&mut self, timeout: Duration) -> io::Result<()> {
        (**self).set_deadline(timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Open a TCP connection to `address`, trying each resolved socket address
/// in turn with `timeout` per attempt.
pub fn dial(address: &str, timeout: Duration) -> Result<TcpStream> {
    let mut last_err = None;

    for addr in address.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                // Words are written in small pieces; don't let Nagle hold them back
                stream.set_nodelay(true)?;
                tracing::debug!("Connected to {}", addr);
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} resolved to no addresses", address),
            )
        })
        .into())
}
