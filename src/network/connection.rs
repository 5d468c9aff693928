//! Word framing over a transport
//!
//! Reads and writes single words. Every underlying read or write gets a fresh
//! deadline, is counted into the session traffic, and is followed by a poll of
//! the stop signal. Errors are returned as-is; the owning session drops the
//! connection on any of them.

use std::time::{Duration, SystemTime};

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::protocol::{decode_length, encode_length};
use super::cancel::StopSignal;
use super::transport::Transport;

/// Bytes transferred since `since`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traffic {
    /// Bytes read from the device
    pub bytes_in: u64,

    /// Bytes written to the device
    pub bytes_out: u64,

    /// When the counters were last reset
    pub since: SystemTime,
}

impl Traffic {
    /// Zeroed counters starting now
    pub fn new() -> Self {
        Self {
            bytes_in: 0,
            bytes_out: 0,
            since: SystemTime::now(),
        }
    }
}

impl Default for Traffic {
    fn default() -> Self {
        Self::new()
    }
}

/// An open connection to a device
pub struct Connection<S: Transport> {
    /// Underlying byte stream
    stream: S,

    /// Deadline applied before each read/write
    timeout: Duration,

    /// Largest inbound word accepted
    max_word_len: u32,

    /// Optional external stop signal
    stop: Option<StopSignal>,
}

impl<S: Transport> Connection<S> {
    /// Wrap an open stream
    pub fn new(stream: S, config: &Config, stop: Option<StopSignal>) -> Self {
        Self {
            stream,
            timeout: config.timeout(),
            max_word_len: config.max_word_len,
            stop,
        }
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Write one word: length prefix, then payload
    pub fn write_word(&mut self, traffic: &mut Traffic, word: &[u8]) -> Result<()> {
        let len = u32::try_from(word.len()).map_err(|_| ApiError::WordTooLarge {
            len: word.len() as u64,
            max: u64::from(u32::MAX),
        })?;

        if word.is_empty() {
            tracing::trace!("> :EMPTY:");
        } else {
            tracing::trace!("> {}", String::from_utf8_lossy(word));
        }

        self.write_once(traffic, &encode_length(len))?;
        if !word.is_empty() {
            self.write_once(traffic, word)?;
        }
        Ok(())
    }

    /// One underlying write that must transfer all of `buf`
    fn write_once(&mut self, traffic: &mut Traffic, buf: &[u8]) -> Result<()> {
        self.stream.set_deadline(self.timeout)?;
        let written = self.stream.write(buf)?;
        traffic.bytes_out += written as u64;

        if written != buf.len() {
            return Err(ApiError::ShortWrite {
                written,
                expected: buf.len(),
            });
        }

        self.check_stop()
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Read one word. An empty word comes back as an empty Vec.
    pub fn read_word(&mut self, traffic: &mut Traffic) -> Result<Vec<u8>> {
        let len = decode_length(|| self.read_byte(&mut *traffic))?;

        if len > self.max_word_len {
            return Err(ApiError::WordTooLarge {
                len: u64::from(len),
                max: u64::from(self.max_word_len),
            });
        }

        if len == 0 {
            tracing::trace!("< :EMPTY:");
            return Ok(Vec::new());
        }

        let expected = len as usize;
        let mut buf = vec![0u8; expected];
        let mut filled = 0;

        while filled < expected {
            let remaining = expected - filled;

            self.stream.set_deadline(self.timeout)?;
            let read = self.stream.read(&mut buf[filled..])?;
            traffic.bytes_in += read as u64;

            if read == 0 || read > remaining {
                return Err(ApiError::ShortRead {
                    read,
                    expected: remaining,
                });
            }

            self.check_stop()?;
            filled += read;
        }

        tracing::trace!("< {}", String::from_utf8_lossy(&buf));
        Ok(buf)
    }

    /// Read exactly one byte of a length prefix
    fn read_byte(&mut self, traffic: &mut Traffic) -> Result<u8> {
        let mut byte = [0u8; 1];

        self.stream.set_deadline(self.timeout)?;
        let read = self.stream.read(&mut byte)?;
        traffic.bytes_in += read as u64;

        if read != 1 {
            return Err(ApiError::ShortRead { read, expected: 1 });
        }

        self.check_stop()?;
        Ok(byte[0])
    }

    fn check_stop(&self) -> Result<()> {
        match &self.stop {
            Some(stop) if stop.stop_requested() => Err(ApiError::Cancelled),
            _ => Ok(()),
        }
    }
}

impl<S: Transport> Drop for Connection<S> {
    fn drop(&mut self) {
        if let Err(e) = self.stream.close() {
            tracing::debug!("Error closing connection: {}", e);
        }
    }
}
