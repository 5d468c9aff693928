//! Shared test helpers
//!
//! `MockStream` replays scripted device bytes, optionally in small chunks,
//! and records everything the client writes.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::{self, Read, Write};
use std::rc::Rc;
use std::time::Duration;

use mikrotik_api::network::Transport;
use mikrotik_api::protocol::{decode_length, encode_sentence};
use mikrotik_api::{ApiError, Config};

/// Observes a MockStream after the session took ownership of it
#[derive(Clone, Default)]
pub struct Probe {
    written: Rc<RefCell<Vec<u8>>>,
    closed: Rc<Cell<bool>>,
    deadlines: Rc<Cell<usize>>,
}

impl Probe {
    pub fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }

    pub fn closed(&self) -> bool {
        self.closed.get()
    }

    pub fn deadlines(&self) -> usize {
        self.deadlines.get()
    }

    /// Sentences the client wrote, as lists of words
    pub fn sentences(&self) -> Vec<Vec<String>> {
        split_sentences(&self.written())
    }
}

pub struct MockStream {
    input: Vec<u8>,
    pos: usize,
    read_chunk: usize,
    write_budget: Option<usize>,
    probe: Probe,
}

impl MockStream {
    pub fn new(input: Vec<u8>) -> (Self, Probe) {
        let probe = Probe::default();
        let stream = Self {
            input,
            pos: 0,
            read_chunk: usize::MAX,
            write_budget: None,
            probe: probe.clone(),
        };
        (stream, probe)
    }

    /// Return at most `n` bytes per read call
    pub fn read_chunk(mut self, n: usize) -> Self {
        self.read_chunk = n;
        self
    }

    /// Accept only `n` bytes in total; later writes come up short
    pub fn write_budget(mut self, n: usize) -> Self {
        self.write_budget = Some(n);
        self
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.input.len() - self.pos;
        let n = buf.len().min(self.read_chunk).min(remaining);
        buf[..n].copy_from_slice(&self.input[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let accepted = match self.write_budget.as_mut() {
            Some(budget) => {
                let n = buf.len().min(*budget);
                *budget -= n;
                n
            }
            None => buf.len(),
        };
        self.probe.written.borrow_mut().extend_from_slice(&buf[..accepted]);
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for MockStream {
    fn set_deadline(&mut self, _timeout: Duration) -> io::Result<()> {
        self.probe.deadlines.set(self.probe.deadlines.get() + 1);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.probe.closed.set(true);
        Ok(())
    }
}

// =============================================================================
// Wire Helpers
// =============================================================================

/// Encode several sentences back to back
pub fn script(sentences: &[&[&str]]) -> Vec<u8> {
    sentences
        .iter()
        .flat_map(|words| encode_sentence(*words).to_vec())
        .collect()
}

/// Split raw client output into sentences of words
pub fn split_sentences(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut pos = 0;
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    while pos < bytes.len() {
        let len = decode_length(|| {
            let b = bytes.get(pos).copied().ok_or(ApiError::ShortRead {
                read: 0,
                expected: 1,
            })?;
            pos += 1;
            Ok(b)
        })
        .expect("valid length prefix") as usize;

        if len == 0 {
            sentences.push(std::mem::take(&mut current));
            continue;
        }

        current.push(String::from_utf8_lossy(&bytes[pos..pos + len]).into_owned());
        pos += len;
    }

    assert!(current.is_empty(), "unterminated sentence: {:?}", current);
    sentences
}

pub fn test_config() -> Config {
    Config::builder()
        .address("mock:8728")
        .timeout_ms(100)
        .build()
}
