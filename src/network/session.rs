//! API Session
//!
//! Owns one connection to a device and runs sentences over it. Every error,
//! whether I/O, framing, protocol or a device trap, drops the connection
//! before it is returned, leaving the session `Disconnected`. Nothing is
//! retried; reconnecting is up to the caller.

use std::net::TcpStream;

use crate::auth::{challenge_response, CHALLENGE_KEY};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::protocol::{parse_attribute, parse_status, Command, Sentence, Status};
use super::cancel::StopSignal;
use super::connection::{Connection, Traffic};
use super::transport::{dial, Transport};

const NO_KEYS: &[&str] = &[];

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// A client session with one device
pub struct Session<S: Transport = TcpStream> {
    /// Session configuration
    config: Config,

    /// Live connection, `None` while disconnected
    conn: Option<Connection<S>>,

    /// Current lifecycle state
    state: SessionState,

    /// Byte counters, kept across reconnects
    traffic: Traffic,

    /// Stop signal handed to every connection
    stop: Option<StopSignal>,
}

impl<S: Transport> Session<S> {
    /// Create a disconnected session
    pub fn new(config: Config) -> Self {
        Self {
            config,
            conn: None,
            state: SessionState::Disconnected,
            traffic: Traffic::new(),
            stop: None,
        }
    }

    /// Cancel in-flight operations when `stop` receives `"stop"`
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Snapshot of the byte counters
    pub fn traffic(&self) -> Traffic {
        self.traffic
    }

    /// Zero the byte counters and restart their timestamp
    pub fn reset_traffic(&mut self) {
        self.traffic = Traffic::new();
    }

    // =========================================================================
    // Connection Lifecycle
    // =========================================================================

    /// Adopt an already open stream. No login is performed.
    pub fn attach(&mut self, stream: S) -> Result<()> {
        if self.is_connected() {
            return Err(ApiError::AlreadyConnected);
        }

        self.conn = Some(Connection::new(stream, &self.config, self.stop.clone()));
        self.state = SessionState::Connected;
        tracing::debug!("Session connected to {}", self.config.address);
        Ok(())
    }

    /// Drop the connection. Safe to call when already disconnected.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            tracing::debug!("Closing connection to {}", self.config.address);
        }
        self.state = SessionState::Disconnected;
    }

    /// Log in over the attached connection.
    ///
    /// Sends the plaintext credentials first. If the device answers with a
    /// `=ret` challenge, a second `/login` carrying the digest response is
    /// sent.
    pub fn login(&mut self, user: &str, password: &str) -> Result<()> {
        let reply = self.send_read_done(Command::login(user, password).words())?;

        let challenge = match reply.get(CHALLENGE_KEY) {
            Some(challenge) => challenge,
            None => {
                tracing::debug!("Plaintext login accepted for {}", user);
                return Ok(());
            }
        };

        let response = match challenge_response(password, challenge) {
            Ok(response) => response,
            Err(e) => return self.fail(e),
        };

        self.send_read_done(Command::login_response(user, &response).words())?;
        tracing::debug!("Challenge login accepted for {}", user);
        Ok(())
    }

    // =========================================================================
    // Sentences
    // =========================================================================

    /// Send `words` as one sentence followed by the empty terminator word
    pub fn send<W: AsRef<[u8]>>(&mut self, words: &[W]) -> Result<()> {
        for word in words {
            self.io(|conn, traffic| conn.write_word(traffic, word.as_ref()))?;
        }
        self.io(|conn, traffic| conn.write_word(traffic, &[]))
    }

    /// Send a built command
    pub fn send_command(&mut self, command: &Command) -> Result<()> {
        self.send(command.words())
    }

    /// Read one reply sentence.
    ///
    /// A `!trap` becomes `ApiError::Trap`. A `!re` must carry every key in
    /// `mandatory`. Other statuses are returned untouched.
    pub fn read_sentence<K: AsRef<str>>(&mut self, mandatory: &[K]) -> Result<Sentence> {
        let answer = self.io(|conn, traffic| conn.read_word(traffic))?;
        let status = match parse_status(&answer) {
            Ok(status) => status,
            Err(e) => return self.fail(e),
        };

        let mut sentence = Sentence::new(status);
        loop {
            let word = self.io(|conn, traffic| conn.read_word(traffic))?;
            if word.is_empty() {
                break;
            }

            match parse_attribute(&word) {
                Ok((key, value)) => {
                    sentence.attributes.insert(key, value);
                }
                Err(e) => return self.fail(e),
            }
        }

        if sentence.status == Status::Trap {
            return self.fail(sentence.into_trap_error());
        }

        if sentence.status == Status::Reply {
            if let Some(key) = sentence.missing_key(mandatory) {
                let err = ApiError::protocol(format!("mandatory param missing in reply: {}", key));
                return self.fail(err);
            }
        }

        Ok(sentence)
    }

    /// Send a command and read its single reply.
    ///
    /// Returns the `!done` sentence, or the `!re` row when one row precedes
    /// `!done`.
    pub fn send_read_done<W: AsRef<[u8]>>(&mut self, words: &[W]) -> Result<Sentence> {
        self.send(words)?;

        let reply = self.read_sentence(NO_KEYS)?;
        match reply.status {
            Status::Done => Ok(reply),
            Status::Reply => {
                let done = self.read_sentence(NO_KEYS)?;
                if done.status != Status::Done {
                    let err = ApiError::protocol(format!("Not !done answer: {}", done.status));
                    return self.fail(err);
                }
                Ok(reply)
            }
            _ => {
                let err = ApiError::protocol(format!("Wrong answer: {}", reply.status));
                self.fail(err)
            }
        }
    }

    /// Send a command and collect every `!re` row up to `!done`
    pub fn query<W, K>(&mut self, words: &[W], mandatory: &[K]) -> Result<Vec<Sentence>>
    where
        W: AsRef<[u8]>,
        K: AsRef<str>,
    {
        self.send(words)?;

        let mut rows = Vec::new();
        loop {
            let sentence = self.read_sentence(mandatory)?;
            match sentence.status {
                Status::Reply => rows.push(sentence),
                Status::Done => return Ok(rows),
                _ => {
                    let err = ApiError::protocol(format!("Wrong answer: {}", sentence.status));
                    return self.fail(err);
                }
            }
        }
    }

    // =========================================================================
    // Error Handling
    // =========================================================================

    /// Run one framing operation, dropping the connection if it fails
    fn io<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Connection<S>, &mut Traffic) -> Result<T>,
    {
        let conn = match self.conn.as_mut() {
            Some(conn) => conn,
            None => return Err(ApiError::NotConnected),
        };

        let result = op(conn, &mut self.traffic);
        if let Err(ref e) = result {
            self.teardown(e);
        }
        result
    }

    fn fail<T>(&mut self, err: ApiError) -> Result<T> {
        self.teardown(&err);
        Err(err)
    }

    fn teardown(&mut self, err: &ApiError) {
        tracing::warn!("Session with {} failed: {}", self.config.address, err);
        self.close();
    }
}

impl Session<TcpStream> {
    /// Dial the configured address and log in
    pub fn connect(&mut self, user: &str, password: &str) -> Result<()> {
        if self.is_connected() {
            return Err(ApiError::AlreadyConnected);
        }
        self.config.validate()?;

        self.state = SessionState::Connecting;
        let stream = match dial(&self.config.address, self.config.timeout()) {
            Ok(stream) => stream,
            Err(e) => {
                self.state = SessionState::Disconnected;
                return Err(e);
            }
        };

        self.attach(stream)?;
        self.login(user, password)
    }
}
