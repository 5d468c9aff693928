//! Sentence definitions
//!
//! A reply sentence is a status word (`!re`, `!done`, `!trap`, ...) followed
//! by attribute words of the form `<marker><key>=<value>`.

use std::collections::HashMap;
use std::fmt;

use crate::error::{ApiError, Result};

/// Leading byte of every status word
pub const STATUS_MARKER: u8 = b'!';

/// Attribute holding the human readable text of a trap
pub const TRAP_MESSAGE_KEY: &str = "=message";

/// Reply status tags
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// `!re` - one row of a result set
    Reply,

    /// `!done` - command completed
    Done,

    /// `!trap` - device reported an error
    Trap,

    /// `!fatal` - device is closing the session
    Fatal,

    /// Any other `!`-prefixed tag, kept verbatim
    Other(String),
}

impl Status {
    /// Map a status word to its tag
    pub fn parse(word: &str) -> Self {
        match word {
            "!re" => Status::Reply,
            "!done" => Status::Done,
            "!trap" => Status::Trap,
            "!fatal" => Status::Fatal,
            other => Status::Other(other.to_string()),
        }
    }

    /// The status word as sent on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Status::Reply => "!re",
            Status::Done => "!done",
            Status::Trap => "!trap",
            Status::Fatal => "!fatal",
            Status::Other(word) => word,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed reply sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Status tag from the first word
    pub status: Status,

    /// Attributes keyed with their leading marker (`=name`, `.tag`)
    pub attributes: HashMap<String, String>,
}

impl Sentence {
    /// Create a sentence with no attributes
    pub fn new(status: Status) -> Self {
        Self {
            status,
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute, replacing any previous value for `key`
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// First key of `mandatory` absent from this sentence
    pub fn missing_key<'k, S: AsRef<str>>(&self, mandatory: &'k [S]) -> Option<&'k str> {
        mandatory
            .iter()
            .map(|key| key.as_ref())
            .find(|key| !self.attributes.contains_key(*key))
    }

    /// Convert a trap sentence into its error
    pub fn into_trap_error(mut self) -> ApiError {
        ApiError::Trap {
            message: self.attributes.remove(TRAP_MESSAGE_KEY),
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status)?;

        let mut keys: Vec<&String> = self.attributes.keys().collect();
        keys.sort();
        for key in keys {
            writeln!(f, "\t{}: {}", key, self.attributes[key])?;
        }
        Ok(())
    }
}

// =============================================================================
// Word Parsing
// =============================================================================

/// Parse the first word of a reply sentence
pub fn parse_status(word: &[u8]) -> Result<Status> {
    match word.first() {
        None => Err(ApiError::protocol("empty answer word")),
        Some(&STATUS_MARKER) => Ok(Status::parse(&String::from_utf8_lossy(word))),
        Some(_) => Err(ApiError::protocol(format!(
            "no ! in answer: {}",
            String::from_utf8_lossy(word)
        ))),
    }
}

/// Split an attribute word `<marker><key>=<value>` into key and value.
///
/// The key keeps its marker; the separator is searched after the first byte
/// so `==x` yields key `=` and value `x`.
pub fn parse_attribute(word: &[u8]) -> Result<(String, String)> {
    if word.len() < 3 {
        return Err(ApiError::protocol(format!(
            "attribute word too short: {:?}",
            String::from_utf8_lossy(word)
        )));
    }

    let sep = word[1..]
        .iter()
        .position(|&b| b == b'=')
        .map(|idx| idx + 1)
        .ok_or_else(|| {
            ApiError::protocol(format!(
                "no = in attribute word: {}",
                String::from_utf8_lossy(word)
            ))
        })?;

    let key = String::from_utf8_lossy(&word[..sep]).into_owned();
    let value = String::from_utf8_lossy(&word[sep + 1..]).into_owned();
    Ok((key, value))
}
