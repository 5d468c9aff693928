//! Command definitions
//!
//! A command is a path word (`/interface/print`) followed by argument words,
//! sent as one sentence.

use bytes::{BufMut, Bytes, BytesMut};

use super::length::{encoded_len, put_length};

/// Path of the login command
pub const LOGIN: &str = "/login";

/// A command sentence ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    words: Vec<Vec<u8>>,
}

impl Command {
    /// Start a command with its path word
    pub fn new(path: impl Into<Vec<u8>>) -> Self {
        Self {
            words: vec![path.into()],
        }
    }

    /// Append a raw word (`?type=ether`, `.tag=1`, ...)
    pub fn word(mut self, word: impl Into<Vec<u8>>) -> Self {
        self.words.push(word.into());
        self
    }

    /// Append an `=key=value` attribute word
    pub fn attribute(mut self, key: &str, value: impl AsRef<[u8]>) -> Self {
        let value = value.as_ref();
        let mut word = Vec::with_capacity(key.len() + value.len() + 2);
        word.push(b'=');
        word.extend_from_slice(key.as_bytes());
        word.push(b'=');
        word.extend_from_slice(value);
        self.words.push(word);
        self
    }

    /// Plaintext login
    pub fn login(user: &str, password: &str) -> Self {
        Self::new(LOGIN)
            .attribute("name", user)
            .attribute("password", password)
    }

    /// Second login step answering a challenge
    pub fn login_response(user: &str, response: &str) -> Self {
        Self::new(LOGIN)
            .attribute("name", user)
            .attribute("response", response)
    }

    /// All words in send order, without the terminator
    pub fn words(&self) -> &[Vec<u8>] {
        &self.words
    }

    /// Wire form of the whole sentence, terminator included
    pub fn encode(&self) -> Bytes {
        encode_sentence(&self.words)
    }
}

/// Serialize `words` as one sentence followed by the empty terminator word
pub fn encode_sentence<W: AsRef<[u8]>>(words: &[W]) -> Bytes {
    let size: usize = words
        .iter()
        .map(|w| {
            let len = w.as_ref().len();
            encoded_len(len as u32) + len
        })
        .sum();

    let mut buf = BytesMut::with_capacity(size + 1);
    for word in words {
        let word = word.as_ref();
        put_length(&mut buf, word.len() as u32);
        buf.put_slice(word);
    }
    put_length(&mut buf, 0);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_words() {
        let cmd = Command::login("admin", "secret");
        assert_eq!(
            cmd.words(),
            &[
                b"/login".to_vec(),
                b"=name=admin".to_vec(),
                b"=password=secret".to_vec(),
            ]
        );
    }

    #[test]
    fn test_login_response_words() {
        let cmd = Command::login_response("admin", "00abcd");
        assert_eq!(cmd.words()[2], b"=response=00abcd".to_vec());
    }

    #[test]
    fn test_encode_appends_terminator() {
        let cmd = Command::new("/system/identity/print");
        let encoded = cmd.encode();

        let mut expected = vec![22u8];
        expected.extend_from_slice(b"/system/identity/print");
        expected.push(0);
        assert_eq!(&encoded[..], &expected[..]);
    }

    #[test]
    fn test_encode_empty_sentence_is_single_terminator() {
        let words: [&[u8]; 0] = [];
        assert_eq!(&encode_sentence(&words)[..], &[0x00]);
    }
}
