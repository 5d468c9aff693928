//! Protocol Module
//!
//! Wire format of the RouterOS API.
//!
//! ## Word
//! ```text
//! ┌────────────────────┬─────────────────────────────┐
//! │ Length prefix (1-5)│         Payload             │
//! └────────────────────┴─────────────────────────────┘
//! ```
//!
//! ## Sentence
//! ```text
//! word(status | command) { word(attribute | argument) }* word(empty)
//! ```
//!
//! ### Reply Status Tags
//! - `!re`:    one row of a result set
//! - `!done`:  command finished
//! - `!trap`:  device error, `=message` carries the text
//! - `!fatal`: device is closing the session

pub mod length;
mod command;
mod sentence;

pub use command::{encode_sentence, Command, LOGIN};
pub use length::{decode_length, encode_length, encoded_len, put_length};
pub use sentence::{
    parse_attribute, parse_status, Sentence, Status, STATUS_MARKER, TRAP_MESSAGE_KEY,
};
