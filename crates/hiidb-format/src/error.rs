//! Decode errors for pack parsing.

use thiserror::Error;

/// Errors surfaced while reading or validating pack bytes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// A read ran past the end of the buffer.
    #[error("record truncated at byte {at}")]
    Truncated { at: usize },

    /// The generic pack header carries a kind tag this crate does not know.
    #[error("unknown pack kind {0:#06x}")]
    UnknownKind(u16),

    /// An opcode record declares an impossible length.
    #[error("bad opcode length {len} at byte {at}")]
    BadOpcodeLength { len: u8, at: usize },

    /// A structural invariant of the pack layout does not hold.
    #[error("malformed pack: {0}")]
    Malformed(&'static str),
}

pub type Result<T> = std::result::Result<T, FormatError>;
