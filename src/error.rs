//! Error types.
//!
//! Two classes of failure exist. Structural errors (a note played against a
//! structure it does not fit, a malformed byte stream, a cursor outside the
//! tree) are bugs in the caller and surface as `Err`. User-reachable edge
//! cases in the editor are not errors at all; see `EditOutcome::error`.

use thiserror::Error;

use crate::address::Address;

/// Failure to decode the binary note format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unknown note tag {0:#04x}")]
    UnknownTag(u8),
    #[error("atom text is not valid utf-8")]
    InvalidUtf8,
    #[error("variable-length quantity overflows")]
    VlqOverflow,
    #[error("{0} trailing bytes after note")]
    TrailingBytes(usize),
    #[error("notes nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Failure to parse the textual s-expression form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected `{token}` at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    #[error("unknown escape `\\{0}`")]
    UnknownEscape(char),
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
    #[error("unknown note `{0}`")]
    UnknownNote(String),
    #[error("malformed `{note}`: {reason}")]
    Malformed { note: String, reason: &'static str },
    #[error("nested deeper than {0} levels")]
    TooDeep(usize),
}

/// A note was played against a structure that violates its preconditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("{note} can only be played on nothing")]
    NotFromNothing { note: &'static str },
    #[error("set-atom can only be played on an existing atom")]
    NotAnAtom,
    #[error("{note} can only be played on an existing list")]
    NotAList { note: &'static str },
    #[error("{note} index {index} out of bounds for {len} children")]
    OutOfBounds { note: &'static str, index: usize, len: usize },
    #[error("an empty chord cannot be played on nothing")]
    EmptyChord,
}

/// An address that was required to exist does not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address out of bounds: {0:?}")]
    OutOfBounds(Address),
}

/// Failure in the edit-command compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

/// Failure to deliver on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
}

/// Umbrella error for operations that cross several layers.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
