use arc4_types::TypeError;
use thiserror::Error;

use crate::{String, ToString};

/// A value is outside the representable domain of a fixed-width type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("value {value} does not fit in {bits} bits")]
    Overflow { bits: u16, value: String },

    #[error("{bits} is not a valid integer width (expected a multiple of 8 from 8 to 512)")]
    InvalidWidth { bits: u16 },

    #[error("ufixed precision {precision} is out of range (expected 1 to 160)")]
    InvalidPrecision { precision: u8 },

    #[error("`{text}` is not a decimal with at most {precision} fractional digits")]
    InvalidDecimal { text: String, precision: u8 },
}

/// Failure to encode a value against a type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("expected a value of type {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("{ty} expects {expected} elements, found {found}")]
    LengthMismatch {
        ty: String,
        expected: usize,
        found: usize,
    },

    /// A length, element count or tail offset exceeds the 2-byte limit.
    #[error("{what} {len} exceeds {max}", max = u16::MAX)]
    TooLong { what: &'static str, len: usize },
}

/// Failure to decode bytes as a type. Decoding never yields a partial value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated input for {ty}: needed {needed} bytes, {available} available")]
    Truncated {
        ty: String,
        needed: usize,
        available: usize,
    },

    #[error("malformed offset {offset} in slot {slot}: {reason}")]
    MalformedOffset {
        slot: usize,
        offset: usize,
        reason: &'static str,
    },

    #[error("invalid UTF-8 in string: {source}")]
    InvalidUtf8 {
        #[source]
        source: core::str::Utf8Error,
    },

    #[error("{count} trailing bytes after {ty}")]
    TrailingBytes { ty: String, count: usize },

    #[error("prefix mismatch: expected {expected}, found {found}")]
    PrefixMismatch { expected: String, found: String },

    #[error("expected {expected}, found {found}")]
    WrongType { expected: String, found: String },

    #[error("expected {expected} application arguments, found {found}")]
    ArgCount { expected: usize, found: usize },
}

/// Element or field access that does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("index {index} is out of bounds for length {len}")]
    OutOfBounds { index: i64, len: usize },

    #[error("no field named `{name}`")]
    NoSuchField { name: String },

    #[error("{ty} is not indexable")]
    NotIndexable { ty: String },
}

/// Any error raised by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl DecodeError {
    pub(crate) fn truncated(ty: impl ToString, needed: usize, available: usize) -> Self {
        DecodeError::Truncated {
            ty: ty.to_string(),
            needed,
            available,
        }
    }
}
