use thiserror::Error;

/// Errors raised while constructing or parsing a type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("{bits} is not a valid integer width (expected a multiple of 8 from 8 to 512)")]
    InvalidBitWidth { bits: u32 },

    #[error("ufixed precision {precision} is out of range (expected 1 to 160)")]
    InvalidPrecision { precision: u32 },

    #[error("invalid or oversized length `{text}`")]
    InvalidLength { text: String },

    #[error("duplicate field `{name}`")]
    DuplicateField { name: String },

    #[error("syntax error in `{input}` at position {position}: {message}")]
    Syntax {
        input: String,
        position: usize,
        message: String,
    },
}
