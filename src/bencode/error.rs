use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BencodeError {
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Invalid integer {0:?}")]
    InvalidInteger(String),

    #[error("Invalid string length {0:?}")]
    InvalidStringLength(String),

    #[error("Dictionary keys must be byte strings")]
    NonStringKey,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Trailing data after value at offset {0}")]
    TrailingData(usize),
}
