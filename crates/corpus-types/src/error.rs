/// Errors from parsing or constructing foundation types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A byte sequence had the wrong length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// An identifier string could not be parsed as a UUID.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
