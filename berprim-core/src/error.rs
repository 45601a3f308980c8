use thiserror::Error;

/// Main error type for BER primitive codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BerError {
    #[error("Invalid object identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Truncated input: {0}")]
    TruncatedInput(String),

    #[error("Unsupported REAL base: {0}")]
    UnsupportedBase(u8),

    #[error("Malformed REAL encoding: {0}")]
    MalformedReal(String),

    #[error("Object identifier arc overflow: {0}")]
    ArcOverflow(String),

    #[error("Unexpected tag: {0}")]
    UnexpectedTag(String),

    #[error("Invalid length: {0}")]
    InvalidLength(String),
}

/// Result type alias for BER primitive codec operations
pub type BerResult<T> = Result<T, BerError>;
