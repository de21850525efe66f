//! Core error types for duplex

use thiserror::Error;

/// Main error type for duplex operations
#[derive(Error, Debug)]
pub enum DuplexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A character that is not part of the sequence alphabet
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// A symbol looked up in a similarity matrix that does not declare it
    #[error("Invalid alphabet symbol: {0}")]
    InvalidAlphabetSymbol(String),

    #[error("Malformed similarity matrix: {0}")]
    MalformedMatrix(String),

    /// The similarity matrix does not cover every symbol of an input sequence
    #[error("Incompatible similarity matrix: {0}")]
    IncompatibleMatrix(String),

    #[error("Alphabet mismatch: {0}")]
    AlphabetMismatch(String),

    #[error("Empty sequence: {0}")]
    EmptySequence(String),

    #[error("Invalid gap cost: {0}")]
    InvalidGapCost(String),

    #[error("Wrong argument count: expected 2 sequences, got {0}")]
    WrongArgumentCount(usize),

    #[error("Sequence too large: {0}")]
    SequenceTooLarge(String),

    #[error("MUM length too small: {0} (must be at least 1)")]
    MumLengthTooSmall(usize),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for duplex operations
pub type DuplexResult<T> = Result<T, DuplexError>;

impl DuplexError {
    /// True for errors caused by the caller's input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DuplexError::InvalidSymbol(_)
                | DuplexError::InvalidAlphabetSymbol(_)
                | DuplexError::MalformedMatrix(_)
                | DuplexError::IncompatibleMatrix(_)
                | DuplexError::AlphabetMismatch(_)
                | DuplexError::EmptySequence(_)
                | DuplexError::InvalidGapCost(_)
                | DuplexError::WrongArgumentCount(_)
                | DuplexError::SequenceTooLarge(_)
                | DuplexError::MumLengthTooSmall(_)
        )
    }
}

// Conversion implementations for common error types
impl From<serde_json::Error> for DuplexError {
    fn from(err: serde_json::Error) -> Self {
        DuplexError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for DuplexError {
    fn from(err: anyhow::Error) -> Self {
        DuplexError::Other(err.to_string())
    }
}
