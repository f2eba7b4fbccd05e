//! Error types for tempora operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Unsupported input type: {0}")]
    UnsupportedInputType(String),

    #[error("Invalid argument combination: {0}")]
    InvalidArgumentCombination(String),

    #[error("Parser match error: {0}")]
    ParserMatch(String),

    #[error("Invalid date component: {0}")]
    InvalidDateComponent(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimeZone(String),

    #[error("Numeric range error: {0}")]
    NumericRange(String),

    #[error("Unrecognized phrase: {0}")]
    UnrecognizedPhrase(String),
}

pub type Result<T> = std::result::Result<T, TemporalError>;
