//! Error types for sample loading

use thiserror::Error;

/// Errors that can occur while reading an observation log
///
/// Folding samples into the registry never fails; a sample that cannot
/// contribute is ignored instead.
#[derive(Error, Debug, Clone)]
pub enum InferenceError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// A log line that is JSON but not a sample
    #[error("Invalid sample on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}

impl From<std::io::Error> for InferenceError {
    fn from(e: std::io::Error) -> Self {
        InferenceError::Io(e.to_string())
    }
}
