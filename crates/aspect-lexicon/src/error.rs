//! Lexicon error types.

use thiserror::Error;

/// Errors that can occur while loading lexical resources.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed line in a lexicon file
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Two synsets share one identifier
    #[error("Duplicate sense: {0}")]
    DuplicateSense(String),

    /// A hypernym points at a sense that does not exist
    #[error("Unknown sense: {0}")]
    UnknownSense(String),
}
