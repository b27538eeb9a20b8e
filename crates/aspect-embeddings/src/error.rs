//! Embedding error types.

use thiserror::Error;

/// Errors that can occur while loading embedding tables.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line in an embedding file
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Empty table
    #[error("Embedding table is empty")]
    Empty,
}
