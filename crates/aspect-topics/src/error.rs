//! Topic error types.

use thiserror::Error;

/// Errors that can occur during topic aggregation.
#[derive(Debug, Error)]
pub enum TopicsError {
    /// Input the engine cannot work with (e.g. too few distinct vectors)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No aspect survived disambiguation
    #[error("No usable topics: {0}")]
    NoUsableTopics(String),

    /// Clustering error
    #[error("Clustering error: {0}")]
    Clustering(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Embedding error
    #[error("Embedding error: {0}")]
    Embedding(#[from] aspect_embeddings::EmbeddingError),

    /// Lexicon error
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] aspect_lexicon::LexiconError),

    /// Aspect input error
    #[error("Aspect error: {0}")]
    Aspect(#[from] aspect_types::AspectError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
