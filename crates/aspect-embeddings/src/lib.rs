//! # aspect-embeddings
//!
//! Word-vector lookup for aspect topic aggregation.
//!
//! The topic engine never sees an embedding file: it asks an
//! [`EmbeddingProvider`] for the vector of a word and treats absence as a
//! normal outcome. [`KeyedVectors`] is the in-memory provider backed by a
//! pre-trained GloVe or word2vec text table.
//!
//! ## Features
//! - Case-insensitive lookup of L2-normalized vectors
//! - Compound fallback: "ice cream" -> normalized sum of "ice" and "cream"
//! - GloVe and word2vec text loaders

pub mod error;
pub mod keyed;
pub mod model;

pub use error::EmbeddingError;
pub use keyed::KeyedVectors;
pub use model::{Embedding, EmbeddingProvider};
