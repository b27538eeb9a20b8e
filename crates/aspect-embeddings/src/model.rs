//! Embedding vector type and the provider trait.
//!
//! Defines the interface the topic engine uses to look up word vectors.

/// Vector embedding - a normalized float array.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    /// The embedding vector (normalized to unit length)
    pub values: Vec<f32>,
}

impl Embedding {
    /// Create a new embedding from a vector.
    /// Normalizes the vector to unit length.
    pub fn new(values: Vec<f32>) -> Self {
        let norm: f32 = values.iter().map(|x| x * x).sum::<f32>().sqrt();
        let normalized = if norm > 0.0 {
            values.iter().map(|x| x / norm).collect()
        } else {
            values
        };
        Self { values: normalized }
    }

    /// Create embedding without normalization (for pre-normalized vectors)
    pub fn from_normalized(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Normalized sum of a set of embeddings.
    ///
    /// Returns `None` when the set is empty or the sum has zero length
    /// (e.g. two opposite vectors), since no direction is defined then.
    pub fn normalized_sum<'a, I>(embeddings: I) -> Option<Embedding>
    where
        I: IntoIterator<Item = &'a Embedding>,
    {
        let mut sum: Option<Vec<f32>> = None;
        for embedding in embeddings {
            match sum.as_mut() {
                None => sum = Some(embedding.values.clone()),
                Some(acc) => {
                    if acc.len() != embedding.values.len() {
                        return None;
                    }
                    for (a, v) in acc.iter_mut().zip(&embedding.values) {
                        *a += v;
                    }
                }
            }
        }
        let sum = sum?;
        let norm: f32 = sum.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 && norm.is_finite() {
            Some(Self::new(sum))
        } else {
            None
        }
    }

    /// Get the embedding dimension
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Compute cosine similarity with another embedding.
    /// Returns value in [-1, 1] range (1 = identical).
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.values.len() != other.values.len() {
            return 0.0;
        }
        // Since both are normalized, dot product = cosine similarity
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Cosine distance, `1 - cosine_similarity`, in [0, 2].
    pub fn cosine_distance(&self, other: &Embedding) -> f32 {
        1.0 - self.cosine_similarity(other)
    }
}

/// Trait for word-vector lookup services.
///
/// Implementations must be thread-safe (Send + Sync) so independent batches
/// can share one read-only table.
pub trait EmbeddingProvider: Send + Sync {
    /// Dimension of every returned vector.
    fn dimension(&self) -> usize;

    /// Vector for a word or phrase, `None` if it cannot be embedded.
    fn vector_of(&self, word: &str) -> Option<Embedding>;
}
