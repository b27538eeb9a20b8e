//! Vector distance and similarity functions.
//!
//! Distances work on raw `f32` slices; gloss similarity compares normalized
//! [`Embedding`]s.

use aspect_embeddings::Embedding;

/// Squared Euclidean distance.
///
/// Vectors of different dimension are compared over their common prefix.
#[inline]
pub fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = (x - y) as f64;
            d * d
        })
        .sum()
}

/// Euclidean distance.
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Calculate the (unnormalized) mean of a set of vectors.
///
/// Returns an empty vector for an empty set.
pub fn mean_vector(vectors: &[&[f32]]) -> Vec<f32> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let n = vectors.len() as f32;
    let mut mean = vec![0.0f32; first.len()];
    for vector in vectors {
        for (m, &val) in mean.iter_mut().zip(vector.iter()) {
            *m += val;
        }
    }
    for val in mean.iter_mut() {
        *val /= n;
    }
    mean
}

/// Similarity of two gloss vectors, `1 - cosine distance` clamped to [0, 1].
///
/// A missing vector on either side gives 0.
pub fn gloss_similarity(a: Option<&Embedding>, b: Option<&Embedding>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let sim = 1.0 - a.cosine_distance(b) as f64;
            if sim.is_finite() {
                sim.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
