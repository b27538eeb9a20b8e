//! K-means clustering and silhouette-driven cluster-count selection.
//!
//! Aspect embeddings are partitioned into pseudo-contexts: phrases landing in
//! the same cluster serve as each other's disambiguation context. The number
//! of clusters is chosen by scanning a fixed range of candidate counts and
//! keeping the one with the best mean silhouette.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::ClusteringConfig;
use crate::error::TopicsError;
use crate::similarity::{euclidean_distance, mean_vector, squared_distance};

/// Result of one k-means run.
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Cluster label per input vector
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f32>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
}

/// K-means with k-means++ initialization.
///
/// Runs `kmeans_restarts` seedings derived from `seed` and keeps the run with
/// the lowest inertia (the first one on ties), so results are reproducible.
pub fn kmeans(
    vectors: &[Vec<f32>],
    k: usize,
    config: &ClusteringConfig,
) -> Result<KMeans, TopicsError> {
    if k == 0 || k > vectors.len() {
        return Err(TopicsError::Clustering(format!(
            "cannot split {} vectors into {} clusters",
            vectors.len(),
            k
        )));
    }

    let mut best: Option<KMeans> = None;
    for restart in 0..config.kmeans_restarts.max(1) {
        let seed = config.seed.wrapping_add(restart as u64);
        let run = lloyd(vectors, k, config.kmeans_iterations, seed);
        let better = match &best {
            Some(current) => run.inertia < current.inertia,
            None => true,
        };
        if better {
            best = Some(run);
        }
    }
    best.ok_or_else(|| TopicsError::Clustering("k-means produced no run".to_string()))
}

fn lloyd(vectors: &[Vec<f32>], k: usize, iterations: usize, seed: u64) -> KMeans {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut centroids = plus_plus_init(vectors, k, &mut rng);
    let mut labels = vec![usize::MAX; vectors.len()];

    for _ in 0..iterations.max(1) {
        let mut changed = false;
        for (i, v) in vectors.iter().enumerate() {
            let nearest = nearest_centroid(v, &centroids);
            if labels[i] != nearest {
                labels[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        // Empty clusters keep their previous centroid
        for (ki, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&[f32]> = vectors
                .iter()
                .zip(&labels)
                .filter(|(_, &label)| label == ki)
                .map(|(v, _)| v.as_slice())
                .collect();
            if !members.is_empty() {
                *centroid = mean_vector(&members);
            }
        }
    }

    let inertia = vectors
        .iter()
        .zip(&labels)
        .map(|(v, &label)| squared_distance(v, &centroids[label]))
        .sum();

    KMeans {
        labels,
        centroids,
        inertia,
    }
}

fn plus_plus_init(vectors: &[Vec<f32>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f32>> {
    let mut centroids = Vec::with_capacity(k);

    // First centroid: random
    let first_idx = rng.random_range(0..vectors.len());
    centroids.push(vectors[first_idx].clone());

    // Remaining centroids: probability proportional to squared distance
    for _ in 1..k {
        let distances: Vec<f64> = vectors
            .iter()
            .map(|v| {
                centroids
                    .iter()
                    .map(|c| squared_distance(v, c))
                    .fold(f64::MAX, f64::min)
            })
            .collect();

        let total: f64 = distances.iter().sum();
        if total <= 0.0 {
            // All distances are 0, pick random
            let idx = rng.random_range(0..vectors.len());
            centroids.push(vectors[idx].clone());
            continue;
        }

        let mut r: f64 = rng.random::<f64>() * total;
        let mut chosen = distances.iter().rposition(|&d| d > 0.0).unwrap_or(0);
        for (i, &d) in distances.iter().enumerate() {
            r -= d;
            if r <= 0.0 && d > 0.0 {
                chosen = i;
                break;
            }
        }
        centroids.push(vectors[chosen].clone());
    }

    centroids
}

/// Index of the closest centroid; the lowest index wins ties.
fn nearest_centroid(v: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best_k = 0;
    let mut best_dist = f64::MAX;
    for (ki, c) in centroids.iter().enumerate() {
        let dist = squared_distance(v, c);
        if dist < best_dist {
            best_dist = dist;
            best_k = ki;
        }
    }
    best_k
}

/// Mean silhouette coefficient over all samples.
///
/// Distances are computed per sample as they are needed, so memory stays
/// linear in the number of samples. Samples in singleton clusters score 0.
/// Fewer than two non-empty clusters give the worst possible score, -1.
pub fn silhouette_score(vectors: &[Vec<f32>], labels: &[usize]) -> f64 {
    let n = labels.len().min(vectors.len());
    let labels = &labels[..n];
    let Some(&max_label) = labels.iter().max() else {
        return -1.0;
    };
    let k = max_label + 1;
    let mut sizes = vec![0usize; k];
    for &label in labels {
        sizes[label] += 1;
    }
    if sizes.iter().filter(|&&s| s > 0).count() < 2 {
        return -1.0;
    }

    let mut total = 0.0;
    let mut sums = vec![0.0f64; k];
    for i in 0..n {
        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[labels[j]] += euclidean_distance(&vectors[i], &vectors[j]);
            }
        }

        let own = labels[i];
        if sizes[own] <= 1 {
            continue;
        }
        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    total / n as f64
}

/// Number of distinct vectors (bitwise comparison).
fn distinct_count(vectors: &[Vec<f32>]) -> usize {
    vectors
        .iter()
        .map(|v| v.iter().map(|x| x.to_bits()).collect::<Vec<u32>>())
        .collect::<HashSet<_>>()
        .len()
}

/// Choose the number of pseudo-context clusters.
///
/// Scans `min_clusters, min_clusters + step, ...` below `min(max_clusters, n)`
/// and keeps the count with the highest silhouette (the smallest count on
/// ties). When the scan is empty, or the winner lies outside
/// `[min_clusters, safety_margin * min(max_clusters, n)]`, falls back to
/// `floor(sqrt(n))`.
pub fn best_cluster(vectors: &[Vec<f32>], config: &ClusteringConfig) -> Result<usize, TopicsError> {
    let distinct = distinct_count(vectors);
    if distinct < config.min_distinct_vectors {
        return Err(TopicsError::InvalidInput(format!(
            "clustering needs at least {} distinct vectors, got {}",
            config.min_distinct_vectors, distinct
        )));
    }

    let n = vectors.len();
    let upper = config.max_clusters.min(n);
    let candidates: Vec<usize> = (config.min_clusters..upper)
        .step_by(config.cluster_step.max(1))
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for cluster_count in candidates {
        let clustering = kmeans(vectors, cluster_count, config)?;
        let score = silhouette_score(vectors, &clustering.labels);
        debug!(cluster_count, score, "Silhouette score");
        let better = match best {
            Some((_, best_score)) => score > best_score,
            None => true,
        };
        if better {
            best = Some((cluster_count, score));
        }
    }

    let fallback = ((n as f64).sqrt().floor() as usize).max(1);
    let chosen = match best {
        Some((k, _))
            if k >= config.min_clusters && (k as f64) <= config.safety_margin * upper as f64 =>
        {
            k
        }
        _ => fallback,
    };
    info!(vectors = n, best = ?best, chosen, "Selected cluster count");
    Ok(chosen)
}
