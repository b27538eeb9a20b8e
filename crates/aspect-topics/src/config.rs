//! Topic engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::TopicsError;

/// Master configuration for topic aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicsConfig {
    /// Pseudo-context clustering settings
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Importance propagation settings
    #[serde(default)]
    pub propagation: PropagationConfig,

    /// Summary logging settings
    #[serde(default)]
    pub summary: SummaryConfig,
}

impl TopicsConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), TopicsError> {
        self.clustering.validate()?;
        self.propagation.validate()
    }
}

/// Cluster-count scan and k-means settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Smallest cluster count tried by the silhouette scan
    #[serde(default = "default_min_clusters")]
    pub min_clusters: usize,

    /// Upper bound (exclusive) of the scan, capped by the number of aspects
    #[serde(default = "default_max_clusters")]
    pub max_clusters: usize,

    /// Step between tried cluster counts
    #[serde(default = "default_cluster_step")]
    pub cluster_step: usize,

    /// Winning counts above this share of the scan bound fall back to sqrt(n)
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,

    /// Clustering is undefined below this many distinct vectors
    #[serde(default = "default_min_distinct_vectors")]
    pub min_distinct_vectors: usize,

    /// Maximum Lloyd iterations per k-means run
    #[serde(default = "default_kmeans_iterations")]
    pub kmeans_iterations: usize,

    /// Independent k-means++ seedings; the lowest inertia wins
    #[serde(default = "default_kmeans_restarts")]
    pub kmeans_restarts: usize,

    /// Seed for the k-means++ initialization
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_clusters: default_min_clusters(),
            max_clusters: default_max_clusters(),
            cluster_step: default_cluster_step(),
            safety_margin: default_safety_margin(),
            min_distinct_vectors: default_min_distinct_vectors(),
            kmeans_iterations: default_kmeans_iterations(),
            kmeans_restarts: default_kmeans_restarts(),
            seed: default_seed(),
        }
    }
}

impl ClusteringConfig {
    fn validate(&self) -> Result<(), TopicsError> {
        if self.min_clusters < 2 {
            return Err(TopicsError::InvalidConfig(
                "clustering.min_clusters must be at least 2".to_string(),
            ));
        }
        if self.max_clusters < self.min_clusters {
            return Err(TopicsError::InvalidConfig(format!(
                "clustering.max_clusters ({}) is below min_clusters ({})",
                self.max_clusters, self.min_clusters
            )));
        }
        if self.cluster_step == 0 {
            return Err(TopicsError::InvalidConfig(
                "clustering.cluster_step must be positive".to_string(),
            ));
        }
        if !(self.safety_margin > 0.0 && self.safety_margin <= 1.0) {
            return Err(TopicsError::InvalidConfig(format!(
                "clustering.safety_margin must be in (0, 1], got {}",
                self.safety_margin
            )));
        }
        if self.kmeans_iterations == 0 || self.kmeans_restarts == 0 {
            return Err(TopicsError::InvalidConfig(
                "clustering.kmeans_iterations and kmeans_restarts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_min_clusters() -> usize {
    10
}
fn default_max_clusters() -> usize {
    600
}
fn default_cluster_step() -> usize {
    20
}
fn default_safety_margin() -> f64 {
    0.6
}
fn default_min_distinct_vectors() -> usize {
    3
}
fn default_kmeans_iterations() -> usize {
    300
}
fn default_kmeans_restarts() -> usize {
    4
}
fn default_seed() -> u64 {
    1
}

/// Damped importance propagation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Weight of the propagated term against the restart vector
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Fixed number of iterations (no early stop)
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            iterations: default_iterations(),
        }
    }
}

impl PropagationConfig {
    fn validate(&self) -> Result<(), TopicsError> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(TopicsError::InvalidConfig(format!(
                "propagation.damping must be in [0, 1], got {}",
                self.damping
            )));
        }
        Ok(())
    }
}

fn default_damping() -> f64 {
    0.5
}
fn default_iterations() -> usize {
    100
}

/// Debug summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Terms per topic written to the debug summary
    #[serde(default = "default_log_examples")]
    pub log_examples: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            log_examples: default_log_examples(),
        }
    }
}

fn default_log_examples() -> usize {
    20
}
