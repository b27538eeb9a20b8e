//! Damped importance propagation over the hypernym graph.
//!
//! Works like PageRank with a restart vector: every ontology node starts
//! with the mass of the aspects attached to it directly, and each iteration
//! moves mass from a sense to its hypernyms in proportion to their gloss
//! similarity.

use std::collections::HashMap;

use aspect_types::AspectCounts;
use tracing::{debug, instrument};

use crate::config::PropagationConfig;
use crate::graph::HypernymGraph;
use crate::types::{NodeKey, RankedNode};

/// Dense transition matrix over the ontology nodes of a graph.
///
/// The diagonal is 1.0; `values[to][from]` holds the similarity of every
/// sense-to-sense edge `from -> to`.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    pub nodes: Vec<NodeKey>,
    pub values: Vec<Vec<f64>>,
}

impl TransitionMatrix {
    pub fn from_graph(graph: &HypernymGraph) -> Self {
        let nodes: Vec<NodeKey> = graph.ontology_nodes().into_iter().cloned().collect();
        let n = nodes.len();
        let position: HashMap<&NodeKey, usize> =
            nodes.iter().enumerate().map(|(i, key)| (key, i)).collect();
        let mut values = vec![vec![0.0; n]; n];
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = 1.0;
        }

        for (to, key) in nodes.iter().enumerate() {
            for (pred, edge) in graph.predecessors(key) {
                if pred.is_leaf {
                    continue;
                }
                if let Some(&from) = position.get(&pred.key) {
                    values[to][from] = edge.similarity;
                }
            }
        }

        Self { nodes, values }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Scale a vector to sum to 1; a zero vector is returned unchanged.
pub fn normalize(values: &mut [f64]) {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for v in values.iter_mut() {
            *v /= sum;
        }
    }
}

/// One propagation step:
/// `normalize(damping * (matrix . importance) + (1 - damping) * normalize(original))`.
pub fn iterate(
    matrix: &[Vec<f64>],
    importance: &[f64],
    original: &[f64],
    damping: f64,
) -> Vec<f64> {
    let mut restart = original.to_vec();
    normalize(&mut restart);

    let mut next: Vec<f64> = matrix
        .iter()
        .zip(&restart)
        .map(|(row, r)| {
            let propagated: f64 = row.iter().zip(importance).map(|(m, v)| m * v).sum();
            damping * propagated + (1.0 - damping) * r
        })
        .collect();
    normalize(&mut next);
    next
}

/// Initial importance: the summed counts of the aspects attached directly to
/// each ontology node, normalized.
pub fn initial_importance(
    matrix: &TransitionMatrix,
    graph: &HypernymGraph,
    counts: &AspectCounts,
) -> Vec<f64> {
    let mut importance: Vec<f64> = matrix
        .nodes
        .iter()
        .map(|key| {
            graph
                .predecessors(key)
                .into_iter()
                .filter_map(|(pred, _)| pred.key.as_aspect())
                .map(|aspect| counts.count(aspect) as f64)
                .sum()
        })
        .collect();
    normalize(&mut importance);
    importance
}

/// Ranks ontology nodes by propagated importance.
pub struct ImportancePropagator {
    config: PropagationConfig,
}

impl ImportancePropagator {
    pub fn new(config: PropagationConfig) -> Self {
        Self { config }
    }

    /// Ontology nodes sorted by descending importance, ties in graph order.
    ///
    /// Runs exactly `iterations` steps without a convergence check.
    #[instrument(skip_all, fields(nodes = graph.node_count()))]
    pub fn rank(&self, graph: &HypernymGraph, counts: &AspectCounts) -> Vec<RankedNode> {
        let matrix = TransitionMatrix::from_graph(graph);
        if matrix.is_empty() {
            debug!("No ontology nodes to rank");
            return Vec::new();
        }

        let original = initial_importance(&matrix, graph, counts);
        let mut importance = original.clone();
        for _ in 0..self.config.iterations {
            importance = iterate(&matrix.values, &importance, &original, self.config.damping);
        }

        let mut ranked: Vec<RankedNode> = matrix
            .nodes
            .into_iter()
            .zip(importance)
            .map(|(key, importance)| RankedNode::new(key, importance))
            .collect();
        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        debug!(top = ?ranked.first().map(|r| r.key.to_string()), "Ranked ontology nodes");
        ranked
    }
}
