//! Hypernym graph construction and pruning.
//!
//! Every disambiguated aspect becomes a leaf node with an edge to its sense,
//! followed by the sense's hypernym chain up to the ontology root. Chains are
//! unioned by node identity, scored by gloss similarity and pruned to an
//! approximate Steiner tree over the leaves.

use std::collections::{HashMap, HashSet};

use aspect_lexicon::{Ontology, SenseId};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::{debug, info};

use crate::disambiguation::GlossVectors;
use crate::similarity::gloss_similarity;
use crate::steiner::steiner_nodes;
use crate::types::{NodeKey, SynsetMatch};

/// A graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub key: NodeKey,
    /// True for aspect phrases (seeds), false for ontology senses
    pub is_leaf: bool,
}

/// An edge from a node to its immediate hypernym.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    /// Gloss similarity in [0, 1]; 1.0 for leaf edges
    pub similarity: f64,
    /// `1 - similarity`
    pub distance: f64,
}

impl GraphEdge {
    pub fn with_similarity(similarity: f64) -> Self {
        Self {
            similarity,
            distance: 1.0 - similarity,
        }
    }
}

/// Directed hypernym graph addressed by node key.
#[derive(Debug, Clone, Default)]
pub struct HypernymGraph {
    graph: StableDiGraph<GraphNode, GraphEdge>,
    index: HashMap<NodeKey, NodeIndex>,
}

impl HypernymGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Linear chain graph for one hypernym path.
    ///
    /// `path` is root-first and ends with the aspect's sense; the aspect
    /// becomes the leaf with an edge into the sense.
    pub fn path_to_graph(path: &[SenseId], aspect: &str) -> Self {
        let mut graph = Self::new();
        graph.add_path(path, aspect);
        graph
    }

    fn add_path(&mut self, path: &[SenseId], aspect: &str) {
        let mut previous = NodeKey::aspect(aspect);
        self.add_node(previous.clone());
        for sense in path.iter().rev() {
            let next = NodeKey::Sense(sense.clone());
            self.add_edge(&previous, &next, GraphEdge::with_similarity(1.0));
            previous = next;
        }
    }

    /// Union of several graphs by node identity.
    pub fn compose<I>(graphs: I) -> Self
    where
        I: IntoIterator<Item = HypernymGraph>,
    {
        let mut composed = Self::new();
        for graph in graphs {
            composed.merge(&graph);
        }
        composed
    }

    /// Add another graph's nodes and edges; existing edges are kept as is.
    pub fn merge(&mut self, other: &HypernymGraph) {
        for node in other.graph.node_indices() {
            self.add_node(other.graph[node].key.clone());
        }
        for edge in other.graph.edge_indices() {
            if let Some((from, to)) = other.graph.edge_endpoints(edge) {
                self.add_edge(
                    &other.graph[from].key,
                    &other.graph[to].key,
                    other.graph[edge],
                );
            }
        }
    }

    /// Build the graph for a set of disambiguated aspects.
    ///
    /// A sense with a single hypernym path contributes that path. With
    /// several paths, each is scored by how many aspects chose one of its
    /// nodes, and every path tied at the best score is included.
    pub fn from_matches(matches: &[SynsetMatch], ontology: &dyn Ontology) -> Self {
        let mut match_count: HashMap<&SenseId, usize> = HashMap::new();
        for sense in matches.iter().filter_map(|m| m.sense.as_ref()) {
            *match_count.entry(sense).or_default() += 1;
        }

        let mut graph = Self::new();
        for m in matches {
            let Some(sense) = &m.sense else {
                continue;
            };
            let paths = ontology.hypernym_paths(sense);
            if paths.is_empty() {
                debug!(aspect = %m.aspect, sense = %sense, "No hypernym path");
                continue;
            }
            if paths.len() == 1 {
                graph.add_path(&paths[0], &m.aspect);
                continue;
            }

            let scores: Vec<usize> = paths
                .iter()
                .map(|path| {
                    path.iter()
                        .map(|node| match_count.get(node).copied().unwrap_or(0))
                        .sum()
                })
                .collect();
            let best = scores.iter().copied().max().unwrap_or(0);
            for (path, score) in paths.iter().zip(&scores) {
                if *score == best {
                    graph.add_path(path, &m.aspect);
                }
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built hypernym graph"
        );
        graph
    }

    /// Add a node if missing. Aspect keys become leaves.
    pub fn add_node(&mut self, key: NodeKey) -> NodeIndex {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let is_leaf = matches!(key, NodeKey::Aspect(_));
        let idx = self.graph.add_node(GraphNode {
            key: key.clone(),
            is_leaf,
        });
        self.index.insert(key, idx);
        idx
    }

    /// Add an edge (and any missing endpoint). An existing edge is kept.
    pub fn add_edge(&mut self, from: &NodeKey, to: &NodeKey, edge: GraphEdge) -> EdgeIndex {
        let a = self.add_node(from.clone());
        let b = self.add_node(to.clone());
        match self.graph.find_edge(a, b) {
            Some(existing) => existing,
            None => self.graph.add_edge(a, b, edge),
        }
    }

    /// Score every sense-to-sense edge by gloss similarity.
    ///
    /// Leaf edges keep similarity 1.0.
    pub fn score_similarities(&mut self, glosses: &mut GlossVectors<'_>) {
        let edges: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        for edge in edges {
            let Some((from, to)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            let (Some(a), Some(b)) = (
                self.graph[from].key.as_sense(),
                self.graph[to].key.as_sense(),
            ) else {
                continue;
            };
            let va = glosses.vector(a).cloned();
            let vb = glosses.vector(b).cloned();
            self.graph[edge] =
                GraphEdge::with_similarity(gloss_similarity(va.as_ref(), vb.as_ref()));
        }
    }

    /// Drop every node outside an approximate Steiner tree over the leaves.
    ///
    /// Only nodes are removed; all edges among the surviving nodes stay.
    /// Returns the number of removed nodes.
    pub fn prune(&mut self) -> usize {
        let before = (self.node_count(), self.edge_count());
        let terminals: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph[idx].is_leaf)
            .collect();
        let keep = steiner_nodes(&self.graph, &terminals);

        let doomed: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| !keep.contains(idx))
            .collect();
        for idx in &doomed {
            if let Some(node) = self.graph.remove_node(*idx) {
                self.index.remove(&node.key);
            }
        }

        info!(
            nodes_before = before.0,
            edges_before = before.1,
            nodes_after = self.node_count(),
            edges_after = self.edge_count(),
            "Pruned hypernym graph"
        );
        doomed.len()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Leaf flag of a node, `None` if absent.
    pub fn is_leaf(&self, key: &NodeKey) -> Option<bool> {
        self.index.get(key).map(|&idx| self.graph[idx].is_leaf)
    }

    /// Total (in + out) degree of a node.
    pub fn degree(&self, key: &NodeKey) -> usize {
        self.index.get(key).map_or(0, |&idx| {
            self.graph.neighbors_directed(idx, Direction::Outgoing).count()
                + self.graph.neighbors_directed(idx, Direction::Incoming).count()
        })
    }

    /// Aspect (leaf) nodes in insertion order.
    pub fn leaves(&self) -> Vec<&NodeKey> {
        self.nodes_where(|node| node.is_leaf)
    }

    /// Ontology (non-leaf) nodes in insertion order.
    pub fn ontology_nodes(&self) -> Vec<&NodeKey> {
        self.nodes_where(|node| !node.is_leaf)
    }

    fn nodes_where(&self, predicate: impl Fn(&GraphNode) -> bool) -> Vec<&NodeKey> {
        self.graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .filter(|node| predicate(node))
            .map(|node| &node.key)
            .collect()
    }

    /// The edge between two nodes, if any.
    pub fn edge(&self, from: &NodeKey, to: &NodeKey) -> Option<GraphEdge> {
        let a = *self.index.get(from)?;
        let b = *self.index.get(to)?;
        self.graph.find_edge(a, b).map(|e| self.graph[e])
    }

    pub fn has_edge(&self, from: &NodeKey, to: &NodeKey) -> bool {
        self.edge(from, to).is_some()
    }

    /// Immediate hyponyms and attached aspects of a node, in edge insertion
    /// order, with the connecting edge.
    pub fn predecessors(&self, key: &NodeKey) -> Vec<(&GraphNode, GraphEdge)> {
        self.adjacent(key, Direction::Incoming)
    }

    /// Immediate hypernyms of a node, in edge insertion order.
    pub fn successors(&self, key: &NodeKey) -> Vec<(&GraphNode, GraphEdge)> {
        self.adjacent(key, Direction::Outgoing)
    }

    fn adjacent(&self, key: &NodeKey, direction: Direction) -> Vec<(&GraphNode, GraphEdge)> {
        let Some(&idx) = self.index.get(key) else {
            return Vec::new();
        };
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| match direction {
                Direction::Incoming => (e.id(), e.source()),
                Direction::Outgoing => (e.id(), e.target()),
            })
            .collect();
        edges.sort_by_key(|(edge, _)| edge.index());
        edges
            .into_iter()
            .map(|(edge, node)| (&self.graph[node], self.graph[edge]))
            .collect()
    }

    /// Every node reachable by following hypernym edges, excluding the node
    /// itself.
    pub fn descendants(&self, key: &NodeKey) -> HashSet<&NodeKey> {
        let mut reached = HashSet::new();
        let Some(&start) = self.index.get(key) else {
            return reached;
        };
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            for next in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if seen.insert(next) {
                    reached.insert(&self.graph[next].key);
                    stack.push(next);
                }
            }
        }
        reached
    }
}
