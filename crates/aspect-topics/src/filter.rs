//! Redundancy filtering of ranked nodes.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::graph::HypernymGraph;
use crate::types::{NodeKey, RankedNode};

/// Ranked nodes with no ancestor/descendant relation among them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredTopics {
    /// Surviving nodes in ranking order
    pub kept: Vec<RankedNode>,
    /// Dropped nodes, grouped under the kept node they collided with
    pub subsidiaries: HashMap<NodeKey, Vec<NodeKey>>,
}

impl FilteredTopics {
    /// Nodes folded into a kept node, in ranking order.
    pub fn subsidiaries_of(&self, key: &NodeKey) -> &[NodeKey] {
        self.subsidiaries.get(key).map_or(&[], Vec::as_slice)
    }
}

/// Greedy filter over an importance-ranked list.
///
/// A node connected (either direction) to an already kept node becomes that
/// node's subsidiary; otherwise it is kept. The highest-ranked node of a
/// chain always wins.
pub fn filter_redundant(ranked: &[RankedNode], graph: &HypernymGraph) -> FilteredTopics {
    let mut reach: HashMap<&NodeKey, HashSet<&NodeKey>> = HashMap::new();
    let mut filtered = FilteredTopics::default();

    for node in ranked {
        reach
            .entry(&node.key)
            .or_insert_with(|| graph.descendants(&node.key));

        let collision = filtered.kept.iter().map(|k| &k.key).find(|prior| {
            let prior_reach = reach.get(*prior);
            let term_reach = reach.get(&node.key);
            term_reach.is_some_and(|r| r.contains(*prior))
                || prior_reach.is_some_and(|r| r.contains(&node.key))
        });

        match collision {
            Some(prior) => {
                debug!(node = %node.key, kept = %prior, "Dropping redundant topic");
                filtered
                    .subsidiaries
                    .entry(prior.clone())
                    .or_default()
                    .push(node.key.clone());
            }
            None => {
                filtered.subsidiaries.entry(node.key.clone()).or_default();
                filtered.kept.push(node.clone());
            }
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphEdge;

    fn key(name: &str) -> NodeKey {
        if name.starts_with('L') {
            NodeKey::aspect(name)
        } else {
            NodeKey::sense(name)
        }
    }

    fn simulated_graph() -> HypernymGraph {
        let mut graph = HypernymGraph::new();
        for (from, to, similarity) in [
            ("L1", "I1", 1.0),
            ("L2", "I2", 1.0),
            ("I1", "R", 0.5),
            ("I2", "R", 0.5),
        ] {
            graph.add_edge(&key(from), &key(to), GraphEdge::with_similarity(similarity));
        }
        graph
    }

    fn ranked(names: &[&str]) -> Vec<RankedNode> {
        names.iter().map(|n| RankedNode::new(key(n), 0.0)).collect()
    }

    #[test]
    fn test_filter_keeps_unconnected_nodes() {
        let graph = simulated_graph();
        let filtered = filter_redundant(&ranked(&["L1", "I1", "I2", "L2"]), &graph);
        assert_eq!(filtered.kept, ranked(&["L1", "I2"]));
        assert_eq!(filtered.subsidiaries_of(&key("L1")), &[key("I1")]);
        assert_eq!(filtered.subsidiaries_of(&key("I2")), &[key("L2")]);
    }

    #[test]
    fn test_filter_root_absorbs_everything() {
        let graph = simulated_graph();
        let filtered = filter_redundant(&ranked(&["R", "I1", "I2"]), &graph);
        assert_eq!(filtered.kept, ranked(&["R"]));
        assert_eq!(filtered.subsidiaries_of(&key("R")).len(), 2);
    }

    #[test]
    fn test_no_survivor_is_ancestor_of_another() {
        let graph = simulated_graph();
        let filtered = filter_redundant(&ranked(&["I1", "L2", "R", "I2", "L1"]), &graph);
        for a in &filtered.kept {
            for b in &filtered.kept {
                if a.key != b.key {
                    assert!(!graph.descendants(&a.key).contains(&b.key));
                }
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let graph = simulated_graph();
        let once = filter_redundant(&ranked(&["I1", "I2", "R", "L1"]), &graph);
        let twice = filter_redundant(&once.kept, &graph);
        assert_eq!(twice.kept, once.kept);
    }
}
