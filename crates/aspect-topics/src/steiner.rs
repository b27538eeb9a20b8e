//! Approximate Steiner tree over the undirected view of a graph.
//!
//! Follows the metric-closure construction: shortest paths between every
//! pair of terminals, a minimum spanning tree over those path lengths, and
//! the union of the nodes on the chosen paths. Disconnected terminals yield
//! a forest; each tree spans the terminals of one component.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::unionfind::UnionFind;

use crate::graph::GraphEdge;

#[derive(Debug, Clone, Copy)]
struct State {
    dist: f64,
    node: NodeIndex,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl Ord for State {
    // Reversed so the max-heap pops the closest node, lowest index first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct ShortestPaths {
    dist: HashMap<NodeIndex, f64>,
    pred: HashMap<NodeIndex, NodeIndex>,
}

type Adjacency = HashMap<NodeIndex, Vec<(NodeIndex, f64)>>;

fn undirected_adjacency<N>(graph: &StableDiGraph<N, GraphEdge>) -> Adjacency {
    let mut adjacency: Adjacency = HashMap::new();
    for edge in graph.edge_indices() {
        let Some((source, target)) = graph.edge_endpoints(edge) else {
            continue;
        };
        let distance = graph[edge].distance.max(0.0);
        adjacency.entry(source).or_default().push((target, distance));
        adjacency.entry(target).or_default().push((source, distance));
    }
    for neighbors in adjacency.values_mut() {
        neighbors.sort_by(|a, b| a.0.index().cmp(&b.0.index()).then(a.1.total_cmp(&b.1)));
    }
    adjacency
}

fn dijkstra(adjacency: &Adjacency, source: NodeIndex) -> ShortestPaths {
    let mut dist = HashMap::from([(source, 0.0)]);
    let mut pred = HashMap::new();
    let mut done = HashSet::new();
    let mut heap = BinaryHeap::from([State {
        dist: 0.0,
        node: source,
    }]);

    while let Some(State { dist: d, node }) = heap.pop() {
        if !done.insert(node) {
            continue;
        }
        for &(next, weight) in adjacency.get(&node).into_iter().flatten() {
            let candidate = d + weight;
            let better = match dist.get(&next) {
                Some(&current) => candidate < current,
                None => true,
            };
            if better && !done.contains(&next) {
                dist.insert(next, candidate);
                pred.insert(next, node);
                heap.push(State {
                    dist: candidate,
                    node: next,
                });
            }
        }
    }

    ShortestPaths { dist, pred }
}

/// Nodes of an approximate minimum Steiner tree spanning `terminals`.
///
/// Edge weights are [`GraphEdge::distance`]; direction is ignored.
pub fn steiner_nodes<N>(
    graph: &StableDiGraph<N, GraphEdge>,
    terminals: &[NodeIndex],
) -> HashSet<NodeIndex> {
    let mut terminals = terminals.to_vec();
    terminals.sort();
    terminals.dedup();

    let mut keep: HashSet<NodeIndex> = terminals.iter().copied().collect();
    if terminals.len() < 2 {
        return keep;
    }

    let adjacency = undirected_adjacency(graph);
    let trees: Vec<ShortestPaths> = terminals
        .iter()
        .map(|&t| dijkstra(&adjacency, t))
        .collect();

    let mut closure = Vec::new();
    for i in 0..terminals.len() {
        for j in (i + 1)..terminals.len() {
            if let Some(&d) = trees[i].dist.get(&terminals[j]) {
                closure.push((d, i, j));
            }
        }
    }
    closure.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut components = UnionFind::<usize>::new(terminals.len());
    for (_, i, j) in closure {
        if !components.union(i, j) {
            continue;
        }
        let mut node = terminals[j];
        while node != terminals[i] {
            keep.insert(node);
            match trees[i].pred.get(&node) {
                Some(&previous) => node = previous,
                None => break,
            }
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(distance: f64) -> GraphEdge {
        GraphEdge::with_similarity(1.0 - distance)
    }

    #[test]
    fn test_prefers_cheaper_route() {
        let mut g = StableDiGraph::<&str, GraphEdge>::new();
        let a = g.add_node("a");
        let b = g.add_node("b");
        let cheap = g.add_node("cheap");
        let dear = g.add_node("dear");
        g.add_edge(a, cheap, edge(0.1));
        g.add_edge(b, cheap, edge(0.1));
        g.add_edge(a, dear, edge(0.5));
        g.add_edge(b, dear, edge(0.5));

        let keep = steiner_nodes(&g, &[a, b]);
        assert_eq!(keep, HashSet::from([a, b, cheap]));
    }

    #[test]
    fn test_ignores_edge_direction() {
        let mut g = StableDiGraph::<&str, GraphEdge>::new();
        let a = g.add_node("a");
        let mid = g.add_node("mid");
        let b = g.add_node("b");
        g.add_edge(a, mid, edge(0.2));
        g.add_edge(mid, b, edge(0.2));
        // b only reachable from a, a only reachable backwards from b
        let keep = steiner_nodes(&g, &[b, a]);
        assert_eq!(keep.len(), 3);
    }

    #[test]
    fn test_single_terminal_keeps_itself() {
        let mut g = StableDiGraph::<&str, GraphEdge>::new();
        let a = g.add_node("a");
        let b = g.add_node("b");
        g.add_edge(a, b, edge(0.0));
        assert_eq!(steiner_nodes(&g, &[a]), HashSet::from([a]));
        assert!(steiner_nodes(&g, &[]).is_empty());
    }

    #[test]
    fn test_disconnected_terminals_form_forest() {
        let mut g = StableDiGraph::<&str, GraphEdge>::new();
        let a = g.add_node("a");
        let b = g.add_node("b");
        let ab = g.add_node("ab");
        let lone = g.add_node("lone");
        let above = g.add_node("above");
        g.add_edge(a, ab, edge(0.3));
        g.add_edge(b, ab, edge(0.3));
        g.add_edge(lone, above, edge(0.3));

        let keep = steiner_nodes(&g, &[a, b, lone]);
        assert_eq!(keep, HashSet::from([a, b, ab, lone]));
    }
}
