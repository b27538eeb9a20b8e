//! Topic table assembly and the debug summary.

use std::collections::{HashSet, VecDeque};

use aspect_types::AspectCounts;
use tracing::debug;

use crate::config::SummaryConfig;
use crate::filter::FilteredTopics;
use crate::graph::HypernymGraph;
use crate::types::{NodeKey, RawTerm, Topic, WeightedTerm};

/// Aspects with a direct edge into the topic or one of its subsidiaries,
/// most frequent first.
pub fn raw_terms(
    graph: &HypernymGraph,
    counts: &AspectCounts,
    topic: &NodeKey,
    subsidiaries: &[NodeKey],
) -> Vec<RawTerm> {
    let mut seen = HashSet::new();
    let mut terms = Vec::new();
    for node in subsidiaries.iter().chain(std::iter::once(topic)) {
        let attached: HashSet<&str> = graph
            .predecessors(node)
            .into_iter()
            .filter_map(|(pred, _)| pred.key.as_aspect())
            .collect();
        for (aspect, count) in counts.iter() {
            if attached.contains(aspect) && seen.insert(aspect) {
                terms.push(RawTerm {
                    term: aspect.to_string(),
                    count,
                });
            }
        }
    }
    terms.sort_by(|a, b| b.count.cmp(&a.count));
    terms
}

/// Aspects below a topic, found by walking down through ontology nodes.
///
/// With `weighted`, an aspect's count is scaled by the product of the edge
/// similarities from the topic down to the aspect's parent; otherwise every
/// weight is 1. Each node is expanded once and the first weight assigned to
/// an aspect sticks. Highest weight first.
pub fn traverse(
    graph: &HypernymGraph,
    counts: &AspectCounts,
    topic: &NodeKey,
    weighted: bool,
) -> Vec<WeightedTerm> {
    let mut visited: HashSet<NodeKey> = HashSet::from([topic.clone()]);
    let mut queue: VecDeque<(NodeKey, f64)> = VecDeque::from([(topic.clone(), 1.0)]);
    let mut assigned = HashSet::new();
    let mut terms = Vec::new();

    while let Some((node, weight)) = queue.pop_front() {
        for (pred, edge) in graph.predecessors(&node) {
            match &pred.key {
                NodeKey::Aspect(aspect) => {
                    if assigned.insert(aspect.clone()) {
                        terms.push(WeightedTerm {
                            term: aspect.clone(),
                            weight: counts.count(aspect) as f64 * weight,
                        });
                    }
                }
                NodeKey::Sense(_) => {
                    if visited.insert(pred.key.clone()) {
                        let next = if weighted {
                            weight * edge.similarity
                        } else {
                            1.0
                        };
                        queue.push_back((pred.key.clone(), next));
                    }
                }
            }
        }
    }

    terms.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    terms
}

/// Builds topic records from the filtered ranking.
pub struct Summarizer {
    config: SummaryConfig,
}

impl Summarizer {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    /// One topic per kept node that has at least one raw term. Topic ids are
    /// positions in the returned table.
    pub fn collect(
        &self,
        filtered: &FilteredTopics,
        graph: &HypernymGraph,
        counts: &AspectCounts,
    ) -> Vec<Topic> {
        let mut topics = Vec::with_capacity(filtered.kept.len());
        for ranked in &filtered.kept {
            let Some(sense) = ranked.key.as_sense() else {
                continue;
            };
            let subsidiaries = filtered.subsidiaries_of(&ranked.key);
            let raw = raw_terms(graph, counts, &ranked.key, subsidiaries);
            if raw.is_empty() {
                debug!(topic = %sense, "No attached terms, skipping");
                continue;
            }

            topics.push(Topic {
                topic_id: topics.len(),
                sense: sense.clone(),
                importance: ranked.importance,
                subsidiaries: subsidiaries
                    .iter()
                    .filter_map(NodeKey::as_sense)
                    .cloned()
                    .collect(),
                raw_terms: raw,
                weighted_terms: traverse(graph, counts, &ranked.key, true),
                sentiment: None,
            });
        }
        topics
    }

    /// Write every topic with its leading terms at debug level.
    pub fn log_summary(&self, topics: &[Topic]) {
        let limit = self.config.log_examples;
        for topic in topics {
            debug!(
                topic_id = topic.topic_id,
                topic = %topic.sense,
                importance = topic.importance,
                sentiment_compound = topic.sentiment.map(|s| s.compound),
                sentiment_binary = topic.sentiment.map(|s| s.binary),
                "Topic summary"
            );
            for term in topic.raw_terms.iter().take(limit) {
                debug!(topic = %topic.sense, term = %term.term, count = term.count, "Raw term");
            }
            for term in topic.weighted_terms.iter().take(limit) {
                debug!(
                    topic = %topic.sense,
                    term = %term.term,
                    weight = term.weight,
                    "Weighted term"
                );
            }
        }
    }
}
