//! Topic data types.

use aspect_lexicon::SenseId;
use serde::{Deserialize, Serialize};

use crate::sentiment::TopicSentiment;

/// Position of a topic in the final topic table.
pub type TopicId = usize;

/// Identity of a node in the hypernym graph.
///
/// Aspect phrases and ontology senses live in separate namespaces, so a
/// phrase can never collide with a sense identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKey {
    /// An observed aspect phrase (a seed of the graph)
    Aspect(String),
    /// An ontology sense reached through hypernymy
    Sense(SenseId),
}

impl NodeKey {
    pub fn aspect(phrase: impl Into<String>) -> Self {
        NodeKey::Aspect(phrase.into())
    }

    pub fn sense(id: impl Into<SenseId>) -> Self {
        NodeKey::Sense(id.into())
    }

    /// The sense identifier, if this is an ontology node.
    pub fn as_sense(&self) -> Option<&SenseId> {
        match self {
            NodeKey::Sense(id) => Some(id),
            NodeKey::Aspect(_) => None,
        }
    }

    /// The phrase, if this is an aspect node.
    pub fn as_aspect(&self) -> Option<&str> {
        match self {
            NodeKey::Aspect(phrase) => Some(phrase),
            NodeKey::Sense(_) => None,
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKey::Aspect(phrase) => write!(f, "\"{phrase}\""),
            NodeKey::Sense(id) => write!(f, "{id}"),
        }
    }
}

/// Disambiguation result for one embeddable aspect phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynsetMatch {
    pub aspect: String,
    /// Chosen sense, `None` when no usable sense exists
    pub sense: Option<SenseId>,
}

/// A graph node with its propagated importance.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNode {
    pub key: NodeKey,
    pub importance: f64,
}

impl RankedNode {
    pub fn new(key: NodeKey, importance: f64) -> Self {
        Self { key, importance }
    }
}

/// An aspect phrase attached directly to a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTerm {
    pub term: String,
    pub count: u32,
}

/// An aspect phrase reached below a topic, with its similarity-weighted count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: f64,
}

/// A semantic topic: one representative ontology node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Position in the topic table
    pub topic_id: TopicId,
    /// Ontology node of the topic
    pub sense: SenseId,
    /// Propagated importance
    pub importance: f64,
    /// Redundant nodes folded into this topic
    #[serde(default)]
    pub subsidiaries: Vec<SenseId>,
    /// Directly attached phrases, most frequent first
    pub raw_terms: Vec<RawTerm>,
    /// Phrases below the topic, highest weight first
    pub weighted_terms: Vec<WeightedTerm>,
    /// Aggregated descriptor sentiment
    #[serde(default)]
    pub sentiment: Option<TopicSentiment>,
}

impl Topic {
    /// Whether the phrase is one of the topic's raw terms.
    pub fn has_raw_term(&self, aspect: &str) -> bool {
        self.raw_terms.iter().any(|t| t.term == aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_key_namespaces() {
        let aspect = NodeKey::aspect("chair.n.01");
        let sense = NodeKey::sense("chair.n.01");
        assert_ne!(aspect, sense);
        assert_eq!(aspect.as_aspect(), Some("chair.n.01"));
        assert_eq!(sense.as_sense().map(SenseId::as_str), Some("chair.n.01"));
        assert!(aspect.as_sense().is_none());
    }

    #[test]
    fn test_topic_serialization() {
        let topic = Topic {
            topic_id: 0,
            sense: SenseId::new("seat.n.03"),
            importance: 0.4,
            subsidiaries: vec![SenseId::new("furniture.n.01")],
            raw_terms: vec![RawTerm {
                term: "chair".to_string(),
                count: 3,
            }],
            weighted_terms: vec![WeightedTerm {
                term: "chair".to_string(),
                weight: 3.0,
            }],
            sentiment: None,
        };
        let json = serde_json::to_string(&topic).unwrap();
        assert!(json.contains("\"sense\":\"seat.n.03\""));
        let parsed: Topic = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, topic);
        assert!(parsed.has_raw_term("chair"));
    }
}
