//! Descriptor sentiment aggregation.

use std::collections::HashMap;

use aspect_lexicon::{Polarity, SentimentLexicon};
use aspect_types::AspectOccurrence;
use serde::{Deserialize, Serialize};

use crate::types::Topic;

/// Count-weighted mean descriptor sentiment of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicSentiment {
    /// Mean compound score in (-1, 1)
    pub compound: f64,
    /// Mean binary score in [-1, 1]
    pub binary: f64,
}

/// Descriptors attached to a topic's raw terms, with their counts, in first
/// appearance order.
pub fn descriptor_counts<'a>(
    topic: &Topic,
    occurrences: &'a [AspectOccurrence],
) -> Vec<(&'a str, u32)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for occurrence in occurrences {
        let descriptor = occurrence.descriptor.trim();
        if descriptor.is_empty() || !topic.has_raw_term(&occurrence.aspect) {
            continue;
        }
        let count = counts.entry(descriptor).or_insert_with(|| {
            order.push(descriptor);
            0
        });
        *count += 1;
    }
    order
        .into_iter()
        .map(|d| (d, counts.get(d).copied().unwrap_or(0)))
        .collect()
}

/// Mean of the descriptor polarities weighted by count. Descriptors unknown
/// to the lexicon count as neutral. `None` without descriptors.
pub fn weighted_sentiment(
    descriptors: &[(&str, u32)],
    lexicon: &dyn SentimentLexicon,
) -> Option<TopicSentiment> {
    let total: u32 = descriptors.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return None;
    }
    let (compound, binary) = descriptors.iter().fold((0.0, 0.0), |(c, b), (word, count)| {
        let polarity = lexicon.polarity(word).unwrap_or_default();
        (
            c + polarity.compound * *count as f64,
            b + polarity.binary as f64 * *count as f64,
        )
    });
    Some(TopicSentiment {
        compound: compound / total as f64,
        binary: binary / total as f64,
    })
}

/// Fill in the sentiment of every topic.
pub fn annotate_topics(
    topics: &mut [Topic],
    occurrences: &[AspectOccurrence],
    lexicon: &dyn SentimentLexicon,
) {
    for topic in topics.iter_mut() {
        let descriptors = descriptor_counts(topic, occurrences);
        topic.sentiment = weighted_sentiment(&descriptors, lexicon);
    }
}

/// Sentiment of one occurrence: its descriptor's polarity, sign-flipped
/// when the occurrence is negated.
pub fn occurrence_sentiment(
    occurrence: &AspectOccurrence,
    lexicon: &dyn SentimentLexicon,
) -> Option<Polarity> {
    let descriptor = occurrence.descriptor.trim();
    if descriptor.is_empty() {
        return None;
    }
    let polarity = lexicon.polarity(descriptor)?;
    Some(if occurrence.is_negated {
        polarity.negated()
    } else {
        polarity
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawTerm;
    use aspect_lexicon::{SenseId, VaderLexicon};

    fn lexicon() -> VaderLexicon {
        VaderLexicon::from_valences([("comfy", 2.0), ("wobbly", -1.5)])
    }

    fn topic(terms: &[&str]) -> Topic {
        Topic {
            topic_id: 0,
            sense: SenseId::new("seat.n.03"),
            importance: 1.0,
            subsidiaries: Vec::new(),
            raw_terms: terms
                .iter()
                .map(|t| RawTerm {
                    term: t.to_string(),
                    count: 1,
                })
                .collect(),
            weighted_terms: Vec::new(),
            sentiment: None,
        }
    }

    fn occurrences() -> Vec<AspectOccurrence> {
        vec![
            AspectOccurrence::new("c1", 0, "chair", "comfy", false),
            AspectOccurrence::new("c2", 0, "chair", "comfy", true),
            AspectOccurrence::new("c3", 0, "stool", "wobbly", false),
            AspectOccurrence::new("c4", 0, "stool", "blue", false),
            AspectOccurrence::new("c5", 0, "lamp", "comfy", false),
            AspectOccurrence::new("c6", 0, "stool", "", false),
        ]
    }

    #[test]
    fn test_descriptor_counts() {
        let occurrences = occurrences();
        let counts = descriptor_counts(&topic(&["chair", "stool"]), &occurrences);
        assert_eq!(counts, vec![("comfy", 2), ("wobbly", 1), ("blue", 1)]);
    }

    #[test]
    fn test_weighted_sentiment() {
        let lexicon = lexicon();
        let comfy = Polarity::from_valence(2.0).compound;
        let wobbly = Polarity::from_valence(-1.5).compound;
        let s = weighted_sentiment(&[("comfy", 2), ("wobbly", 1), ("blue", 1)], &lexicon).unwrap();
        assert!((s.compound - (2.0 * comfy + wobbly) / 4.0).abs() < 1e-12);
        assert!((s.binary - 0.25).abs() < 1e-12);
        assert!(weighted_sentiment(&[], &lexicon).is_none());
    }

    #[test]
    fn test_annotate_topics() {
        let mut topics = vec![topic(&["chair"]), topic(&["sofa"])];
        annotate_topics(&mut topics, &occurrences(), &lexicon());
        assert_eq!(topics[0].sentiment.map(|s| s.binary), Some(1.0));
        assert!(topics[1].sentiment.is_none());
    }

    #[test]
    fn test_occurrence_sentiment_flips_negation() {
        let lexicon = lexicon();
        let occurrences = occurrences();
        let plain = occurrence_sentiment(&occurrences[0], &lexicon).unwrap();
        let negated = occurrence_sentiment(&occurrences[1], &lexicon).unwrap();
        assert_eq!(plain.binary, 1);
        assert_eq!(negated.binary, -1);
        assert!((plain.compound + negated.compound).abs() < 1e-12);
        assert!(occurrence_sentiment(&occurrences[3], &lexicon).is_none());
        assert!(occurrence_sentiment(&occurrences[5], &lexicon).is_none());
    }
}
