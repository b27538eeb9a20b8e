//! Linking aspect occurrences back to topics.

use std::collections::HashMap;

use aspect_lexicon::{Polarity, SenseId, SentimentLexicon};
use aspect_types::AspectOccurrence;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::disambiguation::{Disambiguator, GlossVectors};
use crate::sentiment::occurrence_sentiment;
use crate::types::{SynsetMatch, Topic, TopicId};

/// An occurrence annotated with its topic, ontology node and sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedAspect {
    #[serde(flatten)]
    pub occurrence: AspectOccurrence,
    pub topic_id: Option<TopicId>,
    pub ontology_node: Option<SenseId>,
    pub sentiment: Option<Polarity>,
}

/// Topic of every raw term, first topic wins.
fn topic_by_term(topics: &[Topic]) -> HashMap<&str, TopicId> {
    let mut by_term = HashMap::new();
    for topic in topics {
        for term in &topic.raw_terms {
            by_term.entry(term.term.as_str()).or_insert(topic.topic_id);
        }
    }
    by_term
}

/// Annotate every occurrence of the batch the topics were built from.
pub fn link_aspects(
    occurrences: &[AspectOccurrence],
    topics: &[Topic],
    matches: &[SynsetMatch],
    lexicon: &dyn SentimentLexicon,
) -> Vec<LinkedAspect> {
    let by_term = topic_by_term(topics);
    let by_aspect: HashMap<&str, &SenseId> = matches
        .iter()
        .filter_map(|m| m.sense.as_ref().map(|s| (m.aspect.as_str(), s)))
        .collect();

    occurrences
        .iter()
        .map(|occurrence| LinkedAspect {
            occurrence: occurrence.clone(),
            topic_id: by_term.get(occurrence.aspect.as_str()).copied(),
            ontology_node: by_aspect.get(occurrence.aspect.as_str()).map(|s| (*s).clone()),
            sentiment: occurrence_sentiment(occurrence, lexicon),
        })
        .collect()
}

/// Lookup tables of a previously built topic table, used to attach
/// occurrences from a later batch.
#[derive(Debug, Clone, Default)]
pub struct KnownTopics {
    by_aspect: HashMap<String, (Option<TopicId>, Option<SenseId>)>,
    by_sense: HashMap<SenseId, TopicId>,
}

impl KnownTopics {
    /// Build from the topics and linked occurrences of an earlier run.
    ///
    /// A sense maps to the topic that contains it, either as the topic node,
    /// a subsidiary or the node a linked aspect was disambiguated to.
    pub fn new(topics: &[Topic], linked: &[LinkedAspect]) -> Self {
        let mut known = Self::default();
        for topic in topics {
            known.by_sense.entry(topic.sense.clone()).or_insert(topic.topic_id);
            for sense in &topic.subsidiaries {
                known.by_sense.entry(sense.clone()).or_insert(topic.topic_id);
            }
        }
        for link in linked {
            known
                .by_aspect
                .entry(link.occurrence.aspect.clone())
                .or_insert((link.topic_id, link.ontology_node.clone()));
            if let (Some(sense), Some(topic_id)) = (&link.ontology_node, link.topic_id) {
                known.by_sense.entry(sense.clone()).or_insert(topic_id);
            }
        }
        known
    }

    pub fn aspect_count(&self) -> usize {
        self.by_aspect.len()
    }

    pub fn topic_of_sense(&self, sense: &SenseId) -> Option<TopicId> {
        self.by_sense.get(sense).copied()
    }

    /// Attach new occurrences. Aspects seen before reuse their link; others
    /// are disambiguated against their comment text (looked up by
    /// `text_id` in `texts`) and matched to a known sense.
    pub fn attach(
        &self,
        occurrences: &[AspectOccurrence],
        texts: &HashMap<String, String>,
        disambiguator: &Disambiguator<'_>,
        glosses: &mut GlossVectors<'_>,
        lexicon: &dyn SentimentLexicon,
    ) -> Vec<LinkedAspect> {
        occurrences
            .iter()
            .map(|occurrence| {
                let (topic_id, ontology_node) = match self.by_aspect.get(&occurrence.aspect) {
                    Some((topic_id, sense)) => (*topic_id, sense.clone()),
                    None => {
                        let text = texts.get(&occurrence.text_id).map_or("", String::as_str);
                        let sense =
                            disambiguator.match_from_single(&occurrence.aspect, text, glosses);
                        let topic_id = sense.as_ref().and_then(|s| self.topic_of_sense(s));
                        debug!(
                            aspect = %occurrence.aspect,
                            sense = ?sense.as_ref().map(SenseId::as_str),
                            topic_id = ?topic_id,
                            "Attached unseen aspect"
                        );
                        (topic_id, sense)
                    }
                };
                LinkedAspect {
                    occurrence: occurrence.clone(),
                    topic_id,
                    ontology_node,
                    sentiment: occurrence_sentiment(occurrence, lexicon),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusteringConfig;
    use crate::types::RawTerm;
    use aspect_embeddings::KeyedVectors;
    use aspect_lexicon::{PartOfSpeech::Noun, SynsetRecord, VaderLexicon, WordNetStore};
    use pretty_assertions::assert_eq;

    fn topic(topic_id: usize, sense: &str, terms: &[&str]) -> Topic {
        Topic {
            topic_id,
            sense: SenseId::new(sense),
            importance: 0.5,
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

    fn matched(aspect: &str, sense: Option<&str>) -> SynsetMatch {
        SynsetMatch {
            aspect: aspect.to_string(),
            sense: sense.map(SenseId::new),
        }
    }

    fn lexicon() -> VaderLexicon {
        VaderLexicon::from_valences([("comfy", 2.0)])
    }

    #[test]
    fn test_link_aspects() {
        let topics = vec![topic(0, "seat.n.03", &["chair", "sofa"]), topic(1, "arm.n.01", &["arm"])];
        let matches = vec![
            matched("chair", Some("chair.n.01")),
            matched("arm", Some("arm.n.01")),
            matched("vibe", None),
        ];
        let occurrences = vec![
            AspectOccurrence::new("c1", 0, "chair", "comfy", true),
            AspectOccurrence::new("c2", 0, "arm", "long", false),
            AspectOccurrence::new("c3", 0, "vibe", "", false),
        ];
        let linked = link_aspects(&occurrences, &topics, &matches, &lexicon());
        assert_eq!(linked[0].topic_id, Some(0));
        assert_eq!(linked[0].ontology_node, Some(SenseId::new("chair.n.01")));
        assert_eq!(linked[0].sentiment.map(|p| p.binary), Some(-1));
        assert_eq!(linked[1].topic_id, Some(1));
        assert!(linked[1].sentiment.is_none());
        assert_eq!(linked[2].topic_id, None);
        assert_eq!(linked[2].ontology_node, None);
    }

    #[test]
    fn test_linked_aspect_serializes_flat() {
        let linked = LinkedAspect {
            occurrence: AspectOccurrence::new("c1", 2, "chair", "comfy", false),
            topic_id: Some(0),
            ontology_node: None,
            sentiment: None,
        };
        let value = serde_json::to_value(&linked).unwrap();
        assert_eq!(value["aspect"], "chair");
        assert_eq!(value["topic_id"], 0);
    }

    #[test]
    fn test_known_topics_attach() {
        let embeddings = KeyedVectors::from_pairs(
            2,
            vec![
                ("seat", vec![1.0, 0.0]),
                ("furniture", vec![0.9, 0.1]),
                ("officer", vec![0.0, 1.0]),
                ("meeting", vec![0.1, 0.9]),
            ],
        )
        .unwrap();
        let ontology = WordNetStore::from_synsets(vec![
            SynsetRecord::new("seat.n.03", Noun, &["seat"], "furniture", &[]),
            SynsetRecord::new("chair.n.01", Noun, &["chair"], "seat furniture", &["seat.n.03"]),
            SynsetRecord::new("chair.n.02", Noun, &["chair"], "meeting officer", &[]),
        ])
        .unwrap();
        let config = ClusteringConfig::default();
        let disambiguator = Disambiguator::new(&embeddings, &ontology, &config);
        let mut glosses = GlossVectors::new(&ontology, &embeddings);

        let mut seat = topic(0, "seat.n.03", &["sofa"]);
        seat.subsidiaries = vec![SenseId::new("chair.n.01")];
        let earlier = vec![LinkedAspect {
            occurrence: AspectOccurrence::new("c1", 0, "sofa", "comfy", false),
            topic_id: Some(0),
            ontology_node: Some(SenseId::new("sofa.n.01")),
            sentiment: None,
        }];
        let known = KnownTopics::new(&[seat], &earlier);
        assert_eq!(known.aspect_count(), 1);
        assert_eq!(known.topic_of_sense(&SenseId::new("sofa.n.01")), Some(0));

        let texts = HashMap::from([
            ("c2".to_string(), "this chair is a furniture seat".to_string()),
            ("c3".to_string(), "the chair called the meeting".to_string()),
        ]);
        let occurrences = vec![
            AspectOccurrence::new("c1", 4, "sofa", "comfy", false),
            AspectOccurrence::new("c2", 1, "chair", "comfy", false),
            AspectOccurrence::new("c3", 1, "chair", "", false),
        ];
        let linked = known.attach(&occurrences, &texts, &disambiguator, &mut glosses, &lexicon());
        assert_eq!(linked[0].topic_id, Some(0));
        assert_eq!(linked[1].ontology_node, Some(SenseId::new("chair.n.01")));
        assert_eq!(linked[1].topic_id, Some(0));
        assert_eq!(linked[2].ontology_node, Some(SenseId::new("chair.n.02")));
        assert_eq!(linked[2].topic_id, None);
    }
}
