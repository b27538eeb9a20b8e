//! End-to-end pipeline tests for aspect topic aggregation.
//!
//! Occurrences -> disambiguation -> hypernym graph -> importance ->
//! redundancy filter -> topics with sentiment and linked aspects.

use std::collections::HashSet;

use pretty_assertions::assert_eq;

use aspect_lexicon::{Ontology, SenseId};
use aspect_topics::{TopicsError, TopicExtractor, TopicsConfig};
use aspect_types::{AspectCounts, AspectOccurrence};
use e2e_tests::{
    comment_texts, embedding_table, extractor, later_occurrences, occurrences, ontology,
    sentiment_lexicon,
};

fn node_of<'a>(
    aspects: &'a [aspect_topics::LinkedAspect],
    phrase: &str,
) -> &'a aspect_topics::LinkedAspect {
    aspects
        .iter()
        .find(|a| a.occurrence.aspect == phrase)
        .unwrap_or_else(|| panic!("no linked occurrence for {phrase}"))
}

#[test]
fn test_disambiguation_uses_cluster_context() {
    let counts = AspectCounts::from_occurrences(&occurrences());
    let table = extractor().get_topics(&counts).unwrap();

    let sense_of = |phrase: &str| {
        table
            .matches
            .iter()
            .find(|m| m.aspect == phrase)
            .and_then(|m| m.sense.as_ref())
            .map(|s| s.as_str().to_string())
    };
    // Clustered with other furniture, so the seat sense beats the officer
    assert_eq!(sense_of("chair").as_deref(), Some("chair.n.01"));
    assert_eq!(sense_of("legs").as_deref(), Some("leg.n.01"));
    assert_eq!(sense_of("wooden stool").as_deref(), Some("stool.n.01"));
    // Not embeddable, so never matched
    assert!(table.matches.iter().all(|m| m.aspect != "vibe"));
    // Most frequent first
    assert_eq!(table.matches[0].aspect, "chair");
}

#[test]
fn test_extract_links_every_matched_aspect() {
    let occurrences = occurrences();
    let report = extractor()
        .extract(&occurrences, &sentiment_lexicon())
        .unwrap();

    assert_eq!(report.run_id.len(), 26);
    assert!(!report.topics.is_empty());
    assert_eq!(report.aspects.len(), occurrences.len());

    for (position, topic) in report.topics.iter().enumerate() {
        assert_eq!(topic.topic_id, position);
        assert!(!topic.raw_terms.is_empty());
        assert!(topic
            .raw_terms
            .windows(2)
            .all(|w| w[0].count >= w[1].count));
    }

    for linked in &report.aspects {
        match &linked.ontology_node {
            Some(_) => {
                let topic_id = linked.topic_id.expect("matched aspect has a topic");
                assert!(report.topics[topic_id].has_raw_term(&linked.occurrence.aspect));
            }
            None => assert_eq!(linked.topic_id, None),
        }
    }

    let vibe = node_of(&report.aspects, "vibe");
    assert_eq!(vibe.ontology_node, None);
    assert_eq!(vibe.topic_id, None);
    assert_eq!(
        node_of(&report.aspects, "chair").ontology_node,
        Some(SenseId::new("chair.n.01"))
    );
}

#[test]
fn test_no_topic_is_hypernym_of_another() {
    let ontology = ontology();
    let report = extractor()
        .extract(&occurrences(), &sentiment_lexicon())
        .unwrap();

    for a in &report.topics {
        let ancestors: HashSet<SenseId> = ontology
            .hypernym_paths(&a.sense)
            .into_iter()
            .flatten()
            .filter(|s| s != &a.sense)
            .collect();
        for b in &report.topics {
            assert!(
                !ancestors.contains(&b.sense),
                "{} is a hypernym of {}",
                b.sense,
                a.sense
            );
        }
    }
}

#[test]
fn test_topic_and_occurrence_sentiment() {
    let occurrences = occurrences();
    let report = extractor()
        .extract(&occurrences, &sentiment_lexicon())
        .unwrap();

    for topic in &report.topics {
        let described = occurrences
            .iter()
            .any(|o| !o.descriptor.is_empty() && topic.has_raw_term(&o.aspect));
        assert_eq!(topic.sentiment.is_some(), described);
        if let Some(sentiment) = topic.sentiment {
            assert!(sentiment.compound > -1.0 && sentiment.compound < 1.0);
            assert!((-1.0..=1.0).contains(&sentiment.binary));
        }
    }

    // "not comfy" flips the sign of "comfy"
    let plain = report.aspects[0].sentiment.unwrap();
    let negated = report.aspects[2].sentiment.unwrap();
    assert_eq!(plain.binary, 1);
    assert_eq!(negated.binary, -1);
    assert!((plain.compound + negated.compound).abs() < 1e-12);
    // Empty descriptor and unknown descriptor carry no sentiment
    assert!(report.aspects[6].sentiment.is_none());
    assert!(node_of(&report.aspects, "vibe").sentiment.is_none());
}

#[test]
fn test_known_topics_attach_later_batch() {
    let extractor = extractor();
    let lexicon = sentiment_lexicon();
    let report = extractor.extract(&occurrences(), &lexicon).unwrap();
    let sofa_topic = node_of(&report.aspects, "sofa").topic_id;
    assert!(sofa_topic.is_some());

    let known = report.known_topics();
    let disambiguator = extractor.disambiguator();
    let mut glosses = extractor.gloss_vectors();
    let linked = known.attach(
        &later_occurrences(),
        &comment_texts(),
        &disambiguator,
        &mut glosses,
        &lexicon,
    );

    // "couch" was never seen, but shares a sense with "sofa"
    assert_eq!(linked[0].ontology_node, Some(SenseId::new("sofa.n.01")));
    assert_eq!(linked[0].topic_id, sofa_topic);
    assert_eq!(linked[1].topic_id, sofa_topic);
    assert_eq!(linked[0].sentiment.map(|p| p.binary), Some(1));
}

#[test]
fn test_extraction_is_reproducible() {
    let counts = AspectCounts::from_occurrences(&occurrences());
    let first = extractor().get_topics(&counts).unwrap();
    let second = extractor().get_topics(&counts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_too_few_distinct_aspects() {
    let occurrences = vec![
        AspectOccurrence::new("c1", 1, "chair", "comfy", false),
        AspectOccurrence::new("c2", 1, "sofa", "comfy", false),
        AspectOccurrence::new("c3", 1, "vibe", "nice", false),
    ];
    let result = extractor().extract(&occurrences, &sentiment_lexicon());
    assert!(matches!(result, Err(TopicsError::InvalidInput(_))));
}

#[test]
fn test_no_embeddable_aspects() {
    let occurrences = vec![AspectOccurrence::new("c1", 1, "vibe", "nice", false)];
    let result = extractor().extract(&occurrences, &sentiment_lexicon());
    assert!(matches!(result, Err(TopicsError::NoUsableTopics(_))));
}

#[test]
fn test_out_of_ontology_aspects() {
    // All embeddable, none a lemma of the ontology
    let occurrences = vec![
        AspectOccurrence::new("c1", 1, "officer", "sturdy", false),
        AspectOccurrence::new("c2", 1, "meeting", "wobbly", false),
        AspectOccurrence::new("c3", 1, "human", "sore", false),
        AspectOccurrence::new("c4", 1, "thing", "comfy", false),
        AspectOccurrence::new("c5", 1, "thing", "", false),
    ];
    let counts = AspectCounts::from_occurrences(&occurrences);
    assert!(matches!(
        extractor().get_topics(&counts),
        Err(TopicsError::NoUsableTopics(_))
    ));
    let result = extractor().extract(&occurrences, &sentiment_lexicon());
    assert!(matches!(result, Err(TopicsError::NoUsableTopics(_))));
}

#[test]
fn test_propagation_config_is_respected() {
    let mut config = TopicsConfig::default();
    config.propagation.iterations = 0;
    let extractor = TopicExtractor::new(
        std::sync::Arc::new(embedding_table()),
        std::sync::Arc::new(ontology()),
        config,
    )
    .unwrap();
    let counts = AspectCounts::from_occurrences(&occurrences());
    let table = extractor.get_topics(&counts).unwrap();

    // Without propagation only senses with attached phrases carry mass,
    // so every topic is a direct parent of a phrase
    for topic in &table.topics {
        assert!(topic.raw_terms.iter().any(|t| {
            table
                .matches
                .iter()
                .any(|m| m.aspect == t.term && m.sense.as_ref() == Some(&topic.sense))
        }));
    }
}
