//! End-to-end topic extraction.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aspect_topics::{TopicExtractor, TopicsConfig};
//!
//! let extractor = TopicExtractor::new(embeddings, ontology, TopicsConfig::default())?;
//! let report = extractor.extract(&occurrences, &lexicon)?;
//! println!("{} topics", report.topics.len());
//! ```

use std::sync::Arc;

use aspect_embeddings::EmbeddingProvider;
use aspect_lexicon::{Ontology, SentimentLexicon};
use aspect_types::{AspectCounts, AspectOccurrence};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use ulid::Ulid;

use crate::config::TopicsConfig;
use crate::disambiguation::{Disambiguator, GlossVectors};
use crate::error::TopicsError;
use crate::filter::filter_redundant;
use crate::graph::HypernymGraph;
use crate::importance::ImportancePropagator;
use crate::linking::{link_aspects, KnownTopics, LinkedAspect};
use crate::sentiment::annotate_topics;
use crate::summary::Summarizer;
use crate::types::{SynsetMatch, Topic};

/// Topics of one aspect table together with the sense chosen per phrase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicTable {
    pub topics: Vec<Topic>,
    pub matches: Vec<SynsetMatch>,
}

/// Output of a full extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicReport {
    /// Unique run identifier (ULID)
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub topics: Vec<Topic>,
    pub aspects: Vec<LinkedAspect>,
}

impl TopicReport {
    /// Lookup tables for attaching later batches to this report's topics.
    pub fn known_topics(&self) -> KnownTopics {
        KnownTopics::new(&self.topics, &self.aspects)
    }
}

/// Runs disambiguation, graph construction, ranking and summarization.
pub struct TopicExtractor {
    embeddings: Arc<dyn EmbeddingProvider>,
    ontology: Arc<dyn Ontology>,
    config: TopicsConfig,
}

impl TopicExtractor {
    /// Create an extractor. Fails on an invalid configuration.
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        ontology: Arc<dyn Ontology>,
        config: TopicsConfig,
    ) -> Result<Self, TopicsError> {
        config.validate()?;
        Ok(Self {
            embeddings,
            ontology,
            config,
        })
    }

    pub fn config(&self) -> &TopicsConfig {
        &self.config
    }

    /// A disambiguator over this extractor's resources, e.g. for
    /// [`KnownTopics::attach`].
    pub fn disambiguator(&self) -> Disambiguator<'_> {
        Disambiguator::new(
            self.embeddings.as_ref(),
            self.ontology.as_ref(),
            &self.config.clustering,
        )
    }

    /// A fresh gloss vector cache over this extractor's resources.
    pub fn gloss_vectors(&self) -> GlossVectors<'_> {
        GlossVectors::new(self.ontology.as_ref(), self.embeddings.as_ref())
    }

    /// Aggregate an aspect table into topics.
    #[instrument(skip_all, fields(aspects = counts.len()))]
    pub fn get_topics(&self, counts: &AspectCounts) -> Result<TopicTable, TopicsError> {
        if counts.is_empty() {
            return Err(TopicsError::InvalidInput("aspect table is empty".to_string()));
        }

        let mut glosses = self.gloss_vectors();
        let matches = self.disambiguator().match_aspects(counts, &mut glosses)?;
        if matches.iter().all(|m| m.sense.is_none()) {
            return Err(TopicsError::NoUsableTopics(
                "no aspect phrase matched an ontology sense".to_string(),
            ));
        }

        let mut graph = HypernymGraph::from_matches(&matches, self.ontology.as_ref());
        graph.score_similarities(&mut glosses);
        let unpruned = graph.clone();
        let removed = graph.prune();
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            removed,
            "Hypernym graph built"
        );

        let propagator = ImportancePropagator::new(self.config.propagation.clone());
        let ranked = propagator.rank(&graph, counts);
        let filtered = filter_redundant(&ranked, &unpruned);

        let summarizer = Summarizer::new(self.config.summary.clone());
        let topics = summarizer.collect(&filtered, &graph, counts);
        if topics.is_empty() {
            warn!("No topic has attached terms");
        }
        summarizer.log_summary(&topics);

        info!(topics = topics.len(), "Topic extraction complete");
        Ok(TopicTable { topics, matches })
    }

    /// Aggregate occurrences into topics with sentiment and link every
    /// occurrence to its topic.
    #[instrument(skip_all, fields(occurrences = occurrences.len()))]
    pub fn extract(
        &self,
        occurrences: &[AspectOccurrence],
        lexicon: &dyn SentimentLexicon,
    ) -> Result<TopicReport, TopicsError> {
        let counts = AspectCounts::from_occurrences(occurrences);
        let TopicTable {
            mut topics,
            matches,
        } = self.get_topics(&counts)?;

        annotate_topics(&mut topics, occurrences, lexicon);
        let aspects = link_aspects(occurrences, &topics, &matches, lexicon);

        let report = TopicReport {
            run_id: Ulid::new().to_string(),
            generated_at: Utc::now(),
            topics,
            aspects,
        };
        info!(
            run_id = %report.run_id,
            linked = report.aspects.iter().filter(|a| a.topic_id.is_some()).count(),
            "Aspects linked"
        );
        Ok(report)
    }
}
