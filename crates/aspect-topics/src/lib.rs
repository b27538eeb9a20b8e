//! # aspect-topics
//!
//! Topic aggregation for extracted aspect phrases.
//!
//! Aspect phrases ("chair", "sofa", "wooden stool") are mapped onto an
//! ontology and grouped under shared hypernyms, which become the topics.
//!
//! ## Pipeline
//! 1. Disambiguation: phrases are clustered in embedding space (k-means with
//!    a silhouette-chosen cluster count) and each phrase takes the sense whose
//!    gloss is closest to its cluster's pseudo-context
//! 2. Hypernym graph: every sense contributes its hypernym paths; edges are
//!    scored with gloss similarity and the graph is pruned to an approximate
//!    Steiner tree over the phrases
//! 3. Importance: damped propagation from senses to hypernyms
//! 4. Filtering: nodes connected to a higher-ranked node are folded into it
//! 5. Summary: raw and similarity-weighted terms per topic, descriptor
//!    sentiment, and occurrence linkage

pub mod clustering;
pub mod config;
pub mod disambiguation;
pub mod error;
pub mod extraction;
pub mod filter;
pub mod graph;
pub mod importance;
pub mod linking;
pub mod sentiment;
pub mod similarity;
pub mod steiner;
pub mod summary;
pub mod types;

pub use clustering::{best_cluster, kmeans, silhouette_score, KMeans};
pub use config::{ClusteringConfig, PropagationConfig, SummaryConfig, TopicsConfig};
pub use disambiguation::{Disambiguator, GlossVectors};
pub use error::TopicsError;
pub use extraction::{TopicExtractor, TopicReport, TopicTable};
pub use filter::{filter_redundant, FilteredTopics};
pub use graph::{GraphEdge, GraphNode, HypernymGraph};
pub use importance::ImportancePropagator;
pub use linking::{link_aspects, KnownTopics, LinkedAspect};
pub use sentiment::TopicSentiment;
pub use steiner::steiner_nodes;
pub use summary::Summarizer;
pub use types::{NodeKey, RankedNode, RawTerm, SynsetMatch, Topic, TopicId, WeightedTerm};
