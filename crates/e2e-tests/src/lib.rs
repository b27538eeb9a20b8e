//! End-to-end test infrastructure for aspect topic aggregation.
//!
//! Provides a miniature furniture/body ontology, a matching embedding
//! table, a sentiment lexicon and a batch of aspect occurrences, both in
//! memory and written to a temp directory for the file loaders.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use aspect_embeddings::KeyedVectors;
use aspect_lexicon::{VaderLexicon, WordNetStore};
use aspect_topics::{TopicExtractor, TopicsConfig};
use aspect_types::AspectOccurrence;

/// GloVe-style table. Axis 0 is furniture, 1 is body, 2 is people.
pub const EMBEDDINGS: &str = "\
seat 1.0 0.0 0.0 0.1
furniture 0.9 0.1 0.0 0.0
sitting 0.95 0.0 0.05 0.0
chair 0.9 0.05 0.2 0.0
sofa 1.0 0.1 0.0 0.0
couch 0.95 0.1 0.0 0.0
stool 0.9 0.0 0.0 0.2
wooden 0.7 0.0 0.0 0.3
table 0.85 0.15 0.0 0.1
upholstered 0.9 0.0 0.0 0.2
flat 0.6 0.0 0.0 0.4
arm 0.05 1.0 0.1 0.0
legs 0.0 0.9 0.05 0.1
leg 0.0 0.95 0.0 0.1
limb 0.1 1.0 0.0 0.0
body 0.0 1.0 0.1 0.0
part 0.1 0.6 0.0 0.3
officer 0.0 0.0 1.0 0.0
meeting 0.0 0.1 1.0 0.1
human 0.0 0.1 0.9 0.0
thing 0.3 0.3 0.3 0.3
physical 0.3 0.3 0.0 0.3
";

/// Synset export in the JSON ontology format.
pub const ONTOLOGY: &str = r#"{"synsets": [
  {"id": "entity.n.01", "pos": "noun", "lemmas": ["entity"], "gloss": "a thing"},
  {"id": "object.n.01", "pos": "noun", "lemmas": ["object"],
   "gloss": "a physical thing", "hypernyms": ["entity.n.01"]},
  {"id": "person.n.01", "pos": "noun", "lemmas": ["person"],
   "gloss": "a human", "hypernyms": ["entity.n.01"]},
  {"id": "furniture.n.01", "pos": "noun", "lemmas": ["furniture"],
   "gloss": "furniture for sitting", "hypernyms": ["object.n.01"]},
  {"id": "seat.n.03", "pos": "noun", "lemmas": ["seat"],
   "gloss": "furniture for sitting", "hypernyms": ["furniture.n.01"]},
  {"id": "chair.n.01", "pos": "noun", "lemmas": ["chair"],
   "gloss": "a seat for one", "hypernyms": ["seat.n.03"]},
  {"id": "chair.n.02", "pos": "noun", "lemmas": ["chair", "chairman"],
   "gloss": "the officer of a meeting", "hypernyms": ["person.n.01"]},
  {"id": "sofa.n.01", "pos": "noun", "lemmas": ["sofa", "couch"],
   "gloss": "an upholstered seat", "hypernyms": ["seat.n.03"]},
  {"id": "stool.n.01", "pos": "noun", "lemmas": ["stool"],
   "gloss": "a seat without a back", "hypernyms": ["seat.n.03"]},
  {"id": "table.n.02", "pos": "noun", "lemmas": ["table"],
   "gloss": "furniture with a flat top", "hypernyms": ["furniture.n.01"]},
  {"id": "body_part.n.01", "pos": "noun", "lemmas": ["body part"],
   "gloss": "part of a body", "hypernyms": ["object.n.01"]},
  {"id": "limb.n.01", "pos": "noun", "lemmas": ["limb"],
   "gloss": "a body limb", "hypernyms": ["body_part.n.01"]},
  {"id": "arm.n.01", "pos": "noun", "lemmas": ["arm"],
   "gloss": "a human limb", "hypernyms": ["limb.n.01"]},
  {"id": "leg.n.01", "pos": "noun", "lemmas": ["leg"],
   "gloss": "a limb of the body", "hypernyms": ["limb.n.01"]}
]}"#;

/// VADER-format lexicon lines.
pub const SENTIMENT: &str = "\
comfy\t2.0\t0.6\t[2, 2, 3, 1, 2]
sturdy\t1.5\t0.5\t[1, 2, 2, 1, 2]
wobbly\t-1.5\t0.5\t[-1, -2, -2, -1, -2]
sore\t-1.8\t0.7\t[-2, -1, -2, -2, -2]
";

/// One comment per occurrence batch entry: `(text_id, text)`.
pub fn comment_texts() -> HashMap<String, String> {
    [
        ("c1", "the chair is comfy"),
        ("c2", "a comfy chair for sitting"),
        ("c3", "this chair is not comfy at all"),
        ("c4", "the chair is wobbly"),
        ("c5", "the sofa is comfy"),
        ("c6", "a sturdy sofa"),
        ("c7", "the sofa"),
        ("c8", "the stool is wobbly"),
        ("c9", "a sturdy wooden stool"),
        ("c10", "my arm is sore"),
        ("c11", "my legs are sore"),
        ("c12", "a sturdy table"),
        ("c13", "the vibe is nice"),
        ("c14", "the couch is a comfy upholstered seat"),
    ]
    .into_iter()
    .map(|(id, text)| (id.to_string(), text.to_string()))
    .collect()
}

/// The first batch of aspect occurrences.
pub fn occurrences() -> Vec<AspectOccurrence> {
    vec![
        AspectOccurrence::new("c1", 1, "chair", "comfy", false),
        AspectOccurrence::new("c2", 2, "chair", "comfy", false),
        AspectOccurrence::new("c3", 1, "chair", "comfy", true),
        AspectOccurrence::new("c4", 1, "chair", "wobbly", false),
        AspectOccurrence::new("c5", 1, "sofa", "comfy", false),
        AspectOccurrence::new("c6", 2, "sofa", "sturdy", false),
        AspectOccurrence::new("c7", 1, "sofa", "", false),
        AspectOccurrence::new("c8", 1, "stool", "wobbly", false),
        AspectOccurrence::new("c9", 2, "wooden stool", "sturdy", false),
        AspectOccurrence::new("c10", 1, "arm", "sore", false),
        AspectOccurrence::new("c10", 1, "arm", "", false),
        AspectOccurrence::new("c11", 1, "legs", "sore", false),
        AspectOccurrence::new("c12", 2, "table", "sturdy", false),
        AspectOccurrence::new("c13", 1, "vibe", "nice", false),
    ]
}

/// A later batch containing a phrase the first batch never saw.
pub fn later_occurrences() -> Vec<AspectOccurrence> {
    vec![
        AspectOccurrence::new("c14", 1, "couch", "comfy", false),
        AspectOccurrence::new("c5", 1, "sofa", "comfy", false),
    ]
}

pub fn embedding_table() -> KeyedVectors {
    KeyedVectors::read_text(EMBEDDINGS.as_bytes()).expect("Failed to parse test embeddings")
}

pub fn ontology() -> WordNetStore {
    WordNetStore::read_json(ONTOLOGY.as_bytes()).expect("Failed to parse test ontology")
}

pub fn sentiment_lexicon() -> VaderLexicon {
    VaderLexicon::read(SENTIMENT.as_bytes()).expect("Failed to parse test lexicon")
}

/// Extractor over the in-memory fixtures with default settings.
pub fn extractor() -> TopicExtractor {
    TopicExtractor::new(
        Arc::new(embedding_table()),
        Arc::new(ontology()),
        TopicsConfig::default(),
    )
    .expect("Default configuration is valid")
}

/// Fixture files written to a temp directory.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    pub aspects_path: PathBuf,
    pub embeddings_path: PathBuf,
    pub ontology_path: PathBuf,
    pub sentiment_path: PathBuf,
    pub output_dir: PathBuf,
}

impl TestHarness {
    /// Create a temp directory holding every fixture file.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let aspects_path = root.join("aspects.json");
        let aspects = serde_json::to_string(&occurrences()).expect("Failed to encode aspects");
        std::fs::write(&aspects_path, aspects).expect("Failed to write aspects");

        let embeddings_path = root.join("embeddings.txt");
        std::fs::write(&embeddings_path, EMBEDDINGS).expect("Failed to write embeddings");

        let ontology_path = root.join("ontology.json");
        std::fs::write(&ontology_path, ONTOLOGY).expect("Failed to write ontology");

        let sentiment_path = root.join("vader_lexicon.txt");
        std::fs::write(&sentiment_path, SENTIMENT).expect("Failed to write lexicon");

        let output_dir = root.join("output");

        Self {
            _temp_dir: temp_dir,
            aspects_path,
            embeddings_path,
            ontology_path,
            sentiment_path,
            output_dir,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
