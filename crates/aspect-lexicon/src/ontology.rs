//! Ontology interface.

use serde::{Deserialize, Serialize};

/// Stable identifier of an ontology sense, e.g. `chair.n.01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenseId(String);

impl SenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SenseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Part of speech of a sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

/// Read-only lexical ontology.
///
/// Implementations must be thread-safe (Send + Sync) so independent batches
/// can share one loaded ontology.
pub trait Ontology: Send + Sync {
    /// Senses of a word restricted to one part of speech, most common first.
    fn senses_of(&self, word: &str, pos: PartOfSpeech) -> Vec<SenseId>;

    /// Every hypernym path of a sense. Each path is root-first and ends with
    /// the sense itself; a root sense has the single path `[sense]`.
    fn hypernym_paths(&self, sense: &SenseId) -> Vec<Vec<SenseId>>;

    /// Dictionary definition of a sense.
    fn gloss(&self, sense: &SenseId) -> Option<&str>;
}
