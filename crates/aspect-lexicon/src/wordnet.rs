//! In-memory WordNet-style ontology.
//!
//! Synsets are loaded from a JSON export:
//!
//! ```json
//! {"synsets": [
//!   {"id": "chair.n.01", "pos": "noun", "lemmas": ["chair"],
//!    "gloss": "a seat for one person", "hypernyms": ["seat.n.03"]}
//! ]}
//! ```
//!
//! Lemma lookup follows WordNet conventions: lowercase, spaces joined with
//! underscores, and the noun detachment rules ("chairs" -> "chair").

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LexiconError;
use crate::ontology::{Ontology, PartOfSpeech, SenseId};

/// Noun inflection suffixes and their base endings.
const NOUN_DETACHMENTS: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// One synset as stored in the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynsetRecord {
    pub id: SenseId,
    pub pos: PartOfSpeech,
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub gloss: String,
    /// Immediate hypernyms (instance hypernyms included)
    #[serde(default)]
    pub hypernyms: Vec<SenseId>,
}

impl SynsetRecord {
    pub fn new(
        id: &str,
        pos: PartOfSpeech,
        lemmas: &[&str],
        gloss: &str,
        hypernyms: &[&str],
    ) -> Self {
        Self {
            id: SenseId::new(id),
            pos,
            lemmas: lemmas.iter().map(|l| l.to_string()).collect(),
            gloss: gloss.to_string(),
            hypernyms: hypernyms.iter().map(|h| SenseId::new(*h)).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SynsetExport {
    synsets: Vec<SynsetRecord>,
}

/// In-memory ontology backed by a list of synsets.
#[derive(Debug, Clone)]
pub struct WordNetStore {
    synsets: Vec<SynsetRecord>,
    by_id: HashMap<SenseId, usize>,
    /// Immediate hypernyms as indices, resolved once at load time
    hypernyms: Vec<Vec<usize>>,
    lemma_index: HashMap<(PartOfSpeech, String), Vec<usize>>,
}

impl WordNetStore {
    /// Build a store, validating identifiers and hypernym references.
    pub fn from_synsets(synsets: Vec<SynsetRecord>) -> Result<Self, LexiconError> {
        let mut by_id = HashMap::with_capacity(synsets.len());
        for (i, synset) in synsets.iter().enumerate() {
            if by_id.insert(synset.id.clone(), i).is_some() {
                return Err(LexiconError::DuplicateSense(synset.id.to_string()));
            }
        }

        let mut hypernyms = Vec::with_capacity(synsets.len());
        for synset in &synsets {
            let resolved = synset
                .hypernyms
                .iter()
                .map(|h| {
                    by_id
                        .get(h)
                        .copied()
                        .ok_or_else(|| LexiconError::UnknownSense(h.to_string()))
                })
                .collect::<Result<Vec<usize>, _>>()?;
            hypernyms.push(resolved);
        }

        let mut lemma_index: HashMap<(PartOfSpeech, String), Vec<usize>> = HashMap::new();
        for (i, synset) in synsets.iter().enumerate() {
            for lemma in &synset.lemmas {
                let entry = lemma_index
                    .entry((synset.pos, normalize_lemma(lemma)))
                    .or_default();
                if !entry.contains(&i) {
                    entry.push(i);
                }
            }
        }

        debug!(
            synsets = synsets.len(),
            lemmas = lemma_index.len(),
            "Built ontology index"
        );

        Ok(Self {
            synsets,
            by_id,
            hypernyms,
            lemma_index,
        })
    }

    /// Parse a JSON synset export.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, LexiconError> {
        let export: SynsetExport = serde_json::from_reader(reader)?;
        Self::from_synsets(export.synsets)
    }

    /// Load a JSON synset export from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        info!(path = ?path, "Loading ontology");
        let file = std::fs::File::open(path)?;
        Self::read_json(std::io::BufReader::new(file))
    }

    /// Number of synsets.
    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    /// Look up a synset record.
    pub fn synset(&self, sense: &SenseId) -> Option<&SynsetRecord> {
        self.by_id.get(sense).map(|&i| &self.synsets[i])
    }

    /// Candidate base forms: the word itself, then every detachment that
    /// applies (nouns only).
    fn base_forms(word: &str, pos: PartOfSpeech) -> Vec<String> {
        let word = normalize_lemma(word);
        let mut forms = vec![word.clone()];
        if pos == PartOfSpeech::Noun {
            for (suffix, ending) in NOUN_DETACHMENTS {
                if let Some(stem) = word.strip_suffix(suffix) {
                    if !stem.is_empty() {
                        let form = format!("{stem}{ending}");
                        if !forms.contains(&form) {
                            forms.push(form);
                        }
                    }
                }
            }
        }
        forms
    }
}

fn normalize_lemma(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

impl Ontology for WordNetStore {
    fn senses_of(&self, word: &str, pos: PartOfSpeech) -> Vec<SenseId> {
        let mut seen = HashSet::new();
        let mut senses = Vec::new();
        for form in Self::base_forms(word, pos) {
            if let Some(indices) = self.lemma_index.get(&(pos, form)) {
                for &i in indices {
                    if seen.insert(i) {
                        senses.push(self.synsets[i].id.clone());
                    }
                }
            }
        }
        senses
    }

    fn hypernym_paths(&self, sense: &SenseId) -> Vec<Vec<SenseId>> {
        let Some(&start) = self.by_id.get(sense) else {
            return Vec::new();
        };

        // Partial paths run leaf-first; a path is complete once its last
        // node has no hypernym left to climb to.
        let mut paths = Vec::new();
        let mut stack: Vec<Vec<usize>> = vec![vec![start]];
        while let Some(partial) = stack.pop() {
            let Some(&top) = partial.last() else {
                continue;
            };
            let next: Vec<usize> = self.hypernyms[top]
                .iter()
                .copied()
                .filter(|h| !partial.contains(h))
                .collect();
            if next.is_empty() {
                paths.push(
                    partial
                        .iter()
                        .rev()
                        .map(|&i| self.synsets[i].id.clone())
                        .collect(),
                );
                continue;
            }
            // Reverse push keeps the first hypernym's paths first
            for &h in next.iter().rev() {
                let mut extended = partial.clone();
                extended.push(h);
                stack.push(extended);
            }
        }
        paths
    }

    fn gloss(&self, sense: &SenseId) -> Option<&str> {
        self.synset(sense).map(|s| s.gloss.as_str())
    }
}
