//! # aspect-lexicon
//!
//! Lexical services consumed by the topic engine.
//!
//! - [`Ontology`]: noun senses of a word, their glosses and hypernym paths.
//!   [`WordNetStore`] is an in-memory WordNet-style implementation loaded
//!   from a JSON synset export.
//! - [`SentimentLexicon`]: per-word polarity. [`VaderLexicon`] reads the
//!   VADER lexicon format.
//! - [`word_tokenize`]: the gloss tokenizer used for bag-of-embeddings
//!   sense vectors.

pub mod error;
pub mod ontology;
pub mod sentiment;
pub mod tokenize;
pub mod wordnet;

pub use error::LexiconError;
pub use ontology::{Ontology, PartOfSpeech, SenseId};
pub use sentiment::{Polarity, SentimentLexicon, VaderLexicon};
pub use tokenize::word_tokenize;
pub use wordnet::{SynsetRecord, WordNetStore};
