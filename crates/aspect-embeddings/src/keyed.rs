//! In-memory keyed word vectors.
//!
//! Loads a pre-trained embedding table from GloVe text (`word v1 ... vd`) or
//! word2vec text (same, preceded by a `count dim` header line). All vectors
//! are normalized once at load time.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, info};

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingProvider};

/// Word -> unit vector table with compound fallback.
#[derive(Debug, Clone)]
pub struct KeyedVectors {
    dimension: usize,
    index: HashMap<String, usize>,
    vectors: Vec<Embedding>,
}

impl KeyedVectors {
    /// Create an empty table of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            index: HashMap::new(),
            vectors: Vec::new(),
        }
    }

    /// Build a table from (word, vector) pairs.
    pub fn from_pairs<I, S>(dimension: usize, pairs: I) -> Result<Self, EmbeddingError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: AsRef<str>,
    {
        let mut table = Self::new(dimension);
        for (word, values) in pairs {
            table.insert(word.as_ref(), values)?;
        }
        Ok(table)
    }

    /// Add a word. Keys are stored lowercased; an already lowercase spelling
    /// wins over a capitalized one ("the" over "The").
    pub fn insert(&mut self, word: &str, values: Vec<f32>) -> Result<(), EmbeddingError> {
        if values.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: values.len(),
            });
        }
        let key = word.to_lowercase();
        let embedding = Embedding::new(values);
        match self.index.get(&key) {
            Some(&i) => {
                if key == word {
                    self.vectors[i] = embedding;
                }
            }
            None => {
                self.index.insert(key, self.vectors.len());
                self.vectors.push(embedding);
            }
        }
        Ok(())
    }

    /// Parse a GloVe or word2vec text table.
    pub fn read_text<R: BufRead>(reader: R) -> Result<Self, EmbeddingError> {
        let mut table: Option<KeyedVectors> = None;
        let mut declared_dimension: Option<usize> = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            // word2vec header: "<count> <dim>"
            if line_no == 0 && tokens.len() == 2 {
                if let (Ok(_), Ok(dim)) = (tokens[0].parse::<usize>(), tokens[1].parse::<usize>())
                {
                    declared_dimension = Some(dim);
                    continue;
                }
            }

            let dimension = match (&table, declared_dimension) {
                (Some(t), _) => t.dimension,
                (None, Some(dim)) => dim,
                (None, None) => tokens.len() - 1,
            };
            if dimension == 0 || tokens.len() < dimension + 1 {
                return Err(EmbeddingError::Parse {
                    line: line_no + 1,
                    message: format!(
                        "expected a word and {} values, found {} tokens",
                        dimension,
                        tokens.len()
                    ),
                });
            }

            // Some GloVe vocabularies contain words with inner spaces
            let split = tokens.len() - dimension;
            let word = tokens[..split].join(" ");
            let values = tokens[split..]
                .iter()
                .map(|t| t.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| EmbeddingError::Parse {
                    line: line_no + 1,
                    message: e.to_string(),
                })?;

            table
                .get_or_insert_with(|| KeyedVectors::new(dimension))
                .insert(&word, values)?;
        }

        let table = table.ok_or(EmbeddingError::Empty)?;
        debug!(
            words = table.len(),
            dimension = table.dimension,
            "Parsed embedding table"
        );
        Ok(table)
    }

    /// Load a text table from disk.
    pub fn load_text(path: impl AsRef<Path>) -> Result<Self, EmbeddingError> {
        let path = path.as_ref();
        info!(path = ?path, "Loading word embeddings");
        let file = std::fs::File::open(path)?;
        Self::read_text(std::io::BufReader::new(file))
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Whether the exact (lowercased) word is in the vocabulary.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(&word.to_lowercase())
    }

    fn lookup(&self, word: &str) -> Option<&Embedding> {
        self.index
            .get(&word.to_lowercase())
            .map(|&i| &self.vectors[i])
    }
}

impl EmbeddingProvider for KeyedVectors {
    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Direct lookup first; otherwise the normalized sum of the sub-word
    /// vectors, absent as soon as one sub-word is unknown.
    fn vector_of(&self, word: &str) -> Option<Embedding> {
        if let Some(embedding) = self.lookup(word) {
            return Some(embedding.clone());
        }
        let mut parts = Vec::new();
        for subword in word.split_whitespace() {
            match self.lookup(subword) {
                Some(embedding) => parts.push(embedding),
                None => {
                    debug!(word = %word, "can't vectorize");
                    return None;
                }
            }
        }
        Embedding::normalized_sum(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table() -> KeyedVectors {
        KeyedVectors::from_pairs(
            2,
            vec![
                ("ice", vec![1.0, 0.0]),
                ("cream", vec![0.0, 2.0]),
                ("little", vec![3.0, 4.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_word_exists() {
        let vectors = table();
        let v = vectors.vector_of("little").unwrap();
        assert!((v.values[0] - 0.6).abs() < 0.001);
        assert!((v.values[1] - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_word_doesnt_exist() {
        assert!(table().vector_of("gibberrish").is_none());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(table().vector_of("LITTLE").is_some());
    }

    #[test]
    fn test_compound_fallback_averages_subwords() {
        let v = table().vector_of("ice cream").unwrap();
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert!((v.values[0] - half).abs() < 0.001);
        assert!((v.values[1] - half).abs() < 0.001);
    }

    #[test]
    fn test_compound_with_unknown_part_is_absent() {
        assert!(table().vector_of("ice gibberrish").is_none());
        assert!(table().vector_of("").is_none());
    }

    #[test]
    fn test_lowercase_spelling_wins() {
        let mut vectors = KeyedVectors::new(2);
        vectors.insert("The", vec![1.0, 0.0]).unwrap();
        vectors.insert("the", vec![0.0, 1.0]).unwrap();
        vectors.insert("THE", vec![1.0, 1.0]).unwrap();
        let v = vectors.vector_of("the").unwrap();
        assert!(v.values[0].abs() < 0.001);
        assert_eq!(vectors.len(), 1);
    }

    #[test]
    fn test_insert_dimension_mismatch() {
        let mut vectors = KeyedVectors::new(3);
        let err = vectors.insert("chair", vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_read_glove_text() {
        let text = "chair 1.0 0.0 0.0\ntable 0.0 1.0 0.0\n\n. . . 0.0 0.0 1.0\n";
        let vectors = KeyedVectors::read_text(text.as_bytes()).unwrap();
        assert_eq!(vectors.dimension(), 3);
        assert_eq!(vectors.len(), 3);
        assert!(vectors.contains(". . ."));
    }

    #[test]
    fn test_read_word2vec_header() {
        let text = "2 2\nchair 1.0 0.0\ntable 0.0 1.0\n";
        let vectors = KeyedVectors::read_text(text.as_bytes()).unwrap();
        assert_eq!(vectors.dimension(), 2);
        assert_eq!(vectors.len(), 2);
    }

    #[test]
    fn test_read_rejects_short_line() {
        let text = "chair 1.0 0.0\ntable 0.0\n";
        let err = KeyedVectors::read_text(text.as_bytes()).unwrap_err();
        assert!(matches!(err, EmbeddingError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_read_rejects_bad_number() {
        let text = "chair 1.0 zero\n";
        assert!(KeyedVectors::read_text(text.as_bytes()).is_err());
    }

    #[test]
    fn test_read_empty_is_error() {
        assert!(matches!(
            KeyedVectors::read_text("".as_bytes()),
            Err(EmbeddingError::Empty)
        ));
    }

    #[test]
    fn test_load_text_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "sofa 0.5 0.5").unwrap();
        drop(file);
        let vectors = KeyedVectors::load_text(&path).unwrap();
        assert!(vectors.vector_of("sofa").is_some());
    }
}
