//! Word-level sentiment lexicon.
//!
//! Reads the VADER lexicon format: one entry per line, tab separated, with
//! the token first and the mean valence (roughly -4..4) second. Trailing
//! columns (standard deviation, raw ratings) are ignored.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LexiconError;

/// Normalization constant mapping a raw valence into (-1, 1).
const VALENCE_ALPHA: f64 = 15.0;

/// Sentiment of a word or an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Polarity {
    /// Normalized score in (-1, 1)
    pub compound: f64,
    /// Sign of the score: -1, 0 or 1
    pub binary: i8,
}

impl Polarity {
    /// Polarity of a raw valence.
    pub fn from_valence(valence: f64) -> Self {
        let compound = valence / (valence * valence + VALENCE_ALPHA).sqrt();
        let binary = if valence > 0.0 {
            1
        } else if valence < 0.0 {
            -1
        } else {
            0
        };
        Self { compound, binary }
    }

    /// Same magnitude, opposite sign.
    pub fn negated(self) -> Self {
        Self {
            compound: -self.compound,
            binary: -self.binary,
        }
    }
}

/// Word polarity lookup.
pub trait SentimentLexicon: Send + Sync {
    /// Polarity of a single word, `None` if the word carries no sentiment
    /// information.
    fn polarity(&self, word: &str) -> Option<Polarity>;
}

/// VADER-style valence table.
#[derive(Debug, Clone, Default)]
pub struct VaderLexicon {
    valences: HashMap<String, f64>,
}

impl VaderLexicon {
    pub fn from_valences<I, S>(valences: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        Self {
            valences: valences
                .into_iter()
                .map(|(word, v)| (word.as_ref().to_lowercase(), v))
                .collect(),
        }
    }

    /// Parse the tab-separated lexicon format.
    pub fn read<R: BufRead>(reader: R) -> Result<Self, LexiconError> {
        let mut valences = HashMap::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut columns = line.split('\t');
            let token = columns.next().unwrap_or_default().trim();
            let valence = columns
                .next()
                .ok_or_else(|| LexiconError::Parse {
                    line: line_no + 1,
                    message: "missing valence column".to_string(),
                })?
                .trim()
                .parse::<f64>()
                .map_err(|e| LexiconError::Parse {
                    line: line_no + 1,
                    message: e.to_string(),
                })?;
            valences.insert(token.to_lowercase(), valence);
        }
        debug!(entries = valences.len(), "Parsed sentiment lexicon");
        Ok(Self { valences })
    }

    /// Load the lexicon from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        info!(path = ?path, "Loading sentiment lexicon");
        let file = std::fs::File::open(path)?;
        Self::read(std::io::BufReader::new(file))
    }

    /// Raw valence of a word.
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl SentimentLexicon for VaderLexicon {
    fn polarity(&self, word: &str) -> Option<Polarity> {
        self.valence(word).map(Polarity::from_valence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_valence() {
        let p = Polarity::from_valence(1.9);
        assert!((p.compound - 1.9 / (1.9f64 * 1.9 + 15.0).sqrt()).abs() < 1e-9);
        assert_eq!(p.binary, 1);

        let p = Polarity::from_valence(-2.5);
        assert!(p.compound < 0.0);
        assert_eq!(p.binary, -1);

        assert_eq!(Polarity::from_valence(0.0), Polarity::default());
    }

    #[test]
    fn test_negated() {
        let p = Polarity::from_valence(2.0).negated();
        assert!(p.compound < 0.0);
        assert_eq!(p.binary, -1);
    }

    #[test]
    fn test_read_vader_format() {
        let text = "good\t1.9\t0.9434\t[2, 1, 2]\nBAD\t-2.5\t0.67082\t[-3]\n\n";
        let lexicon = VaderLexicon::read(text.as_bytes()).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.valence("Good"), Some(1.9));
        assert_eq!(lexicon.polarity("bad").map(|p| p.binary), Some(-1));
        assert!(lexicon.polarity("chair").is_none());
    }

    #[test]
    fn test_read_rejects_bad_line() {
        let err = VaderLexicon::read("good\t1.9\nbad\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LexiconError::Parse { line: 2, .. }));

        let err = VaderLexicon::read("good\tvery\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LexiconError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vader.txt");
        std::fs::write(&path, "great\t3.1\t0.5\n").unwrap();
        let lexicon = VaderLexicon::load(&path).unwrap();
        assert!(lexicon.polarity("great").unwrap().compound > 0.5);
    }
}
