//! Aspect occurrences and the aggregated aspect-count table.
//!
//! An aspect is a noun phrase extracted from a comment. The upstream parser
//! emits one [`AspectOccurrence`] per (phrase, descriptor) mention; the topic
//! engine only ever consumes the aggregated [`AspectCounts`].

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AspectError;

/// A single aspect mention produced by the upstream parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectOccurrence {
    /// Identifier of the comment the aspect was found in
    pub text_id: String,
    /// Token position of the aspect within the comment
    pub position: usize,
    /// Surface noun phrase (case preserved)
    pub aspect: String,
    /// Adjective describing the aspect
    pub descriptor: String,
    /// Whether the descriptor is negated ("not comfortable")
    #[serde(default)]
    pub is_negated: bool,
}

impl AspectOccurrence {
    /// Create a new occurrence.
    pub fn new(
        text_id: impl Into<String>,
        position: usize,
        aspect: impl Into<String>,
        descriptor: impl Into<String>,
        is_negated: bool,
    ) -> Self {
        Self {
            text_id: text_id.into(),
            position,
            aspect: aspect.into(),
            descriptor: descriptor.into(),
            is_negated,
        }
    }

    /// Read a JSON array of occurrences.
    pub fn read_json<R: Read>(reader: R) -> Result<Vec<Self>, AspectError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a JSON array of occurrences from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Vec<Self>, AspectError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read_json(std::io::BufReader::new(file))
    }
}

/// Phrase -> occurrence count, remembering first-seen order.
///
/// Keys are case-sensitive. First-seen order is only used to break ties in
/// [`AspectCounts::most_common`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AspectCounts {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl AspectCounts {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the aspects of a slice of occurrences.
    pub fn from_occurrences(occurrences: &[AspectOccurrence]) -> Self {
        let mut counts = Self::new();
        for occurrence in occurrences {
            counts.add(&occurrence.aspect, 1);
        }
        counts
    }

    /// Add `count` mentions of `aspect`.
    pub fn add(&mut self, aspect: &str, count: u32) {
        match self.index.get(aspect) {
            Some(&i) => self.entries[i].1 = self.entries[i].1.saturating_add(count),
            None => {
                self.index.insert(aspect.to_string(), self.entries.len());
                self.entries.push((aspect.to_string(), count));
            }
        }
    }

    /// Count for an aspect, if present.
    pub fn get(&self, aspect: &str) -> Option<u32> {
        self.index.get(aspect).map(|&i| self.entries[i].1)
    }

    /// Count for an aspect, zero if absent.
    pub fn count(&self, aspect: &str) -> u32 {
        self.get(aspect).unwrap_or(0)
    }

    pub fn contains(&self, aspect: &str) -> bool {
        self.index.contains_key(aspect)
    }

    /// Number of distinct aspects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), *c))
    }

    /// All aspects sorted by descending count, ties kept in first-seen order.
    pub fn most_common(&self) -> Vec<(&str, u32)> {
        let mut ordered: Vec<(&str, u32)> = self.iter().collect();
        // sort_by is stable
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        ordered
    }
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for AspectCounts {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (aspect, count) in iter {
            counts.add(aspect.as_ref(), count);
        }
        counts
    }
}

impl<'a> FromIterator<&'a str> for AspectCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = Self::new();
        for aspect in iter {
            counts.add(aspect, 1);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_occurrences_counts_mentions() {
        let occurrences = vec![
            AspectOccurrence::new("1", 0, "chair", "comfy", false),
            AspectOccurrence::new("2", 4, "table", "small", false),
            AspectOccurrence::new("3", 2, "chair", "hard", true),
        ];
        let counts = AspectCounts::from_occurrences(&occurrences);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("chair"), Some(2));
        assert_eq!(counts.get("table"), Some(1));
        assert_eq!(counts.get("sofa"), None);
        assert_eq!(counts.count("sofa"), 0);
    }

    #[test]
    fn test_counts_are_case_sensitive() {
        let counts: AspectCounts = ["Chair", "chair", "chair"].into_iter().collect();
        assert_eq!(counts.get("Chair"), Some(1));
        assert_eq!(counts.get("chair"), Some(2));
    }

    #[test]
    fn test_most_common_is_stable_on_ties() {
        let counts: AspectCounts = [("leg", 2), ("arm", 5), ("seat", 2), ("back", 1)]
            .into_iter()
            .collect();
        let ordered: Vec<&str> = counts.most_common().into_iter().map(|(a, _)| a).collect();
        assert_eq!(ordered, vec!["arm", "leg", "seat", "back"]);
    }

    #[test]
    fn test_from_pairs_sums_duplicates() {
        let counts: AspectCounts = [("leg", 2), ("leg", 3)].into_iter().collect();
        assert_eq!(counts.get("leg"), Some(5));
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_read_json_defaults_negation() {
        let json = r#"[{"text_id":"7","position":3,"aspect":"sofa","descriptor":"soft"}]"#;
        let occurrences = AspectOccurrence::read_json(json.as_bytes()).unwrap();
        assert_eq!(occurrences.len(), 1);
        assert!(!occurrences[0].is_negated);
        assert_eq!(occurrences[0].aspect, "sofa");
    }

    #[test]
    fn test_read_json_rejects_garbage() {
        assert!(AspectOccurrence::read_json("not json".as_bytes()).is_err());
    }
}
