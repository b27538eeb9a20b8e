//! Word-sense disambiguation through clustered pseudo-contexts.
//!
//! Aspect phrases carry no sentence context of their own once aggregated, so
//! each phrase borrows one: the phrases it clusters with in embedding space.
//! The sense whose gloss embedding lies closest to that context wins.

use std::collections::HashMap;

use aspect_embeddings::{Embedding, EmbeddingProvider};
use aspect_lexicon::{word_tokenize, Ontology, PartOfSpeech, SenseId};
use aspect_types::AspectCounts;
use tracing::{debug, info, instrument};

use crate::clustering::{best_cluster, kmeans};
use crate::config::ClusteringConfig;
use crate::error::TopicsError;
use crate::types::SynsetMatch;

/// Bag-of-embeddings gloss vectors, computed once per sense and run.
pub struct GlossVectors<'a> {
    ontology: &'a dyn Ontology,
    embeddings: &'a dyn EmbeddingProvider,
    cache: HashMap<SenseId, Option<Embedding>>,
}

impl<'a> GlossVectors<'a> {
    pub fn new(ontology: &'a dyn Ontology, embeddings: &'a dyn EmbeddingProvider) -> Self {
        Self {
            ontology,
            embeddings,
            cache: HashMap::new(),
        }
    }

    /// Normalized sum of the embeddings of the gloss tokens, `None` when no
    /// token can be embedded.
    pub fn vector(&mut self, sense: &SenseId) -> Option<&Embedding> {
        if !self.cache.contains_key(sense) {
            let vector = self.compute(sense);
            self.cache.insert(sense.clone(), vector);
        }
        self.cache.get(sense).and_then(Option::as_ref)
    }

    fn compute(&self, sense: &SenseId) -> Option<Embedding> {
        let gloss = self.ontology.gloss(sense)?;
        let vectors: Vec<Embedding> = word_tokenize(gloss)
            .iter()
            .filter_map(|token| self.embeddings.vector_of(token))
            .collect();
        Embedding::normalized_sum(&vectors)
    }

    /// Number of senses looked up so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Embeddable aspect phrases, most frequent first, with their vectors.
pub fn vectorize_aspects(
    counts: &AspectCounts,
    embeddings: &dyn EmbeddingProvider,
) -> (Vec<String>, Vec<Embedding>) {
    let mut aspects = Vec::new();
    let mut vectors = Vec::new();
    for (aspect, _) in counts.most_common() {
        if let Some(vector) = embeddings.vector_of(aspect) {
            aspects.push(aspect.to_string());
            vectors.push(vector);
        }
    }
    (aspects, vectors)
}

/// Context of every vector: the normalized sum of the other members of its
/// cluster. Singletons get no context.
pub fn pseudo_contexts(vectors: &[Embedding], labels: &[usize]) -> Vec<Option<Embedding>> {
    let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, &label) in labels.iter().enumerate() {
        members.entry(label).or_default().push(i);
    }

    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let others = members
                .get(label)
                .into_iter()
                .flatten()
                .filter(|&&j| j != i)
                .map(|&j| &vectors[j]);
            Embedding::normalized_sum(others)
        })
        .collect()
}

/// Noun senses of a phrase; when the whole phrase is unknown, the union of
/// the senses of its words in order, without duplicates.
pub fn candidate_senses(ontology: &dyn Ontology, aspect: &str) -> Vec<SenseId> {
    let senses = ontology.senses_of(&aspect.to_lowercase(), PartOfSpeech::Noun);
    if !senses.is_empty() {
        return senses;
    }

    let mut union: Vec<SenseId> = Vec::new();
    for word in aspect.split_whitespace() {
        for sense in ontology.senses_of(&word.to_lowercase(), PartOfSpeech::Noun) {
            if !union.contains(&sense) {
                union.push(sense);
            }
        }
    }
    if union.is_empty() {
        debug!(aspect = %aspect, "No ontology definition found");
    }
    union
}

/// A chosen sense with its context distance, if one was measured.
#[derive(Debug, Clone, PartialEq)]
pub struct SenseChoice {
    pub sense: SenseId,
    pub distance: Option<f32>,
}

/// Pick a sense among the candidates.
///
/// Senses without a gloss vector are unusable. One usable sense is taken as
/// is; without a context the first usable sense wins; otherwise the sense
/// with the smallest cosine distance to the context, first on ties.
pub fn choose_sense(
    candidates: &[SenseId],
    context: Option<&Embedding>,
    glosses: &mut GlossVectors<'_>,
) -> Option<SenseChoice> {
    let usable: Vec<(&SenseId, Embedding)> = candidates
        .iter()
        .filter_map(|sense| glosses.vector(sense).cloned().map(|v| (sense, v)))
        .collect();

    let (first, _) = usable.first()?;
    let context = match context {
        Some(context) if usable.len() > 1 => context,
        _ => {
            return Some(SenseChoice {
                sense: (*first).clone(),
                distance: None,
            })
        }
    };

    let mut best: Option<(&SenseId, f32)> = None;
    for (sense, gloss) in &usable {
        let distance = context.cosine_distance(gloss);
        let better = match best {
            Some((_, best_distance)) => distance < best_distance,
            None => true,
        };
        if better {
            best = Some((*sense, distance));
        }
    }
    best.map(|(sense, distance)| SenseChoice {
        sense: sense.clone(),
        distance: Some(distance),
    })
}

/// Assigns ontology senses to aspect phrases.
pub struct Disambiguator<'a> {
    embeddings: &'a dyn EmbeddingProvider,
    ontology: &'a dyn Ontology,
    config: &'a ClusteringConfig,
}

impl<'a> Disambiguator<'a> {
    pub fn new(
        embeddings: &'a dyn EmbeddingProvider,
        ontology: &'a dyn Ontology,
        config: &'a ClusteringConfig,
    ) -> Self {
        Self {
            embeddings,
            ontology,
            config,
        }
    }

    /// Disambiguate every embeddable phrase, most frequent first.
    ///
    /// Phrases without an embedding are left out. A phrase without a usable
    /// sense is kept with `sense: None`.
    #[instrument(skip(self, counts, glosses), fields(aspects = counts.len()))]
    pub fn match_aspects(
        &self,
        counts: &AspectCounts,
        glosses: &mut GlossVectors<'_>,
    ) -> Result<Vec<SynsetMatch>, TopicsError> {
        let (aspects, vectors) = vectorize_aspects(counts, self.embeddings);
        if aspects.is_empty() {
            return Err(TopicsError::NoUsableTopics(
                "no aspect phrase has an embedding".to_string(),
            ));
        }

        let contexts = self.contexts(&vectors)?;

        let mut matches = Vec::with_capacity(aspects.len());
        for (aspect, context) in aspects.into_iter().zip(contexts) {
            let candidates = candidate_senses(self.ontology, &aspect);
            let choice = choose_sense(&candidates, context.as_ref(), glosses);
            if let Some(SenseChoice {
                sense,
                distance: Some(distance),
            }) = &choice
            {
                debug!(aspect = %aspect, sense = %sense, distance, "Disambiguated");
            }
            matches.push(SynsetMatch {
                aspect,
                sense: choice.map(|c| c.sense),
            });
        }

        info!(
            embeddable = matches.len(),
            matched = matches.iter().filter(|m| m.sense.is_some()).count(),
            "Disambiguation complete"
        );
        Ok(matches)
    }

    fn contexts(&self, vectors: &[Embedding]) -> Result<Vec<Option<Embedding>>, TopicsError> {
        let raw: Vec<Vec<f32>> = vectors.iter().map(|e| e.values.clone()).collect();
        let k = best_cluster(&raw, self.config)?;
        let clustering = kmeans(&raw, k, self.config)?;
        Ok(pseudo_contexts(vectors, &clustering.labels))
    }

    /// Disambiguate a single phrase against the text it was found in.
    ///
    /// The context is the normalized sum of the embeddings of the text's
    /// tokens other than the phrase's own words.
    pub fn match_from_single(
        &self,
        aspect: &str,
        text: &str,
        glosses: &mut GlossVectors<'_>,
    ) -> Option<SenseId> {
        let own: Vec<String> = aspect
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        let vectors: Vec<Embedding> = word_tokenize(text)
            .iter()
            .filter(|token| !own.contains(&token.to_lowercase()))
            .filter_map(|token| self.embeddings.vector_of(token))
            .collect();
        let context = Embedding::normalized_sum(&vectors);

        let candidates = candidate_senses(self.ontology, aspect);
        choose_sense(&candidates, context.as_ref(), glosses).map(|c| c.sense)
    }
}
