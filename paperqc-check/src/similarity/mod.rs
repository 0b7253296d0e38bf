//! Hybrid lexical similarity engine
//!
//! Scores text pairs with a weighted blend of TF-IDF cosine similarity and
//! Jaccard set overlap, and ranks candidate sets against a query. Similarity
//! is inherently approximate: every internal failure mode degrades to a 0.0
//! score instead of erroring, so a bad pair can never fail a caller working
//! through a batch.

pub mod tokenizer;

pub use tokenizer::{Tokenizer, UnigramTokenizer};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Weight of the TF-IDF cosine component in the combined score
pub const VECTOR_WEIGHT: f64 = 0.7;
/// Weight of the Jaccard set-overlap component in the combined score
pub const SET_WEIGHT: f64 = 0.3;

/// A candidate text to rank against a query
#[derive(Debug, Clone)]
pub struct SimilarityCandidate {
    pub id: i64,
    pub text: String,
}

/// A candidate that scored at or above the ranking threshold
#[derive(Debug, Clone)]
pub struct SimilarityMatch {
    pub id: i64,
    pub text: String,
    /// Combined weighted score in [0, 1]
    pub similarity: f64,
    pub vector_similarity: f64,
    pub set_similarity: f64,
}

/// Hybrid lexical similarity engine
#[derive(Clone)]
pub struct SimilarityEngine {
    tokenizer: Arc<dyn Tokenizer>,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::with_tokenizer(Arc::new(UnigramTokenizer))
    }
}

impl SimilarityEngine {
    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Combined similarity of two texts, in [0, 1].
    ///
    /// `VECTOR_WEIGHT * cosine + SET_WEIGHT * jaccard`; symmetric, and 1.0
    /// for identical non-empty texts.
    pub fn combined_similarity(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let tokens_a = self.tokenizer.tokenize(a);
        let tokens_b = self.tokenizer.tokenize(b);

        let vector = vector_similarity(&tokens_a, &tokens_b);
        let set = set_similarity(&tokens_a, &tokens_b);

        VECTOR_WEIGHT * vector + SET_WEIGHT * set
    }

    /// Rank candidates against a query.
    ///
    /// Retains candidates scoring at or above `threshold`, sorted descending
    /// by combined similarity; ties keep original candidate order.
    pub fn rank_similar(
        &self,
        query: &str,
        candidates: &[SimilarityCandidate],
        threshold: f64,
    ) -> Vec<SimilarityMatch> {
        if query.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let query_tokens = self.tokenizer.tokenize(query);

        let mut matches: Vec<SimilarityMatch> = candidates
            .iter()
            .filter(|c| !c.text.is_empty())
            .filter_map(|candidate| {
                let tokens = self.tokenizer.tokenize(&candidate.text);
                let vector = vector_similarity(&query_tokens, &tokens);
                let set = set_similarity(&query_tokens, &tokens);
                let similarity = VECTOR_WEIGHT * vector + SET_WEIGHT * set;

                (similarity >= threshold).then(|| SimilarityMatch {
                    id: candidate.id,
                    text: candidate.text.clone(),
                    similarity,
                    vector_similarity: vector,
                    set_similarity: set,
                })
            })
            .collect();

        // sort_by is stable, so equal scores keep candidate order
        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        matches
    }
}

/// Cosine similarity of TF-IDF vectors built over the two-document corpus
/// {a, b}. Returns 0.0 when either side has no tokens or the texts share no
/// vocabulary.
fn vector_similarity(tokens_a: &[String], tokens_b: &[String]) -> f64 {
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(tokens_a);
    let counts_b = term_counts(tokens_b);

    let mut vocabulary: HashSet<&str> = HashSet::new();
    vocabulary.extend(counts_a.keys().copied());
    vocabulary.extend(counts_b.keys().copied());

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for term in vocabulary {
        // Smoothed idf over the two-document corpus: ln((1 + n) / (1 + df)) + 1
        let df = counts_a.contains_key(term) as u32 + counts_b.contains_key(term) as u32;
        let idf = ((1.0 + 2.0) / (1.0 + df as f64)).ln() + 1.0;

        let weight_a = counts_a.get(term).copied().unwrap_or(0) as f64 / tokens_a.len() as f64 * idf;
        let weight_b = counts_b.get(term).copied().unwrap_or(0) as f64 / tokens_b.len() as f64 * idf;

        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }

    if dot <= 0.0 || norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Jaccard similarity of the two term sets; 0.0 on an empty union
fn set_similarity(tokens_a: &[String], tokens_b: &[String]) -> f64 {
    let set_a: HashSet<&str> = tokens_a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = tokens_b.iter().map(String::as_str).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

fn term_counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}
