//! TF-IDF vectorizer over normalized token sequences.
//!
//! `fit` enumerates every distinct token across the training corpus and
//! computes a smoothed inverse-document-frequency weight per feature.
//! `transform` multiplies per-document token counts by those weights.
//!
//! The vocabulary and IDF table are frozen at fit time and serialized into
//! the model artifact. `transform` never adds a feature index: tokens the
//! training corpus has not seen contribute zero at inference, which is the
//! anti-leakage invariant the train/inference parity depends on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MaydayError, Result};
use crate::features::{FeatureMatrix, SparseVector};

/// TF-IDF vectorizer with a frozen vocabulary.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    /// Vocabulary: token -> feature index.
    vocabulary: HashMap<String, u32>,
    /// Inverse document frequency per feature, aligned 1:1 with the vocabulary.
    idf: Vec<f32>,
    /// Number of training documents seen at fit time.
    n_documents: usize,
}

impl std::fmt::Debug for TfidfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfidfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .finish()
    }
}

impl TfidfVectorizer {
    /// Fit a vectorizer on normalized training documents.
    ///
    /// Feature indices follow first appearance order across the corpus, so
    /// fitting the same corpus twice yields identical vocabularies.
    pub fn fit(documents: &[Vec<String>]) -> Result<Self> {
        if documents.is_empty() {
            return Err(MaydayError::insufficient_data(
                "cannot fit vectorizer on an empty corpus",
            ));
        }

        let n_documents = documents.len();
        let mut vocabulary: HashMap<String, u32> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc in documents {
            let mut seen_in_doc: Vec<u32> = Vec::new();
            for token in doc {
                let next_index = vocabulary.len() as u32;
                let index = *vocabulary
                    .entry(token.clone())
                    .or_insert_with(|| {
                        document_frequency.push(0);
                        next_index
                    });
                if !seen_in_doc.contains(&index) {
                    seen_in_doc.push(index);
                    document_frequency[index as usize] += 1;
                }
            }
        }

        // Smoothed IDF: ln((n + 1) / (df + 1)) + 1
        let idf = document_frequency
            .iter()
            .map(|&df| (((n_documents as f32) + 1.0) / ((df as f32) + 1.0)).ln() + 1.0)
            .collect();

        Ok(TfidfVectorizer {
            vocabulary,
            idf,
            n_documents,
        })
    }

    /// Transform one normalized document into a sparse weighted vector.
    ///
    /// Tokens outside the frozen vocabulary are ignored; they never grow
    /// it. An empty document maps to the all-zero vector.
    pub fn transform_document(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<u32, f32> = HashMap::new();
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        SparseVector::from_entries(
            counts
                .into_iter()
                .map(|(index, count)| (index, count * self.idf[index as usize]))
                .collect(),
        )
    }

    /// Transform a batch of normalized documents into a feature matrix.
    pub fn transform(&self, documents: &[Vec<String>]) -> FeatureMatrix {
        let rows = documents
            .iter()
            .map(|doc| self.transform_document(doc))
            .collect();
        FeatureMatrix::new(rows, self.vocabulary.len())
    }

    /// Size of the frozen vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// The feature index of a token, if it was seen at fit time.
    pub fn feature_index(&self, token: &str) -> Option<u32> {
        self.vocabulary.get(token).copied()
    }

    /// Number of documents in the fitting corpus.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// The IDF weight for a feature index.
    pub fn idf(&self, index: u32) -> f32 {
        self.idf[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|doc| doc.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_fit_builds_vocabulary() {
        let corpus = docs(&[&["water", "need"], &["food", "water"]]);
        let vectorizer = TfidfVectorizer::fit(&corpus).unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 3);
        assert!(vectorizer.feature_index("water").is_some());
        assert!(vectorizer.feature_index("shelter").is_none());
    }

    #[test]
    fn test_rare_tokens_weighted_higher() {
        // "water" appears in every document, "fire" in one
        let corpus = docs(&[&["water", "fire"], &["water"], &["water"]]);
        let vectorizer = TfidfVectorizer::fit(&corpus).unwrap();

        let water = vectorizer.feature_index("water").unwrap();
        let fire = vectorizer.feature_index("fire").unwrap();
        assert!(vectorizer.idf(fire) > vectorizer.idf(water));
    }

    #[test]
    fn test_transform_counts_times_idf() {
        let corpus = docs(&[&["water", "water", "need"], &["food"]]);
        let vectorizer = TfidfVectorizer::fit(&corpus).unwrap();

        let row = vectorizer.transform_document(&["water".to_string(), "water".to_string()]);
        let water = vectorizer.feature_index("water").unwrap();
        let expected = 2.0 * vectorizer.idf(water);
        assert!((row.value(water) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_transform_ignores_unknown_tokens() {
        let corpus = docs(&[&["water", "need"]]);
        let vectorizer = TfidfVectorizer::fit(&corpus).unwrap();
        let before = vectorizer.vocabulary_size();

        let row = vectorizer.transform_document(&["earthquake".to_string()]);
        assert!(row.is_zero());
        // vocabulary never grows at transform time
        assert_eq!(vectorizer.vocabulary_size(), before);
    }

    #[test]
    fn test_transform_empty_document_is_zero_vector() {
        let corpus = docs(&[&["water", "need"]]);
        let vectorizer = TfidfVectorizer::fit(&corpus).unwrap();

        let row = vectorizer.transform_document(&[]);
        assert!(row.is_zero());
    }

    #[test]
    fn test_fit_deterministic() {
        let corpus = docs(&[&["water", "need"], &["food", "shelter", "water"]]);
        let a = TfidfVectorizer::fit(&corpus).unwrap();
        let b = TfidfVectorizer::fit(&corpus).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_empty_corpus_fails() {
        let err = TfidfVectorizer::fit(&[]).unwrap_err();
        assert!(matches!(err, MaydayError::InsufficientData(_)));
    }
}
