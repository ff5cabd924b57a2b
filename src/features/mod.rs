//! Feature extraction: sparse vectors and the TF-IDF vectorizer.
//!
//! Message token sequences become sparse weighted count vectors over a
//! vocabulary fixed at fit time. The matrix stays sparse end to end; the
//! tree trainer reads individual cells through [`SparseVector::value`].

pub mod tfidf;

pub use tfidf::TfidfVectorizer;

use serde::{Deserialize, Serialize};

/// A sparse feature vector: (feature index, weight) entries sorted by index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(u32, f32)>,
}

impl SparseVector {
    /// Build a sparse vector from entries, sorting them by feature index.
    ///
    /// Entries with zero weight are dropped.
    pub fn from_entries(mut entries: Vec<(u32, f32)>) -> Self {
        entries.retain(|(_, w)| *w != 0.0);
        entries.sort_unstable_by_key(|(idx, _)| *idx);
        SparseVector { entries }
    }

    /// An all-zero vector.
    pub fn zero() -> Self {
        SparseVector::default()
    }

    /// The weight at `index`, zero when absent.
    pub fn value(&self, index: u32) -> f32 {
        match self.entries.binary_search_by_key(&index, |(idx, _)| *idx) {
            Ok(pos) => self.entries[pos].1,
            Err(_) => 0.0,
        }
    }

    /// Non-zero entries in index order.
    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A sparse feature matrix: one [`SparseVector`] row per document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    rows: Vec<SparseVector>,
    n_features: usize,
}

impl FeatureMatrix {
    /// Build a matrix from rows over a feature space of `n_features`.
    pub fn new(rows: Vec<SparseVector>, n_features: usize) -> Self {
        FeatureMatrix { rows, n_features }
    }

    /// (rows, features) shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_features)
    }

    /// Number of document rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Width of the feature space.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// The row at `index`.
    pub fn row(&self, index: usize) -> &SparseVector {
        &self.rows[index]
    }

    /// All rows in document order.
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// A new matrix holding clones of the selected rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            n_features: self.n_features,
        }
    }
}
