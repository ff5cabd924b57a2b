//! Multi-output classifier: one forest per label, indexed by the label
//! vocabulary.
//!
//! Label positions are enforced by the [`LabelVocabulary`] rather than by
//! column-offset convention: forests are stored in vocabulary order and
//! every prediction is zipped back with the vocabulary names.

use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::codec::LabelVocabulary;
use crate::error::{MaydayError, Result};
use crate::features::{FeatureMatrix, SparseVector};
use crate::model::forest::RandomForestClassifier;
use crate::model::trainer::HyperParams;

/// Label matrix: one label vector per document row, aligned with a
/// [`LabelVocabulary`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMatrix {
    rows: Vec<Vec<u8>>,
    n_labels: usize,
}

impl LabelMatrix {
    /// Build a label matrix, validating row lengths against `n_labels`.
    pub fn new(rows: Vec<Vec<u8>>, n_labels: usize) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_labels {
                return Err(MaydayError::invalid_operation(format!(
                    "label row {i} has {} entries, expected {n_labels}",
                    row.len()
                )));
            }
        }
        Ok(LabelMatrix { rows, n_labels })
    }

    /// (rows, labels) shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_labels)
    }

    /// Number of document rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of label columns.
    pub fn n_labels(&self) -> usize {
        self.n_labels
    }

    /// The label vector of one document row.
    pub fn row(&self, index: usize) -> &[u8] {
        &self.rows[index]
    }

    /// The values of one label column across all rows.
    pub fn column(&self, label_index: usize) -> Vec<u8> {
        self.rows.iter().map(|row| row[label_index]).collect()
    }

    /// A new matrix holding clones of the selected rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> LabelMatrix {
        LabelMatrix {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            n_labels: self.n_labels,
        }
    }
}

/// One fitted forest per label, in vocabulary order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiOutputForest {
    vocabulary: LabelVocabulary,
    forests: Vec<RandomForestClassifier>,
}

impl MultiOutputForest {
    /// Fit one forest per label column.
    ///
    /// Labels that carry a single class across the whole training split
    /// produce a degenerate constant predictor; this is logged, not an
    /// error. Each label derives its own forest seed from the base seed
    /// and its vocabulary position, so fitting is deterministic and
    /// independent of label parallelism.
    pub fn fit(
        x: &FeatureMatrix,
        y: &LabelMatrix,
        vocabulary: &LabelVocabulary,
        params: &HyperParams,
        seed: u64,
    ) -> Result<Self> {
        if y.n_labels() != vocabulary.len() {
            return Err(MaydayError::invalid_operation(format!(
                "label matrix has {} columns, vocabulary has {} names",
                y.n_labels(),
                vocabulary.len()
            )));
        }
        if x.n_rows() != y.n_rows() {
            return Err(MaydayError::invalid_operation(format!(
                "feature rows ({}) do not match label rows ({})",
                x.n_rows(),
                y.n_rows()
            )));
        }

        let forests = (0..vocabulary.len())
            .into_par_iter()
            .map(|label_index| {
                let column = y.column(label_index);
                if column.iter().all(|&v| v == column[0]) {
                    warn!(
                        "label '{}' has a single class in the training split; \
                         training a degenerate constant predictor",
                        vocabulary.names()[label_index]
                    );
                }

                let label_seed = seed.wrapping_add((label_index as u64 + 1) * 1_000_003);
                let mut forest = RandomForestClassifier::new(params.n_estimators)
                    .with_min_samples_split(params.min_samples_split)
                    .with_seed(label_seed);
                forest.fit(x, &column)?;
                Ok(forest)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MultiOutputForest {
            vocabulary: vocabulary.clone(),
            forests,
        })
    }

    /// Predict the full label vector for one feature row.
    pub fn predict_row(&self, row: &SparseVector) -> Vec<u8> {
        self.forests
            .iter()
            .map(|forest| forest.predict_row(row))
            .collect()
    }

    /// Predict every row of a feature matrix.
    pub fn predict(&self, x: &FeatureMatrix) -> Vec<Vec<u8>> {
        x.rows().iter().map(|row| self.predict_row(row)).collect()
    }

    /// The label vocabulary this model is indexed by.
    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    /// Iterate over (label name, forest) pairs in vocabulary order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &RandomForestClassifier)> {
        self.vocabulary.iter().zip(self.forests.iter())
    }

    /// Number of per-label forests.
    pub fn n_labels(&self) -> usize {
        self.forests.len()
    }
}
