//! Cross-validated grid search over ensemble hyperparameters.
//!
//! Each grid candidate is scored by k-fold cross-validation on the
//! training split. The score is subset accuracy with the multi-output
//! model treated as one scoring unit: a validation row counts as correct
//! only when every label matches. The best candidate is refit on the
//! entire training split to produce the final per-label ensembles.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::codec::LabelVocabulary;
use crate::error::{MaydayError, Result};
use crate::features::FeatureMatrix;
use crate::model::multioutput::{LabelMatrix, MultiOutputForest};
use crate::model::selection::KFold;

/// One hyperparameter configuration for the per-label forests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperParams {
    /// Number of trees per forest.
    pub n_estimators: usize,
    /// Minimum samples required to split a tree node.
    pub min_samples_split: usize,
}

impl std::fmt::Display for HyperParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "n_estimators={}, min_samples_split={}",
            self.n_estimators, self.min_samples_split
        )
    }
}

/// The discrete hyperparameter grid to search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamGrid {
    pub n_estimators: Vec<usize>,
    pub min_samples_split: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        ParamGrid {
            n_estimators: vec![10, 50, 100],
            min_samples_split: vec![2, 4],
        }
    }
}

impl ParamGrid {
    /// Enumerate every grid point, in declaration order.
    pub fn candidates(&self) -> Vec<HyperParams> {
        let mut candidates = Vec::with_capacity(self.n_estimators.len() * self.min_samples_split.len());
        for &n_estimators in &self.n_estimators {
            for &min_samples_split in &self.min_samples_split {
                candidates.push(HyperParams {
                    n_estimators,
                    min_samples_split,
                });
            }
        }
        candidates
    }
}

/// Cross-validation scores for one grid candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub params: HyperParams,
    /// Subset accuracy per fold.
    pub fold_scores: Vec<f64>,
}

impl CandidateScore {
    /// Mean validation score across folds.
    pub fn mean(&self) -> f64 {
        if self.fold_scores.is_empty() {
            return f64::NAN;
        }
        self.fold_scores.iter().sum::<f64>() / self.fold_scores.len() as f64
    }
}

/// The result of a grid search run.
#[derive(Clone, Debug)]
pub struct GridSearchOutcome {
    /// The winning model, refit on the entire training split.
    pub model: MultiOutputForest,
    /// Hyperparameters of the winning candidate.
    pub best_params: HyperParams,
    /// Scores for every candidate, in grid order.
    pub candidates: Vec<CandidateScore>,
}

/// Exhaustive grid search with k-fold cross-validation.
#[derive(Clone, Debug)]
pub struct GridSearch {
    grid: ParamGrid,
    folds: usize,
    seed: u64,
}

impl GridSearch {
    /// Create a grid search over `grid` with `folds`-fold cross-validation.
    pub fn new(grid: ParamGrid) -> Self {
        GridSearch {
            grid,
            folds: 3,
            seed: 42,
        }
    }

    /// Set the number of cross-validation folds.
    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Set the seed threaded through every forest fit.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run the search and refit the best candidate on the full split.
    pub fn fit(
        &self,
        x: &FeatureMatrix,
        y: &LabelMatrix,
        vocabulary: &LabelVocabulary,
    ) -> Result<GridSearchOutcome> {
        let candidates = self.grid.candidates();
        if candidates.is_empty() {
            return Err(MaydayError::training("hyperparameter grid is empty"));
        }
        if x.n_rows() != y.n_rows() {
            return Err(MaydayError::invalid_operation(format!(
                "feature rows ({}) do not match label rows ({})",
                x.n_rows(),
                y.n_rows()
            )));
        }

        let folds = KFold::new(self.folds).split(x.n_rows())?;

        let scored: Vec<CandidateScore> = candidates
            .par_iter()
            .map(|params| self.score_candidate(params, x, y, vocabulary, &folds))
            .collect::<Result<Vec<_>>>()?;

        let mut best: Option<&CandidateScore> = None;
        for candidate in &scored {
            let mean = candidate.mean();
            debug!("candidate {}: mean cv score {:.4}", candidate.params, mean);
            if mean.is_nan() {
                continue;
            }
            if best.is_none_or(|b| mean > b.mean()) {
                best = Some(candidate);
            }
        }

        let best = best.ok_or_else(|| {
            MaydayError::training("grid search produced no valid candidate")
        })?;
        info!(
            "grid search winner: {} (mean cv score {:.4})",
            best.params,
            best.mean()
        );

        let model = MultiOutputForest::fit(x, y, vocabulary, &best.params, self.seed)?;
        Ok(GridSearchOutcome {
            model,
            best_params: best.params,
            candidates: scored.clone(),
        })
    }

    fn score_candidate(
        &self,
        params: &HyperParams,
        x: &FeatureMatrix,
        y: &LabelMatrix,
        vocabulary: &LabelVocabulary,
        folds: &[(Vec<usize>, Vec<usize>)],
    ) -> Result<CandidateScore> {
        let mut fold_scores = Vec::with_capacity(folds.len());
        for (train_idx, validation_idx) in folds {
            let x_train = x.select(train_idx);
            let y_train = y.select(train_idx);
            let x_val = x.select(validation_idx);
            let y_val = y.select(validation_idx);

            let model = MultiOutputForest::fit(&x_train, &y_train, vocabulary, params, self.seed)?;
            fold_scores.push(subset_accuracy(&model, &x_val, &y_val));
        }

        Ok(CandidateScore {
            params: *params,
            fold_scores,
        })
    }
}

/// Fraction of rows whose entire predicted label vector matches the truth.
pub fn subset_accuracy(model: &MultiOutputForest, x: &FeatureMatrix, y: &LabelMatrix) -> f64 {
    if x.n_rows() == 0 {
        return f64::NAN;
    }
    let correct = (0..x.n_rows())
        .filter(|&i| model.predict_row(x.row(i)) == y.row(i))
        .count();
    correct as f64 / x.n_rows() as f64
}
