//! Train/test splitting and k-fold cross-validation over row indices.
//!
//! Both operate on index vectors rather than materialized matrices; the
//! caller selects rows out of its feature and label matrices with the
//! returned indices.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{MaydayError, Result};

/// Split `n_samples` row indices into shuffled train and test sets.
///
/// `test_size` is the test fraction in (0, 1). The shuffle is driven by
/// the explicit seed, so the same inputs always produce the same split.
pub fn train_test_split(
    n_samples: usize,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_size) || test_size == 0.0 {
        return Err(MaydayError::invalid_operation(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    if n_samples < 2 {
        return Err(MaydayError::insufficient_data(format!(
            "cannot split {n_samples} samples into train and test sets"
        )));
    }
    let n_test = ((n_samples as f64) * test_size).round() as usize;
    let n_test = n_test.clamp(1, n_samples - 1);

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices.split_off(n_samples - n_test);
    Ok((indices, test))
}

/// K-fold cross-validator over row indices.
#[derive(Clone, Copy, Debug)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    /// Create a new K-fold cross-validator. `n_splits` must be at least 2.
    pub fn new(n_splits: usize) -> Self {
        KFold { n_splits }
    }

    /// Number of folds.
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate (train_indices, validation_indices) for each fold.
    ///
    /// Folds are consecutive index ranges; the remainder is spread over
    /// the first folds, as in the conventional k-fold layout.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(MaydayError::invalid_operation(
                "k-fold cross-validation needs at least 2 folds",
            ));
        }
        if n_samples < self.n_splits {
            return Err(MaydayError::insufficient_data(format!(
                "cannot split {n_samples} samples into {} folds",
                self.n_splits
            )));
        }

        let indices: Vec<usize> = (0..n_samples).collect();
        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut result = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let current = fold_size + usize::from(fold < remainder);
            let end = start + current;

            let validation = indices[start..end].to_vec();
            let mut train = Vec::with_capacity(n_samples - current);
            train.extend_from_slice(&indices[..start]);
            train.extend_from_slice(&indices[end..]);

            result.push((train, validation));
            start = end;
        }

        Ok(result)
    }
}
