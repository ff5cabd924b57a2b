//! Bagged ensemble of randomized decision trees for one label.
//!
//! Each tree trains on a bootstrap sample of the rows; randomness comes
//! from an explicit base seed, with tree `i` deriving its own RNG from
//! `seed + i`. Trees are grown in parallel with rayon; derivation from the
//! tree index keeps the result independent of thread scheduling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{MaydayError, Result};
use crate::features::{FeatureMatrix, SparseVector};
use crate::model::tree::DecisionTreeClassifier;

/// Random forest classifier for a single label column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    min_samples_split: usize,
    max_depth: Option<usize>,
    seed: u64,
    /// Majority class of the training labels, used as the vote tie-breaker
    /// baseline and as the prediction of an empty forest.
    majority_class: u8,
}

impl RandomForestClassifier {
    /// Create an unfitted forest with `n_estimators` trees.
    pub fn new(n_estimators: usize) -> Self {
        RandomForestClassifier {
            trees: Vec::new(),
            n_estimators,
            min_samples_split: 2,
            max_depth: None,
            seed: 0,
            majority_class: 0,
        }
    }

    /// Set the minimum number of samples required to split a tree node.
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the maximum depth of each tree.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the base seed for bootstrap and feature subsampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit the forest: one tree per bootstrap sample of the rows.
    pub fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err(MaydayError::invalid_operation(format!(
                "feature rows ({}) do not match label rows ({})",
                x.n_rows(),
                y.len()
            )));
        }
        if y.is_empty() {
            return Err(MaydayError::insufficient_data(
                "cannot fit a forest on zero samples",
            ));
        }
        if self.n_estimators == 0 {
            return Err(MaydayError::invalid_operation(
                "forest needs at least one tree",
            ));
        }

        self.majority_class = majority_class(y);

        let n_samples = y.len();
        self.trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_index| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(tree_index as u64));
                let bootstrap: Vec<usize> =
                    (0..n_samples).map(|_| rng.random_range(0..n_samples)).collect();

                let bx = x.select(&bootstrap);
                let by: Vec<u8> = bootstrap.iter().map(|&i| y[i]).collect();

                let mut tree = DecisionTreeClassifier::new()
                    .with_min_samples_split(self.min_samples_split);
                if let Some(depth) = self.max_depth {
                    tree = tree.with_max_depth(depth);
                }
                tree.fit(&bx, &by, &mut rng)?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(())
    }

    /// Predict the class of one row by majority vote across trees.
    ///
    /// Vote ties break toward the training majority class, then toward the
    /// smaller class label, so prediction is deterministic.
    pub fn predict_row(&self, row: &SparseVector) -> u8 {
        if self.trees.is_empty() {
            return self.majority_class;
        }

        let mut votes: [usize; 256] = [0; 256];
        for tree in &self.trees {
            votes[tree.predict_row(row) as usize] += 1;
        }

        let mut best_class = self.majority_class;
        let mut best_votes = votes[self.majority_class as usize];
        for (class, &count) in votes.iter().enumerate() {
            if count > best_votes {
                best_class = class as u8;
                best_votes = count;
            }
        }
        best_class
    }

    /// Predict every row of a feature matrix.
    pub fn predict(&self, x: &FeatureMatrix) -> Vec<u8> {
        x.rows().iter().map(|row| self.predict_row(row)).collect()
    }

    /// The majority class observed at fit time.
    pub fn majority_class(&self) -> u8 {
        self.majority_class
    }

    /// Number of fitted trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Whether `fit` has been called.
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

/// Most frequent class; ties break toward the smaller label.
fn majority_class(y: &[u8]) -> u8 {
    let mut counts: [usize; 256] = [0; 256];
    for &label in y {
        counts[label as usize] += 1;
    }
    let mut best = 0u8;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best as usize] {
            best = class as u8;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SparseVector;

    fn matrix(rows: Vec<Vec<(u32, f32)>>, n_features: usize) -> FeatureMatrix {
        FeatureMatrix::new(
            rows.into_iter().map(SparseVector::from_entries).collect(),
            n_features,
        )
    }

    fn separable_data() -> (FeatureMatrix, Vec<u8>) {
        let x = matrix(
            vec![
                vec![(0, 3.0)],
                vec![(0, 2.5)],
                vec![(0, 3.5)],
                vec![(1, 1.0)],
                vec![(1, 2.0)],
                vec![],
            ],
            2,
        );
        let y = vec![1, 1, 1, 0, 0, 0];
        (x, y)
    }

    #[test]
    fn test_forest_learns_separable_data() {
        let (x, y) = separable_data();
        let mut forest = RandomForestClassifier::new(20).with_seed(42);
        forest.fit(&x, &y).unwrap();

        assert_eq!(forest.n_trees(), 20);
        assert_eq!(forest.predict_row(&SparseVector::from_entries(vec![(0, 3.0)])), 1);
        assert_eq!(forest.predict_row(&SparseVector::from_entries(vec![(1, 1.5)])), 0);
    }

    #[test]
    fn test_forest_deterministic_for_fixed_seed() {
        let (x, y) = separable_data();

        let mut a = RandomForestClassifier::new(10).with_seed(42);
        a.fit(&x, &y).unwrap();
        let mut b = RandomForestClassifier::new(10).with_seed(42);
        b.fit(&x, &y).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.predict(&x), b.predict(&x));
    }

    #[test]
    fn test_forest_seed_changes_trees() {
        let (x, y) = separable_data();

        let mut a = RandomForestClassifier::new(10).with_seed(1);
        a.fit(&x, &y).unwrap();
        let mut b = RandomForestClassifier::new(10).with_seed(2);
        b.fit(&x, &y).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_forest_single_class_degenerates() {
        let x = matrix(vec![vec![(0, 1.0)], vec![(0, 2.0)], vec![]], 1);
        let y = vec![0, 0, 0];

        let mut forest = RandomForestClassifier::new(5).with_seed(7);
        forest.fit(&x, &y).unwrap();

        assert_eq!(forest.predict_row(&SparseVector::from_entries(vec![(0, 9.0)])), 0);
        assert_eq!(forest.majority_class(), 0);
    }

    #[test]
    fn test_empty_row_falls_back_to_majority_vote() {
        let (x, y) = separable_data();
        let mut forest = RandomForestClassifier::new(20).with_seed(42);
        forest.fit(&x, &y).unwrap();

        // all-zero query routes every tree to its zero-region leaf
        let prediction = forest.predict_row(&SparseVector::zero());
        assert_eq!(prediction, 0);
    }

    #[test]
    fn test_forest_fit_empty_fails() {
        let x = FeatureMatrix::new(Vec::new(), 2);
        let mut forest = RandomForestClassifier::new(5);
        let err = forest.fit(&x, &[]).unwrap_err();
        assert!(matches!(err, MaydayError::InsufficientData(_)));
    }
}
