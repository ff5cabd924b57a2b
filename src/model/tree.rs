//! CART decision tree over sparse TF-IDF features.
//!
//! Trees split on Gini impurity. At every node a random subset of
//! √n_features candidate features is examined, which is where the
//! per-tree randomization of the forest comes from. The caller threads an
//! explicit RNG through `fit`, so identical seeds grow identical trees.

use ahash::AHashMap;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{MaydayError, Result};
use crate::features::{FeatureMatrix, SparseVector};

/// A node in a fitted decision tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node carrying the majority class of its training samples.
    Leaf {
        /// Predicted class label.
        prediction: u8,
        /// Number of training samples that reached this leaf.
        n_samples: usize,
    },
    /// Internal split: samples with `feature <= threshold` go left.
    Split {
        feature: u32,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Decision tree classifier (CART, Gini impurity).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    root: Option<TreeNode>,
    min_samples_split: usize,
    max_depth: Option<usize>,
}

impl DecisionTreeClassifier {
    /// Create an unfitted tree.
    pub fn new() -> Self {
        DecisionTreeClassifier {
            root: None,
            min_samples_split: 2,
            max_depth: None,
        }
    }

    /// Set the minimum number of samples required to split a node.
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split.max(2);
        self
    }

    /// Set the maximum tree depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Fit the tree on the given rows.
    ///
    /// `rng` drives the per-node feature subsampling; pass a seeded RNG
    /// for reproducible trees.
    pub fn fit(&mut self, x: &FeatureMatrix, y: &[u8], rng: &mut StdRng) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err(MaydayError::invalid_operation(format!(
                "feature rows ({}) do not match label rows ({})",
                x.n_rows(),
                y.len()
            )));
        }
        if y.is_empty() {
            return Err(MaydayError::insufficient_data(
                "cannot fit a tree on zero samples",
            ));
        }

        let indices: Vec<usize> = (0..y.len()).collect();
        self.root = Some(self.build_node(x, y, &indices, 0, rng));
        Ok(())
    }

    /// Predict the class for a single feature row.
    ///
    /// An unfitted tree predicts class 0.
    pub fn predict_row(&self, row: &SparseVector) -> u8 {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0,
        };

        loop {
            match node {
                TreeNode::Leaf { prediction, .. } => return *prediction,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row.value(*feature) <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Whether `fit` has produced a tree.
    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    fn build_node(
        &self,
        x: &FeatureMatrix,
        y: &[u8],
        indices: &[usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> TreeNode {
        let counts = class_counts(y, indices);
        let parent_gini = gini_impurity(&counts, indices.len());

        let depth_exhausted = self.max_depth.is_some_and(|limit| depth >= limit);
        if counts.len() <= 1 || indices.len() < self.min_samples_split || depth_exhausted {
            return leaf(&counts, indices.len());
        }

        let best = self.best_split(x, y, indices, parent_gini, rng);
        match best {
            Some((feature, threshold, left_idx, right_idx)) => {
                let left = self.build_node(x, y, &left_idx, depth + 1, rng);
                let right = self.build_node(x, y, &right_idx, depth + 1, rng);
                TreeNode::Split {
                    feature,
                    threshold,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            None => leaf(&counts, indices.len()),
        }
    }

    /// Search a random feature subset for the split with the lowest
    /// weighted Gini impurity. Returns `None` when no split improves on
    /// the parent node.
    #[allow(clippy::type_complexity)]
    fn best_split(
        &self,
        x: &FeatureMatrix,
        y: &[u8],
        indices: &[usize],
        parent_gini: f64,
        rng: &mut StdRng,
    ) -> Option<(u32, f32, Vec<usize>, Vec<usize>)> {
        let n_features = x.n_features();
        if n_features == 0 {
            return None;
        }

        let subset_size = ((n_features as f64).sqrt().ceil() as usize).clamp(1, n_features);
        let candidates = rand::seq::index::sample(rng, n_features, subset_size);

        let mut best: Option<(f64, u32, f32)> = None;
        for feature in candidates {
            let feature = feature as u32;
            let mut values: Vec<f32> = indices.iter().map(|&i| x.row(i).value(feature)).collect();
            values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();
            if values.len() < 2 {
                continue;
            }

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let (left_counts, left_n, right_counts, right_n) =
                    partition_counts(x, y, indices, feature, threshold);
                if left_n == 0 || right_n == 0 {
                    continue;
                }

                let total = indices.len() as f64;
                let weighted = (left_n as f64 / total) * gini_impurity(&left_counts, left_n)
                    + (right_n as f64 / total) * gini_impurity(&right_counts, right_n);

                if weighted + 1e-12 < best.map_or(parent_gini, |(g, _, _)| g) {
                    best = Some((weighted, feature, threshold));
                }
            }
        }

        best.map(|(_, feature, threshold)| {
            let mut left_idx = Vec::new();
            let mut right_idx = Vec::new();
            for &i in indices {
                if x.row(i).value(feature) <= threshold {
                    left_idx.push(i);
                } else {
                    right_idx.push(i);
                }
            }
            (feature, threshold, left_idx, right_idx)
        })
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn class_counts(y: &[u8], indices: &[usize]) -> AHashMap<u8, usize> {
    let mut counts = AHashMap::new();
    for &i in indices {
        *counts.entry(y[i]).or_insert(0) += 1;
    }
    counts
}

/// Gini impurity of a class distribution: `1 - sum(p_i^2)`.
fn gini_impurity(counts: &AHashMap<u8, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts
        .values()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

fn partition_counts(
    x: &FeatureMatrix,
    y: &[u8],
    indices: &[usize],
    feature: u32,
    threshold: f32,
) -> (AHashMap<u8, usize>, usize, AHashMap<u8, usize>, usize) {
    let mut left = AHashMap::new();
    let mut right = AHashMap::new();
    let mut left_n = 0;
    let mut right_n = 0;
    for &i in indices {
        if x.row(i).value(feature) <= threshold {
            *left.entry(y[i]).or_insert(0) += 1;
            left_n += 1;
        } else {
            *right.entry(y[i]).or_insert(0) += 1;
            right_n += 1;
        }
    }
    (left, left_n, right, right_n)
}

/// Majority-class leaf; ties break toward the smaller class label.
fn leaf(counts: &AHashMap<u8, usize>, n_samples: usize) -> TreeNode {
    let prediction = counts
        .iter()
        .max_by_key(|(class, count)| (**count, std::cmp::Reverse(**class)))
        .map(|(class, _)| *class)
        .unwrap_or(0);
    TreeNode::Leaf {
        prediction,
        n_samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SparseVector;
    use rand::SeedableRng;

    fn matrix(rows: Vec<Vec<(u32, f32)>>, n_features: usize) -> FeatureMatrix {
        FeatureMatrix::new(
            rows.into_iter().map(SparseVector::from_entries).collect(),
            n_features,
        )
    }

    #[test]
    fn test_tree_learns_separable_data() {
        // feature 0 perfectly separates the classes
        let x = matrix(
            vec![
                vec![(0, 1.0)],
                vec![(0, 2.0)],
                vec![],
                vec![(1, 5.0)],
            ],
            2,
        );
        let y = vec![1, 1, 0, 0];

        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&x, &y, &mut rng).unwrap();

        assert_eq!(tree.predict_row(&SparseVector::from_entries(vec![(0, 1.5)])), 1);
        assert_eq!(tree.predict_row(&SparseVector::zero()), 0);
    }

    #[test]
    fn test_tree_single_class_is_leaf() {
        let x = matrix(vec![vec![(0, 1.0)], vec![(0, 2.0)]], 1);
        let y = vec![1, 1];

        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&x, &y, &mut rng).unwrap();

        assert_eq!(tree.predict_row(&SparseVector::zero()), 1);
    }

    #[test]
    fn test_tree_min_samples_split() {
        let x = matrix(vec![vec![(0, 1.0)], vec![(0, 2.0)], vec![(0, 3.0)]], 1);
        let y = vec![0, 1, 1];

        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = DecisionTreeClassifier::new().with_min_samples_split(4);
        tree.fit(&x, &y, &mut rng).unwrap();

        // node too small to split: whole tree is one majority leaf
        assert_eq!(tree.predict_row(&SparseVector::from_entries(vec![(0, 1.0)])), 1);
    }

    #[test]
    fn test_tree_deterministic_for_fixed_seed() {
        let x = matrix(
            vec![
                vec![(0, 1.0), (1, 2.0)],
                vec![(0, 3.0)],
                vec![(1, 1.0)],
                vec![],
                vec![(0, 2.0), (1, 4.0)],
            ],
            2,
        );
        let y = vec![1, 1, 0, 0, 1];

        let mut tree_a = DecisionTreeClassifier::new();
        tree_a.fit(&x, &y, &mut StdRng::seed_from_u64(42)).unwrap();

        let mut tree_b = DecisionTreeClassifier::new();
        tree_b.fit(&x, &y, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(tree_a, tree_b);
    }

    #[test]
    fn test_tree_fit_empty_fails() {
        let x = FeatureMatrix::new(Vec::new(), 3);
        let mut rng = StdRng::seed_from_u64(7);
        let err = DecisionTreeClassifier::new()
            .fit(&x, &[], &mut rng)
            .unwrap_err();
        assert!(matches!(err, MaydayError::InsufficientData(_)));
    }

    #[test]
    fn test_unfitted_tree_predicts_zero() {
        let tree = DecisionTreeClassifier::new();
        assert_eq!(tree.predict_row(&SparseVector::zero()), 0);
    }
}
