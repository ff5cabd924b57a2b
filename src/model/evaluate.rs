//! Held-out evaluation of the per-label ensembles.
//!
//! Produces one precision/recall/F1/support report per label. The report
//! is diagnostic only: it is printed at the end of training and never
//! gates the run.

use serde::{Deserialize, Serialize};

use crate::error::{MaydayError, Result};
use crate::features::FeatureMatrix;
use crate::model::multioutput::{LabelMatrix, MultiOutputForest};

/// Per-label diagnostics for the positive class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelReport {
    /// Label name from the vocabulary.
    pub label: String,
    /// Positive-class precision: tp / (tp + fp), 0 when nothing predicted positive.
    pub precision: f64,
    /// Positive-class recall: tp / (tp + fn), 0 when no positives in truth.
    pub recall: f64,
    /// Harmonic mean of precision and recall, 0 when both are 0.
    pub f1: f64,
    /// Number of ground-truth positive rows.
    pub support: usize,
    /// Fraction of rows predicted correctly for this label.
    pub accuracy: f64,
}

/// Evaluate the model on a held-out split, one report per label.
pub fn evaluate(
    model: &MultiOutputForest,
    x_test: &FeatureMatrix,
    y_test: &LabelMatrix,
) -> Result<Vec<LabelReport>> {
    if x_test.n_rows() != y_test.n_rows() {
        return Err(MaydayError::invalid_operation(format!(
            "feature rows ({}) do not match label rows ({})",
            x_test.n_rows(),
            y_test.n_rows()
        )));
    }
    if x_test.n_rows() == 0 {
        return Err(MaydayError::insufficient_data(
            "cannot evaluate on an empty test split",
        ));
    }

    let predictions = model.predict(x_test);
    let n_rows = x_test.n_rows();

    let reports = model
        .vocabulary()
        .iter()
        .enumerate()
        .map(|(label_index, label)| {
            let truth = y_test.column(label_index);
            let predicted: Vec<u8> = predictions.iter().map(|row| row[label_index]).collect();

            let mut tp = 0usize;
            let mut fp = 0usize;
            let mut fn_ = 0usize;
            let mut correct = 0usize;
            for (&t, &p) in truth.iter().zip(predicted.iter()) {
                if t == p {
                    correct += 1;
                }
                match (t == 1, p == 1) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }

            let precision = ratio(tp, tp + fp);
            let recall = ratio(tp, tp + fn_);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            LabelReport {
                label: label.to_string(),
                precision,
                recall,
                f1,
                support: tp + fn_,
                accuracy: correct as f64 / n_rows as f64,
            }
        })
        .collect();

    Ok(reports)
}

/// Render the reports as a classification-report style table.
pub fn format_report(reports: &[LabelReport]) -> String {
    let width = reports
        .iter()
        .map(|r| r.label.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<width$}  {:>9}  {:>9}  {:>9}  {:>8}\n",
        "category", "precision", "recall", "f1-score", "support"
    ));
    for report in reports {
        out.push_str(&format!(
            "{:<width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>8}\n",
            report.label, report.precision, report.recall, report.f1, report.support
        ));
    }
    out
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::codec::CategoryCodec;
    use crate::features::SparseVector;
    use crate::model::trainer::HyperParams;

    fn fitted_model() -> (MultiOutputForest, FeatureMatrix, LabelMatrix) {
        let rows = vec![
            SparseVector::from_entries(vec![(0, 2.0)]),
            SparseVector::from_entries(vec![(0, 3.0)]),
            SparseVector::from_entries(vec![(1, 2.0)]),
            SparseVector::from_entries(vec![(1, 3.0)]),
        ];
        let x = FeatureMatrix::new(rows, 2);
        let y = LabelMatrix::new(
            vec![vec![1], vec![1], vec![0], vec![0]],
            1,
        )
        .unwrap();
        let vocab = CategoryCodec::derive_vocabulary("water-1").unwrap();
        let params = HyperParams {
            n_estimators: 10,
            min_samples_split: 2,
        };
        let model = MultiOutputForest::fit(&x, &y, &vocab, &params, 42).unwrap();
        (model, x, y)
    }

    #[test]
    fn test_evaluate_perfect_model() {
        let (model, x, y) = fitted_model();
        let reports = evaluate(&model, &x, &y).unwrap();

        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.label, "water");
        assert_eq!(report.support, 2);
        assert!((report.precision - 1.0).abs() < 1e-9);
        assert!((report.recall - 1.0).abs() < 1e-9);
        assert!((report.f1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_zero_division_is_zero() {
        let (model, x, _) = fitted_model();
        // truth says nothing is positive: recall denominator is 0
        let y = LabelMatrix::new(vec![vec![0], vec![0], vec![0], vec![0]], 1).unwrap();
        let reports = evaluate(&model, &x, &y).unwrap();

        let report = &reports[0];
        assert_eq!(report.support, 0);
        assert_eq!(report.recall, 0.0);
        assert_eq!(report.f1, 0.0);
    }

    #[test]
    fn test_evaluate_empty_split_fails() {
        let (model, _, _) = fitted_model();
        let x = FeatureMatrix::new(Vec::new(), 2);
        let y = LabelMatrix::new(Vec::new(), 1).unwrap();
        let err = evaluate(&model, &x, &y).unwrap_err();
        assert!(matches!(err, MaydayError::InsufficientData(_)));
    }

    #[test]
    fn test_format_report_layout() {
        let reports = vec![LabelReport {
            label: "water".to_string(),
            precision: 0.5,
            recall: 1.0,
            f1: 2.0 / 3.0,
            support: 3,
            accuracy: 0.75,
        }];
        let rendered = format_report(&reports);
        assert!(rendered.contains("category"));
        assert!(rendered.contains("water"));
        assert!(rendered.contains("0.67"));
    }
}
