//! Evaluation metrics for the trainers.
//!
//! Regression: mean absolute error and R². Classification: accuracy, binary
//! confusion matrix and the ROC curve with its trapezoidal AUC. The
//! classification structs are serializable because the horror classification
//! run persists them verbatim.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Mean absolute error between actual and predicted values.
pub fn mean_absolute_error(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Coefficient of determination. Returns 0 when the target has no variance
/// (the score is undefined there; 0 keeps the metric total).
pub fn r2_score(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}

/// Fraction of label predictions that match.
pub fn accuracy(actual: &[usize], predicted: &[usize]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| a == p)
        .count();
    correct as f64 / actual.len() as f64
}

/// Binary confusion matrix with the positive class = label 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
    pub true_positive: u64,
}

impl ConfusionMatrix {
    pub fn from_labels(actual: &[usize], predicted: &[usize]) -> Self {
        let mut cm = Self::default();
        for (a, p) in actual.iter().zip(predicted.iter()) {
            match (a, p) {
                (0, 0) => cm.true_negative += 1,
                (0, _) => cm.false_positive += 1,
                (_, 0) => cm.false_negative += 1,
                _ => cm.true_positive += 1,
            }
        }
        cm
    }

    /// Row-major [[tn, fp], [fn, tp]] layout, the shape the reporting side
    /// renders.
    pub fn as_matrix(&self) -> [[u64; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    pub fn total(&self) -> u64 {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.true_negative + self.true_positive) as f64 / total as f64
    }
}

/// One operating point of a ROC curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RocPoint {
    pub fpr: f64,
    pub tpr: f64,
    pub threshold: f64,
}

/// ROC curve over descending score thresholds plus its trapezoidal AUC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
    pub auc: f64,
}

impl RocCurve {
    /// Build the curve from classifier scores and boolean ground truth.
    ///
    /// Tied scores collapse into a single operating point. When either class
    /// is absent the curve is undefined; an empty curve with AUC 0 is
    /// returned and callers are expected to have skipped degenerate labels
    /// beforehand.
    pub fn from_scores(scores: &[f64], positives: &[bool]) -> Self {
        let pos = positives.iter().filter(|&&b| b).count();
        let neg = positives.len() - pos;
        if pos == 0 || neg == 0 {
            return Self {
                points: Vec::new(),
                auc: 0.0,
            };
        }

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

        let mut points = vec![RocPoint {
            fpr: 0.0,
            tpr: 0.0,
            threshold: scores[order[0]],
        }];
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut i = 0;
        while i < order.len() {
            let threshold = scores[order[i]];
            while i < order.len() && scores[order[i]] == threshold {
                if positives[order[i]] {
                    tp += 1;
                } else {
                    fp += 1;
                }
                i += 1;
            }
            points.push(RocPoint {
                fpr: fp as f64 / neg as f64,
                tpr: tp as f64 / pos as f64,
                threshold,
            });
        }

        let auc = points
            .windows(2)
            .map(|w| (w[1].fpr - w[0].fpr) * (w[0].tpr + w[1].tpr) / 2.0)
            .sum();

        Self { points, auc }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mean_absolute_error() {
        let actual = array![1.0, 2.0, 3.0];
        let predicted = array![1.0, 3.0, 1.0];
        // |0| + |1| + |2| = 3, mean = 1
        assert!((mean_absolute_error(actual.view(), predicted.view()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_perfect_and_mean_predictor() {
        let actual = array![1.0, 2.0, 3.0, 4.0];
        assert!((r2_score(actual.view(), actual.view()) - 1.0).abs() < 1e-12);

        // Predicting the mean everywhere gives R² = 0
        let mean = array![2.5, 2.5, 2.5, 2.5];
        assert!(r2_score(actual.view(), mean.view()).abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_target_is_zero() {
        let actual = array![5.0, 5.0, 5.0];
        let predicted = array![4.0, 5.0, 6.0];
        assert_eq!(r2_score(actual.view(), predicted.view()), 0.0);
    }

    #[test]
    fn test_confusion_matrix_counts() {
        let actual = vec![0, 0, 1, 1, 1, 0];
        let predicted = vec![0, 1, 1, 0, 1, 0];
        let cm = ConfusionMatrix::from_labels(&actual, &predicted);
        assert_eq!(cm.true_negative, 2);
        assert_eq!(cm.false_positive, 1);
        assert_eq!(cm.false_negative, 1);
        assert_eq!(cm.true_positive, 2);
        assert_eq!(cm.as_matrix(), [[2, 1], [1, 2]]);
        assert!((cm.accuracy() - 4.0 / 6.0).abs() < 1e-12);
        assert!((accuracy(&actual, &predicted) - cm.accuracy()).abs() < 1e-12);
    }

    #[test]
    fn test_roc_perfect_separation() {
        let scores = vec![0.9, 0.8, 0.4, 0.2];
        let positives = vec![true, true, false, false];
        let roc = RocCurve::from_scores(&scores, &positives);
        assert!((roc.auc - 1.0).abs() < 1e-12);
        // Curve reaches (0, 1) before any false positive
        assert!(
            roc.points
                .iter()
                .any(|p| p.fpr == 0.0 && (p.tpr - 1.0).abs() < 1e-12)
        );
    }

    #[test]
    fn test_roc_one_inversion() {
        // One negative scored above one positive: AUC = 0.75
        let scores = vec![0.9, 0.7, 0.6, 0.2];
        let positives = vec![true, false, true, false];
        let roc = RocCurve::from_scores(&scores, &positives);
        assert!((roc.auc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_roc_degenerate_labels() {
        let roc = RocCurve::from_scores(&[0.5, 0.6], &[true, true]);
        assert!(roc.points.is_empty());
        assert_eq!(roc.auc, 0.0);
    }

    #[test]
    fn test_roc_serializes() {
        let roc = RocCurve::from_scores(&[0.9, 0.1], &[true, false]);
        let json = serde_json::to_string(&roc).unwrap();
        assert!(json.contains("\"auc\":1.0"));
    }
}
