//! Bagged tree ensembles.
//!
//! Two ensembles back the horror models:
//!
//! - [`RegressionForest`]: bootstrap-aggregated CART regression trees with
//!   variance-reduction splits, implemented here over ndarray because the
//!   linfa tree crate only covers classification. Feature importances are
//!   accumulated from the impurity decrease of every split and normalised
//!   to sum to one.
//! - [`ClassificationForest`]: bootstrap aggregation of
//!   `linfa_trees::DecisionTree` classifiers; the positive-vote fraction
//!   doubles as the score used for ROC analysis.
//!
//! Both are seeded: tree `t` draws its bootstrap sample from a generator
//! seeded with `seed + t`, so a fixed seed reproduces the ensemble exactly.

use anyhow::{Result, anyhow};
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

/// Parameters shared by both forests.
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub trees: usize,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 10,
            seed: 42,
        }
    }
}

// Regression trees stop splitting below this node size.
const MIN_SAMPLES_SPLIT: usize = 2;

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict_row(&self, row: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict_row(row)
                } else {
                    right.predict_row(row)
                }
            }
        }
    }
}

/// Sum of squared errors around the mean, from precomputed sums.
fn sse(sum: f64, sum_sq: f64, n: f64) -> f64 {
    sum_sq - sum * sum / n
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn find_best_split(x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> Option<BestSplit> {
    let n = indices.len() as f64;
    let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
    let total_sum_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
    let parent_sse = sse(total_sum, total_sum_sq, n);
    if parent_sse <= 0.0 {
        return None; // already pure
    }

    let mut best: Option<BestSplit> = None;
    for feature in 0..x.ncols() {
        let mut pairs: Vec<(f64, f64)> = indices.iter().map(|&i| (x[[i, feature]], y[i])).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut left_sum = 0.0;
        let mut left_sum_sq = 0.0;
        for k in 1..pairs.len() {
            let (value, target) = pairs[k - 1];
            left_sum += target;
            left_sum_sq += target * target;

            // Only positions between distinct values are valid thresholds
            if value == pairs[k].0 {
                continue;
            }

            let left_n = k as f64;
            let right_n = n - left_n;
            let right_sum = total_sum - left_sum;
            let right_sum_sq = total_sum_sq - left_sum_sq;
            let gain = parent_sse
                - sse(left_sum, left_sum_sq, left_n)
                - sse(right_sum, right_sum_sq, right_n);

            if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                best = Some(BestSplit {
                    feature,
                    threshold: (value + pairs[k].0) / 2.0,
                    gain,
                });
            }
        }
    }
    best
}

fn build_node(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    depth: usize,
    max_depth: usize,
    importances: &mut [f64],
) -> TreeNode {
    let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;
    if depth >= max_depth || indices.len() < MIN_SAMPLES_SPLIT {
        return TreeNode::Leaf { value: mean };
    }

    let Some(split) = find_best_split(x, y, indices) else {
        return TreeNode::Leaf { value: mean };
    };
    importances[split.feature] += split.gain;

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| x[[i, split.feature]] <= split.threshold);

    TreeNode::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(build_node(
            x,
            y,
            &left_idx,
            depth + 1,
            max_depth,
            importances,
        )),
        right: Box::new(build_node(
            x,
            y,
            &right_idx,
            depth + 1,
            max_depth,
            importances,
        )),
    }
}

/// Bagged CART regression forest.
#[derive(Debug, Clone)]
pub struct RegressionForest {
    roots: Vec<TreeNode>,
    importances: Vec<f64>,
}

impl RegressionForest {
    /// Fit the forest on a feature matrix and continuous target.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, params: &ForestParams) -> Self {
        let n = x.nrows();
        let mut importances = vec![0.0; x.ncols()];
        let mut roots = Vec::with_capacity(params.trees);

        if n > 0 {
            for t in 0..params.trees {
                let mut rng = Xoshiro256Plus::seed_from_u64(params.seed.wrapping_add(t as u64));
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                roots.push(build_node(
                    x,
                    y,
                    &bootstrap,
                    0,
                    params.max_depth,
                    &mut importances,
                ));
            }
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }

        Self { roots, importances }
    }

    /// Mean prediction across all trees.
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        if self.roots.is_empty() {
            return Array1::zeros(x.nrows());
        }
        let mut out = Array1::zeros(x.nrows());
        for (i, row) in x.axis_iter(Axis(0)).enumerate() {
            let row = row.to_vec();
            let sum: f64 = self.roots.iter().map(|t| t.predict_row(&row)).sum();
            out[i] = sum / self.roots.len() as f64;
        }
        out
    }

    /// Normalised impurity-decrease importances, one per input feature.
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

/// Bagged binary classifier over linfa decision trees.
///
/// Labels are 0/1; the positive class is 1.
pub struct ClassificationForest {
    trees: Vec<DecisionTree<f64, usize>>,
}

impl ClassificationForest {
    pub fn fit(x: &Array2<f64>, labels: &Array1<usize>, params: &ForestParams) -> Result<Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(anyhow!("cannot fit a classifier on an empty dataset"));
        }
        let mut trees = Vec::with_capacity(params.trees);
        for t in 0..params.trees {
            let mut rng = Xoshiro256Plus::seed_from_u64(params.seed.wrapping_add(t as u64));
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let records = x.select(Axis(0), &bootstrap);
            let targets = labels.select(Axis(0), &bootstrap);
            let dataset = Dataset::new(records, targets);
            let tree = DecisionTree::params()
                .max_depth(Some(params.max_depth))
                .fit(&dataset)
                .map_err(|e| anyhow!("failed to fit ensemble tree {t}: {e}"))?;
            trees.push(tree);
        }
        Ok(Self { trees })
    }

    /// Fraction of trees voting for the positive class, per row. This is the
    /// score used for ROC analysis.
    pub fn positive_fraction(&self, x: &Array2<f64>) -> Array1<f64> {
        let mut votes = Array1::<f64>::zeros(x.nrows());
        for tree in &self.trees {
            let predicted = tree.predict(x);
            for (i, label) in predicted.iter().enumerate() {
                if *label == 1 {
                    votes[i] += 1.0;
                }
            }
        }
        votes / self.trees.len() as f64
    }

    /// Majority-vote labels (ties go to the negative class, matching an
    /// argmax over class probabilities).
    pub fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        self.positive_fraction(x)
            .mapv(|fraction| usize::from(fraction > 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        // y depends on the first feature only; the second is constant noise
        let mut x = Array2::zeros((n, 2));
        let mut y = Array1::zeros(n);
        for i in 0..n {
            x[[i, 0]] = i as f64;
            x[[i, 1]] = 5.0;
            y[i] = 3.0 * i as f64;
        }
        (x, y)
    }

    fn small_params() -> ForestParams {
        ForestParams {
            trees: 25,
            max_depth: 10,
            seed: 42,
        }
    }

    #[test]
    fn test_regression_forest_fits_monotone_target() {
        let (x, y) = linear_data(60);
        let forest = RegressionForest::fit(&x, &y, &small_params());
        let predicted = forest.predict(&x);

        let mae = crate::metrics::mean_absolute_error(y.view(), predicted.view());
        assert!(mae < 10.0, "in-sample MAE too high: {mae}");
    }

    #[test]
    fn test_regression_forest_importances() {
        let (x, y) = linear_data(60);
        let forest = RegressionForest::fit(&x, &y, &small_params());
        let importances = forest.feature_importances();

        assert_eq!(importances.len(), 2);
        let total: f64 = importances.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "importances sum to 1");
        assert!(
            importances[0] > 0.99,
            "all signal lives in feature 0: {importances:?}"
        );
    }

    #[test]
    fn test_regression_forest_is_deterministic() {
        let (x, y) = linear_data(40);
        let a = RegressionForest::fit(&x, &y, &small_params()).predict(&x);
        let b = RegressionForest::fit(&x, &y, &small_params()).predict(&x);
        assert_eq!(a, b, "same seed must reproduce predictions bit-for-bit");
    }

    #[test]
    fn test_regression_forest_constant_target() {
        let (x, _) = linear_data(30);
        let y = Array1::from_elem(30, 7.5);
        let forest = RegressionForest::fit(&x, &y, &small_params());
        let predicted = forest.predict(&x);
        for p in predicted.iter() {
            assert!((p - 7.5).abs() < 1e-12);
        }
        // No split ever happens, so no importance is assigned
        assert!(forest.feature_importances().iter().all(|&i| i == 0.0));
    }

    #[test]
    fn test_classification_forest_separable() {
        let n = 40;
        let mut x = Array2::zeros((n, 2));
        let mut labels = Array1::zeros(n);
        for i in 0..n {
            x[[i, 0]] = i as f64;
            x[[i, 1]] = 1.0;
            labels[i] = usize::from(i >= n / 2);
        }

        let forest = ClassificationForest::fit(&x, &labels, &small_params()).unwrap();
        let predicted = forest.predict(&x);
        let acc = crate::metrics::accuracy(
            labels.as_slice().unwrap(),
            predicted.as_slice().unwrap(),
        );
        assert!(acc > 0.9, "separable data should classify cleanly: {acc}");

        let fractions = forest.positive_fraction(&x);
        assert!(fractions[0] < 0.5);
        assert!(fractions[n - 1] > 0.5);
    }
}
