//! Horror high/low-rating classifier.
//!
//! The binary label is derived from the data itself: a record is "high
//! rated" when its vote_average is strictly greater than the median of the
//! current horror subset. The boundary therefore moves with every run; it
//! is a relative split, not a fixed rating threshold. The median value
//! itself always lands in the negative class.

use crate::outcome::{ModelMetrics, TrainingOutcome};
use crate::trainer::Trainer;
use anyhow::Result;
use catalog::CatalogIndex;
use chrono::{DateTime, Utc};
use ndarray::{Array1, Axis};
use pipeline::{
    ClassificationForest, ConfusionMatrix, ForestParams, HorrorFeatureExtractor, RocCurve,
    horror_subset, stratified_split,
};
use std::sync::Arc;
use store::{ClassificationSummaryRow, ResultStore, RunBatch, RunRows};
use tracing::info;

const MIN_RECORDS: usize = 20;
const TEST_RATIO: f64 = 0.25;
const SEED: u64 = 42;

/// Median of a sample; the mean of the two middle values for even sizes.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub struct HorrorClassificationTrainer {
    catalog: Arc<CatalogIndex>,
    store: Arc<dyn ResultStore>,
}

impl HorrorClassificationTrainer {
    pub fn new(catalog: Arc<CatalogIndex>, store: Arc<dyn ResultStore>) -> Self {
        Self { catalog, store }
    }
}

impl Trainer for HorrorClassificationTrainer {
    fn name(&self) -> &str {
        "horror_classification"
    }

    fn run(&self, run_ts: DateTime<Utc>) -> Result<TrainingOutcome> {
        let movies = self.catalog.movies_with_metrics();
        let subset = horror_subset(&movies);
        if subset.len() < MIN_RECORDS {
            return Ok(TrainingOutcome::skipped("insufficient horror data"));
        }

        let table = HorrorFeatureExtractor::new().extract(&subset);
        let threshold = median(&table.vote_average.to_vec());
        let labels: Vec<usize> = table
            .vote_average
            .iter()
            .map(|va| usize::from(*va > threshold))
            .collect();

        if labels.iter().all(|l| *l == 0) || labels.iter().all(|l| *l == 1) {
            // All vote averages at the median collapses the label
            return Ok(TrainingOutcome::skipped("only one rating class"));
        }

        let (train_idx, test_idx) = stratified_split(&labels, TEST_RATIO, SEED);
        let x_train = table.features.select(Axis(0), &train_idx);
        let x_test = table.features.select(Axis(0), &test_idx);
        let y_train: Array1<usize> = train_idx.iter().map(|&i| labels[i]).collect();
        let y_test: Vec<usize> = test_idx.iter().map(|&i| labels[i]).collect();

        let forest = ClassificationForest::fit(
            &x_train,
            &y_train,
            &ForestParams {
                seed: SEED,
                ..ForestParams::default()
            },
        )?;

        let predicted = forest.predict(&x_test);
        let scores = forest.positive_fraction(&x_test);

        let confusion = ConfusionMatrix::from_labels(&y_test, &predicted.to_vec());
        let truth: Vec<bool> = y_test.iter().map(|l| *l == 1).collect();
        let roc = RocCurve::from_scores(&scores.to_vec(), &truth);
        let accuracy = confusion.accuracy();

        // Exactly one summary row per run
        let row = ClassificationSummaryRow {
            confusion_matrix: serde_json::to_string(&confusion.as_matrix())?,
            roc_curve: serde_json::to_string(&roc.points)?,
            auc: roc.auc,
            accuracy,
        };
        self.store.replace_run(RunBatch {
            run_ts,
            rows: RunRows::HorrorClassification(row),
        })?;

        info!(
            samples = table.len(),
            auc = roc.auc,
            accuracy,
            "horror classifier trained"
        );
        Ok(TrainingOutcome::Trained {
            samples: table.len(),
            metrics: ModelMetrics::HorrorClassification {
                auc: roc.auc,
                accuracy,
            },
        })
    }
}
