//! Horror popularity regressor.
//!
//! Same procedure as the general trainer (split, scale on train only,
//! full-set predictions from the fitted model) but over the horror subset,
//! with a bagged regression forest instead of a linear model, predicting
//! popularity only. In addition to per-movie predictions it persists one
//! importance row per input feature, both tables replaced together under the
//! run timestamp.

use crate::outcome::{ModelMetrics, TrainingOutcome};
use crate::trainer::Trainer;
use anyhow::Result;
use catalog::CatalogIndex;
use chrono::{DateTime, Utc};
use ndarray::Axis;
use pipeline::{
    ForestParams, HorrorFeatureExtractor, RegressionForest, StandardScaler, horror_subset,
    mean_absolute_error, r2_score, shuffle_split,
};
use std::sync::Arc;
use store::{FeatureImportanceRow, HorrorPredictionRow, ResultStore, RunBatch, RunRows};
use tracing::info;

const MIN_RECORDS: usize = 20;
const TEST_RATIO: f64 = 0.25;
const SEED: u64 = 42;

pub struct HorrorRegressionTrainer {
    catalog: Arc<CatalogIndex>,
    store: Arc<dyn ResultStore>,
}

impl HorrorRegressionTrainer {
    pub fn new(catalog: Arc<CatalogIndex>, store: Arc<dyn ResultStore>) -> Self {
        Self { catalog, store }
    }
}

impl Trainer for HorrorRegressionTrainer {
    fn name(&self) -> &str {
        "horror_regression"
    }

    fn run(&self, run_ts: DateTime<Utc>) -> Result<TrainingOutcome> {
        let movies = self.catalog.movies_with_metrics();
        let subset = horror_subset(&movies);
        if subset.len() < MIN_RECORDS {
            return Ok(TrainingOutcome::skipped("insufficient horror data"));
        }

        let table = HorrorFeatureExtractor::new().extract(&subset);
        let (train_idx, test_idx) = shuffle_split(table.len(), TEST_RATIO, SEED);

        let x_train_raw = table.features.select(Axis(0), &train_idx);
        let scaler = StandardScaler::fit(&x_train_raw);
        let x_train = scaler.transform(&x_train_raw);
        let x_test = scaler.transform(&table.features.select(Axis(0), &test_idx));

        let y_train = table.popularity.select(Axis(0), &train_idx);
        let y_test = table.popularity.select(Axis(0), &test_idx);

        let forest = RegressionForest::fit(
            &x_train,
            &y_train,
            &ForestParams {
                seed: SEED,
                ..ForestParams::default()
            },
        );

        let predicted_test = forest.predict(&x_test);
        let mae = mean_absolute_error(y_test.view(), predicted_test.view());
        let r2 = r2_score(y_test.view(), predicted_test.view());

        let x_all = scaler.transform(&table.features);
        let predicted_all = forest.predict(&x_all);

        let predictions: Vec<HorrorPredictionRow> = (0..table.len())
            .map(|i| HorrorPredictionRow {
                movie_id: table.ids[i],
                predicted_popularity: predicted_all[i],
                actual_popularity: table.popularity[i],
                mae,
                r2,
            })
            .collect();
        let importances: Vec<FeatureImportanceRow> = table
            .feature_names
            .iter()
            .zip(forest.feature_importances())
            .map(|(feature, importance)| FeatureImportanceRow {
                feature: (*feature).to_string(),
                importance: *importance,
                mae,
                r2,
            })
            .collect();

        self.store.replace_run(RunBatch {
            run_ts,
            rows: RunRows::HorrorRegression {
                predictions,
                importances,
            },
        })?;

        info!(samples = table.len(), mae, r2, "horror regressor trained");
        Ok(TrainingOutcome::Trained {
            samples: table.len(),
            metrics: ModelMetrics::HorrorRegression { mae, r2 },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog_with, movie};
    use pipeline::HORROR_FEATURES;
    use store::{MemoryStore, ModelKind};

    #[test]
    fn test_nineteen_horror_records_skip_with_zero_writes() {
        // 19 horror + plenty of non-horror records: still below threshold
        let mut movies: Vec<_> = (0..19).map(|i| movie(i, true)).collect();
        movies.extend((100..130).map(|i| movie(i, false)));

        let store = Arc::new(MemoryStore::new());
        let trainer = HorrorRegressionTrainer::new(Arc::new(catalog_with(movies)), store.clone());

        let outcome = trainer.run(Utc::now()).unwrap();
        assert_eq!(outcome, TrainingOutcome::skipped("insufficient horror data"));
        assert_eq!(store.row_count(ModelKind::HorrorRegression).unwrap(), 0);
    }

    #[test]
    fn test_persists_predictions_and_importances() {
        let movies: Vec<_> = (0..25).map(|i| movie(i, true)).collect();
        let store = Arc::new(MemoryStore::new());
        let trainer = HorrorRegressionTrainer::new(Arc::new(catalog_with(movies)), store.clone());

        let run_ts = Utc::now();
        let outcome = trainer.run(run_ts).unwrap();
        assert!(outcome.trained());

        let batch = store
            .latest_run(ModelKind::HorrorRegression)
            .unwrap()
            .expect("batch persisted");
        assert_eq!(batch.run_ts, run_ts);
        match batch.rows {
            RunRows::HorrorRegression {
                predictions,
                importances,
            } => {
                assert_eq!(predictions.len(), 25, "one prediction row per movie");
                assert_eq!(
                    importances.len(),
                    HORROR_FEATURES.len(),
                    "one importance row per input feature"
                );
                let total: f64 = importances.iter().map(|r| r.importance).sum();
                assert!(total <= 1.0 + 1e-9);
                // Run-level metrics are duplicated onto both tables
                assert!(predictions.iter().all(|r| r.mae == predictions[0].mae));
                assert!(importances.iter().all(|r| r.mae == predictions[0].mae));
            }
            other => panic!("unexpected rows: {other:?}"),
        }
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let movies: Vec<_> = (0..22).map(|i| movie(i, true)).collect();
        let catalog = Arc::new(catalog_with(movies));
        let store = Arc::new(MemoryStore::new());
        let trainer = HorrorRegressionTrainer::new(catalog, store.clone());

        trainer.run(Utc::now()).unwrap();
        trainer.run(Utc::now()).unwrap();
        assert_eq!(
            store.row_count(ModelKind::HorrorRegression).unwrap(),
            22 + HORROR_FEATURES.len(),
            "exactly one run's rows across both tables"
        );
    }
}
