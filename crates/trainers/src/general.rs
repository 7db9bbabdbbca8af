//! General popularity/rating trainer.
//!
//! Fits two independent linear regressors over the full catalog (one for
//! popularity, one for vote average) on standardized features, and persists
//! per-movie predictions together with the run's held-out error metrics.
//!
//! ## Procedure
//! 1. Qualifying records (non-null popularity and vote_average), minimum 10
//! 2. 75/25 train/test split with a fixed seed
//! 3. Scaler fitted on the training rows only, applied to test and full set
//! 4. Fit both regressors on standardized training features
//! 5. MAE and R² for both targets on the held-out split
//! 6. Predictions over the *entire* table from the already-fitted models
//!
//! Step 6 means the stored "predicted" values include in-sample predictions
//! for the training rows. That is an acknowledged property of the persisted
//! table; the reported MAE/R² stay honest because they come from the
//! held-out split. See DESIGN.md.

use crate::outcome::{ModelMetrics, TrainingOutcome};
use crate::trainer::Trainer;
use anyhow::{Result, anyhow};
use catalog::CatalogIndex;
use chrono::{DateTime, Utc};
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, Axis};
use pipeline::{FeatureExtractor, StandardScaler, mean_absolute_error, r2_score, shuffle_split};
use std::sync::Arc;
use store::{PredictionRow, ResultStore, RunBatch, RunRows};
use tracing::info;

/// Minimum qualifying records before a model is attempted.
const MIN_RECORDS: usize = 10;
const TEST_RATIO: f64 = 0.25;
const SEED: u64 = 42;

pub struct GeneralModelTrainer {
    catalog: Arc<CatalogIndex>,
    store: Arc<dyn ResultStore>,
}

impl GeneralModelTrainer {
    pub fn new(catalog: Arc<CatalogIndex>, store: Arc<dyn ResultStore>) -> Self {
        Self { catalog, store }
    }

    fn fit_target(
        x_train: &Array2<f64>,
        y_train: Array1<f64>,
        x_test: &Array2<f64>,
        y_test: &Array1<f64>,
        target: &str,
    ) -> Result<(linfa_linear::FittedLinearRegression<f64>, f64, f64)> {
        let dataset = Dataset::new(x_train.clone(), y_train);
        let model = LinearRegression::new()
            .fit(&dataset)
            .map_err(|e| anyhow!("linear regression failed for {target}: {e}"))?;

        let predicted = model.predict(x_test);
        let mae = mean_absolute_error(y_test.view(), predicted.view());
        let r2 = r2_score(y_test.view(), predicted.view());
        Ok((model, mae, r2))
    }
}

impl Trainer for GeneralModelTrainer {
    fn name(&self) -> &str {
        "general_regression"
    }

    fn run(&self, run_ts: DateTime<Utc>) -> Result<TrainingOutcome> {
        let movies = self.catalog.movies_with_metrics();
        if movies.len() < MIN_RECORDS {
            return Ok(TrainingOutcome::skipped("insufficient data"));
        }

        let table = FeatureExtractor::new().extract(&movies);
        info!(samples = table.len(), "extracted general feature table");

        let (train_idx, test_idx) = shuffle_split(table.len(), TEST_RATIO, SEED);
        let x_train_raw = table.features.select(Axis(0), &train_idx);
        let x_test_raw = table.features.select(Axis(0), &test_idx);

        // Fit on train only; never refit on held-out rows
        let scaler = StandardScaler::fit(&x_train_raw);
        let x_train = scaler.transform(&x_train_raw);
        let x_test = scaler.transform(&x_test_raw);

        let (pop_model, mae_popularity, r2_popularity) = Self::fit_target(
            &x_train,
            table.popularity.select(Axis(0), &train_idx),
            &x_test,
            &table.popularity.select(Axis(0), &test_idx),
            "popularity",
        )?;
        let (vote_model, mae_vote_average, r2_vote_average) = Self::fit_target(
            &x_train,
            table.vote_average.select(Axis(0), &train_idx),
            &x_test,
            &table.vote_average.select(Axis(0), &test_idx),
            "vote_average",
        )?;

        // Final predictions cover the whole table, train rows included
        let x_all = scaler.transform(&table.features);
        let predicted_popularity = pop_model.predict(&x_all);
        let predicted_vote_average = vote_model.predict(&x_all);

        let rows: Vec<PredictionRow> = (0..table.len())
            .map(|i| PredictionRow {
                movie_id: table.ids[i],
                predicted_popularity: predicted_popularity[i],
                actual_popularity: table.popularity[i],
                predicted_vote_average: predicted_vote_average[i],
                actual_vote_average: table.vote_average[i],
                mae_popularity,
                mae_vote_average,
            })
            .collect();

        self.store.replace_run(RunBatch {
            run_ts,
            rows: RunRows::GeneralRegression(rows),
        })?;

        info!(
            samples = table.len(),
            mae_popularity, mae_vote_average, "general models trained and persisted"
        );
        Ok(TrainingOutcome::Trained {
            samples: table.len(),
            metrics: ModelMetrics::GeneralRegression {
                mae_popularity,
                r2_popularity,
                mae_vote_average,
                r2_vote_average,
            },
        })
    }
}
