//! Short-window trending classifier.
//!
//! Builds a labeled dataset from the trailing snapshot window: per movie,
//! the last and mean values of popularity, vote_count and vote_average
//! (6 features). The label is ranking-derived, not externally given: the
//! top-N movies by most-recent popularity are the positive class. Reports
//! held-out AUC only; this model type persists nothing.

use crate::outcome::{ModelMetrics, TrainingOutcome};
use crate::trainer::Trainer;
use anyhow::{Result, anyhow};
use catalog::{CatalogIndex, MovieId, Snapshot};
use chrono::{DateTime, Duration, Utc};
use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2, Axis};
use pipeline::{RocCurve, shuffle_split};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

const DEFAULT_WINDOW_DAYS: i64 = 3;
/// Extra day on the window start, padding for timestamp boundary slop
/// between the snapshot writer's clock and the run timestamp.
const WINDOW_BUFFER_DAYS: i64 = 1;
const DEFAULT_TOP_N: usize = 20;
const TEST_RATIO: f64 = 0.3;
const SEED: u64 = 42;
const MAX_ITERATIONS: u64 = 200;

/// Per-movie aggregate of the snapshots inside the window.
#[derive(Debug, Clone, Copy, Default)]
struct WindowAggregate {
    last_popularity: f64,
    mean_popularity: f64,
    last_vote_count: f64,
    mean_vote_count: f64,
    last_vote_average: f64,
    mean_vote_average: f64,
}

impl WindowAggregate {
    /// Aggregate snapshots already ordered by timestamp.
    fn from_snapshots(snapshots: &[&Snapshot]) -> Self {
        let n = snapshots.len() as f64;
        let mut agg = WindowAggregate::default();
        for snap in snapshots {
            agg.mean_popularity += snap.popularity.unwrap_or_default();
            agg.mean_vote_count += snap.vote_count.unwrap_or_default() as f64;
            agg.mean_vote_average += snap.vote_average.unwrap_or_default();
        }
        agg.mean_popularity /= n;
        agg.mean_vote_count /= n;
        agg.mean_vote_average /= n;
        if let Some(last) = snapshots.last() {
            agg.last_popularity = last.popularity.unwrap_or_default();
            agg.last_vote_count = last.vote_count.unwrap_or_default() as f64;
            agg.last_vote_average = last.vote_average.unwrap_or_default();
        }
        agg
    }

    fn features(&self) -> [f64; 6] {
        [
            self.last_popularity,
            self.mean_popularity,
            self.last_vote_count,
            self.mean_vote_count,
            self.last_vote_average,
            self.mean_vote_average,
        ]
    }
}

pub struct TrendingClassifierTrainer {
    catalog: Arc<CatalogIndex>,
    window_days: i64,
    top_n: usize,
}

impl TrendingClassifierTrainer {
    pub fn new(catalog: Arc<CatalogIndex>) -> Self {
        Self {
            catalog,
            window_days: DEFAULT_WINDOW_DAYS,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Configure the trailing window length in days (default: 3)
    pub fn with_window_days(mut self, days: i64) -> Self {
        self.window_days = days;
        self
    }

    /// Configure how many top movies form the positive class (default: 20)
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Aggregate the window and derive ranking labels, keyed by movie.
    fn build_dataset(&self, run_ts: DateTime<Utc>) -> Vec<(MovieId, WindowAggregate, usize)> {
        let since = run_ts - Duration::days(self.window_days + WINDOW_BUFFER_DAYS);
        let snapshots = self.catalog.snapshots_since(since);

        let mut by_movie: BTreeMap<MovieId, Vec<&Snapshot>> = BTreeMap::new();
        for snap in snapshots {
            by_movie.entry(snap.movie_id).or_default().push(snap);
        }

        let mut aggregates: Vec<(MovieId, WindowAggregate)> = by_movie
            .into_iter()
            .map(|(id, snaps)| (id, WindowAggregate::from_snapshots(&snaps)))
            .collect();

        // Rank by most-recent popularity; the top N are "trending"
        aggregates.sort_by(|a, b| {
            b.1.last_popularity
                .partial_cmp(&a.1.last_popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        aggregates
            .into_iter()
            .enumerate()
            .map(|(rank, (id, agg))| (id, agg, usize::from(rank < self.top_n)))
            .collect()
    }
}

impl Trainer for TrendingClassifierTrainer {
    fn name(&self) -> &str {
        "trending_classifier"
    }

    fn run(&self, run_ts: DateTime<Utc>) -> Result<TrainingOutcome> {
        let dataset = self.build_dataset(run_ts);
        if dataset.is_empty() {
            return Ok(TrainingOutcome::skipped("no snapshots in window"));
        }

        let n = dataset.len();
        let mut x = Array2::zeros((n, 6));
        let mut labels = Array1::<usize>::zeros(n);
        for (i, (_, agg, label)) in dataset.iter().enumerate() {
            for (j, value) in agg.features().iter().enumerate() {
                x[[i, j]] = *value;
            }
            labels[i] = *label;
        }

        let (train_idx, test_idx) = shuffle_split(n, TEST_RATIO, SEED);
        let has_both = |idx: &[usize]| {
            idx.iter().any(|&i| labels[i] == 1) && idx.iter().any(|&i| labels[i] == 0)
        };
        if !has_both(&train_idx) || !has_both(&test_idx) {
            return Ok(TrainingOutcome::skipped("only one class"));
        }

        let train = Dataset::new(
            x.select(Axis(0), &train_idx),
            labels.select(Axis(0), &train_idx),
        );
        let model = LogisticRegression::default()
            .max_iterations(MAX_ITERATIONS)
            .fit(&train)
            .map_err(|e| anyhow!("logistic regression failed: {e}"))?;

        let x_test = x.select(Axis(0), &test_idx);
        // Probability of the larger label, i.e. the positive class
        let scores = model.predict_probabilities(&x_test);
        let truth: Vec<bool> = test_idx.iter().map(|&i| labels[i] == 1).collect();
        let auc = RocCurve::from_scores(&scores.to_vec(), &truth).auc;

        info!(samples = n, auc, "trending classifier evaluated");
        Ok(TrainingOutcome::Trained {
            samples: n,
            metrics: ModelMetrics::Trending { auc },
        })
    }
}
