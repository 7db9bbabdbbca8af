//! Horror catalog clustering.
//!
//! Unsupervised: standardizes every horror feature row (no train/test
//! split), partitions the subset with k-means, and computes a separate
//! 2-component projection purely for visualisation coordinates. The
//! projection never feeds back into the clustering itself.

use crate::outcome::{ModelMetrics, TrainingOutcome};
use crate::trainer::Trainer;
use anyhow::{Result, anyhow};
use catalog::CatalogIndex;
use chrono::{DateTime, Utc};
use linfa::prelude::*;
use linfa_clustering::KMeans;
use linfa_reduction::Pca;
use ndarray::{Array1, Array2};
use pipeline::{HorrorFeatureExtractor, StandardScaler, horror_subset};
use rand_xoshiro::Xoshiro256Plus;
use rand_xoshiro::rand_core::SeedableRng;
use std::sync::Arc;
use store::{ClusterAssignmentRow, ClusterProfileRow, ResultStore, RunBatch, RunRows};
use tracing::info;

const MIN_RECORDS: usize = 20;
const SEED: u64 = 42;
const MAX_ITERATIONS: u64 = 300;
const N_RUNS: usize = 10;

/// Cluster count: one cluster per ten movies, capped at 4 for
/// interpretability and floored at 2 so small subsets still partition.
fn choose_k(n: usize) -> usize {
    (n / 10).min(4).max(2)
}

pub struct HorrorClusteringTrainer {
    catalog: Arc<CatalogIndex>,
    store: Arc<dyn ResultStore>,
}

impl HorrorClusteringTrainer {
    pub fn new(catalog: Arc<CatalogIndex>, store: Arc<dyn ResultStore>) -> Self {
        Self { catalog, store }
    }
}

impl Trainer for HorrorClusteringTrainer {
    fn name(&self) -> &str {
        "horror_clustering"
    }

    fn run(&self, run_ts: DateTime<Utc>) -> Result<TrainingOutcome> {
        let movies = self.catalog.movies_with_metrics();
        let subset = horror_subset(&movies);
        if subset.len() < MIN_RECORDS {
            return Ok(TrainingOutcome::skipped("insufficient horror data"));
        }

        let table = HorrorFeatureExtractor::new().extract(&subset);
        let n = table.len();
        let k = choose_k(n);

        // Unsupervised: the scaler sees the full set
        let scaler = StandardScaler::fit(&table.features);
        let scaled = scaler.transform(&table.features);

        let dataset = DatasetBase::from(scaled.clone());
        let model = KMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(SEED))
            .max_n_iterations(MAX_ITERATIONS)
            .n_runs(N_RUNS)
            .fit(&dataset)
            .map_err(|e| anyhow!("k-means failed: {e}"))?;
        let assignments: Array1<usize> = model.predict(&scaled);

        // Visualisation-only projection of the same scaled features
        let pca = Pca::params(2)
            .fit(&dataset)
            .map_err(|e| anyhow!("projection failed: {e}"))?;
        let coords: Array2<f64> = pca.predict(&scaled);

        let assignment_rows: Vec<ClusterAssignmentRow> = (0..n)
            .map(|i| ClusterAssignmentRow {
                movie_id: table.ids[i],
                cluster: assignments[i],
                x: coords[[i, 0]],
                y: coords[[i, 1]],
            })
            .collect();

        // Profiles summarise raw (unscaled) values per cluster
        let runtime_col = table
            .feature_names
            .iter()
            .position(|f| *f == "runtime")
            .unwrap_or(0);
        let vote_count_col = table
            .feature_names
            .iter()
            .position(|f| *f == "vote_count")
            .unwrap_or(1);
        let profile_rows: Vec<ClusterProfileRow> = (0..k)
            .map(|cluster| {
                let members: Vec<usize> = (0..n).filter(|&i| assignments[i] == cluster).collect();
                let count = members.len();
                let mean_of = |values: &dyn Fn(usize) -> f64| {
                    if count == 0 {
                        0.0
                    } else {
                        members.iter().map(|&i| values(i)).sum::<f64>() / count as f64
                    }
                };
                ClusterProfileRow {
                    cluster,
                    mean_popularity: mean_of(&|i| table.popularity[i]),
                    mean_vote_average: mean_of(&|i| table.vote_average[i]),
                    mean_runtime: mean_of(&|i| table.features[[i, runtime_col]]),
                    mean_vote_count: mean_of(&|i| table.features[[i, vote_count_col]]),
                    members: count,
                }
            })
            .collect();

        self.store.replace_run(RunBatch {
            run_ts,
            rows: RunRows::HorrorClustering {
                assignments: assignment_rows,
                profiles: profile_rows,
            },
        })?;

        info!(samples = n, clusters = k, "horror clustering persisted");
        Ok(TrainingOutcome::Trained {
            samples: n,
            metrics: ModelMetrics::HorrorClustering { clusters: k },
        })
    }
}
