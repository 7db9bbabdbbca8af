//! Persisted result-row types.
//!
//! Every trainer run produces one batch of rows stamped with a single run
//! timestamp. Run-level metrics (MAE, R²) are duplicated onto every row of
//! their batch (they describe the run, not the individual row) so the
//! reporting side can read them without a join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The model types that persist results. The trending classifier is absent
/// on purpose: no result table exists for it, its metrics only travel back
/// through the training report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    GeneralRegression,
    HorrorRegression,
    HorrorClassification,
    HorrorClustering,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::GeneralRegression,
        ModelKind::HorrorRegression,
        ModelKind::HorrorClassification,
        ModelKind::HorrorClustering,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::GeneralRegression => "general_regression",
            ModelKind::HorrorRegression => "horror_regression",
            ModelKind::HorrorClassification => "horror_classification",
            ModelKind::HorrorClustering => "horror_clustering",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-movie prediction from the general popularity/rating models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRow {
    pub movie_id: i64,
    pub predicted_popularity: f64,
    pub actual_popularity: f64,
    pub predicted_vote_average: f64,
    pub actual_vote_average: f64,
    /// Run-level held-out MAE, duplicated per row
    pub mae_popularity: f64,
    pub mae_vote_average: f64,
}

/// Per-movie prediction from the horror popularity regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorrorPredictionRow {
    pub movie_id: i64,
    pub predicted_popularity: f64,
    pub actual_popularity: f64,
    /// Run-level held-out metrics, duplicated per row
    pub mae: f64,
    pub r2: f64,
}

/// Per-feature importance from the horror popularity regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportanceRow {
    pub feature: String,
    pub importance: f64,
    pub mae: f64,
    pub r2: f64,
}

/// The single summary row produced by a horror classification run.
///
/// Confusion matrix and ROC curve are stored serialized (JSON strings), the
/// shape the reporting dashboard consumes directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSummaryRow {
    pub confusion_matrix: String,
    pub roc_curve: String,
    pub auc: f64,
    pub accuracy: f64,
}

/// Cluster membership plus 2-D projection coordinates for one movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAssignmentRow {
    pub movie_id: i64,
    pub cluster: usize,
    pub x: f64,
    pub y: f64,
}

/// Aggregate profile of one cluster, computed over raw (unscaled) values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterProfileRow {
    pub cluster: usize,
    pub mean_popularity: f64,
    pub mean_vote_average: f64,
    pub mean_runtime: f64,
    pub mean_vote_count: f64,
    pub members: usize,
}

/// The rows of one run, grouped the way they are replaced: a model type's
/// tables always change together, under one timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunRows {
    GeneralRegression(Vec<PredictionRow>),
    HorrorRegression {
        predictions: Vec<HorrorPredictionRow>,
        importances: Vec<FeatureImportanceRow>,
    },
    HorrorClassification(ClassificationSummaryRow),
    HorrorClustering {
        assignments: Vec<ClusterAssignmentRow>,
        profiles: Vec<ClusterProfileRow>,
    },
}

impl RunRows {
    pub fn kind(&self) -> ModelKind {
        match self {
            RunRows::GeneralRegression(_) => ModelKind::GeneralRegression,
            RunRows::HorrorRegression { .. } => ModelKind::HorrorRegression,
            RunRows::HorrorClassification(_) => ModelKind::HorrorClassification,
            RunRows::HorrorClustering { .. } => ModelKind::HorrorClustering,
        }
    }

    /// Total persisted rows across this batch's tables.
    pub fn row_count(&self) -> usize {
        match self {
            RunRows::GeneralRegression(rows) => rows.len(),
            RunRows::HorrorRegression {
                predictions,
                importances,
            } => predictions.len() + importances.len(),
            RunRows::HorrorClassification(_) => 1,
            RunRows::HorrorClustering {
                assignments,
                profiles,
            } => assignments.len() + profiles.len(),
        }
    }
}

/// One run's worth of rows plus the shared run timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunBatch {
    pub run_ts: DateTime<Utc>,
    pub rows: RunRows,
}
