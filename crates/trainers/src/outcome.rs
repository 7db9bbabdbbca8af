//! Training outcome types: the structured return contract.
//!
//! Every trainer resolves to one of two shapes: a skip with a reason
//! (insufficient data, degenerate labels) or a success with its sample count
//! and model-specific metrics. This structured summary is the only contract
//! the scheduling collaborator relies on, so it serializes to the stable
//! `{"trained": …}` form.

use serde::Serialize;
use serde_json::{Value, json};

/// Metric fields reported by each model type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelMetrics {
    GeneralRegression {
        mae_popularity: f64,
        r2_popularity: f64,
        mae_vote_average: f64,
        r2_vote_average: f64,
    },
    Trending {
        auc: f64,
    },
    HorrorRegression {
        mae: f64,
        r2: f64,
    },
    HorrorClassification {
        auc: f64,
        accuracy: f64,
    },
    HorrorClustering {
        clusters: usize,
    },
}

/// How one trainer invocation resolved.
///
/// A skip is a normal outcome, not an error: the trainer saw the data,
/// decided it cannot train, wrote nothing, and said why. Failures of the
/// underlying libraries travel separately as `Err` from [`Trainer::run`].
///
/// [`Trainer::run`]: crate::Trainer::run
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingOutcome {
    Skipped { reason: String },
    Trained { samples: usize, metrics: ModelMetrics },
}

impl TrainingOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn trained(&self) -> bool {
        matches!(self, Self::Trained { .. })
    }

    /// The wire form consumed by schedulers and operators:
    /// `{"trained": false, "reason": …}` or
    /// `{"trained": true, "samples": …, <metric fields>}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Skipped { reason } => json!({ "trained": false, "reason": reason }),
            Self::Trained { samples, metrics } => {
                let mut value = json!({ "trained": true, "samples": samples });
                if let (Value::Object(map), Ok(Value::Object(metric_map))) =
                    (&mut value, serde_json::to_value(metrics))
                {
                    map.extend(metric_map);
                }
                value
            }
        }
    }
}

/// A named trainer outcome, as returned by the entry points.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub model: String,
    pub outcome: TrainingOutcome,
}

impl TrainingReport {
    pub fn new(model: impl Into<String>, outcome: TrainingOutcome) -> Self {
        Self {
            model: model.into(),
            outcome,
        }
    }
}
