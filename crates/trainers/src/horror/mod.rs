//! The horror model suite: regression, classification and clustering over
//! the genre-filtered subset, plus the orchestrator that runs them together.

pub mod classification;
pub mod clustering;
pub mod regression;

pub use classification::HorrorClassificationTrainer;
pub use clustering::HorrorClusteringTrainer;
pub use regression::HorrorRegressionTrainer;

use crate::outcome::TrainingOutcome;
use crate::trainer::Trainer;
use catalog::CatalogIndex;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use store::ResultStore;
use tracing::{error, info};

/// Result of one suite member: its outcome, or the error message that
/// stopped it.
#[derive(Debug, Clone)]
pub enum SuiteOutcome {
    Completed(TrainingOutcome),
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct SuiteEntry {
    pub model: String,
    pub outcome: SuiteOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub entries: Vec<SuiteEntry>,
}

impl SuiteReport {
    pub fn outcome_for(&self, model: &str) -> Option<&SuiteOutcome> {
        self.entries
            .iter()
            .find(|e| e.model == model)
            .map(|e| &e.outcome)
    }
}

/// Runs the three horror trainers in sequence, fault-isolated.
///
/// A failure in one trainer is caught and reported as an error string keyed
/// to that trainer's name; the remaining trainers always run. This
/// partial-failure tolerance is a deliberate contract: one misbehaving model
/// must not starve the others of their scheduled retrain.
pub struct HorrorSuite {
    trainers: Vec<Box<dyn Trainer>>,
}

impl HorrorSuite {
    pub fn new(catalog: Arc<CatalogIndex>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            trainers: vec![
                Box::new(HorrorRegressionTrainer::new(catalog.clone(), store.clone())),
                Box::new(HorrorClassificationTrainer::new(
                    catalog.clone(),
                    store.clone(),
                )),
                Box::new(HorrorClusteringTrainer::new(catalog, store)),
            ],
        }
    }

    /// Build a suite over an arbitrary trainer list (used by tests).
    pub fn with_trainers(trainers: Vec<Box<dyn Trainer>>) -> Self {
        Self { trainers }
    }

    /// Run every member, collecting per-trainer outcomes.
    pub fn run(&self, run_ts: DateTime<Utc>) -> SuiteReport {
        let mut report = SuiteReport::default();
        for trainer in &self.trainers {
            let outcome = match trainer.run(run_ts) {
                Ok(outcome) => {
                    info!(model = trainer.name(), trained = outcome.trained(), "suite member finished");
                    SuiteOutcome::Completed(outcome)
                }
                Err(err) => {
                    error!(model = trainer.name(), error = %err, "suite member failed");
                    SuiteOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
            report.entries.push(SuiteEntry {
                model: trainer.name().to_string(),
                outcome,
            });
        }
        report
    }
}
