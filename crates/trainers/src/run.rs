//! Full training run: every model, one run timestamp.

use crate::general::GeneralModelTrainer;
use crate::horror::{HorrorSuite, SuiteReport};
use crate::outcome::TrainingReport;
use crate::trainer::Trainer;
use crate::trending::TrendingClassifierTrainer;
use anyhow::Result;
use catalog::CatalogIndex;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use store::ResultStore;
use tracing::info;

/// Everything one scheduler tick produced.
#[derive(Debug)]
pub struct RunSummary {
    pub general: TrainingReport,
    pub trending: TrainingReport,
    pub horror: SuiteReport,
}

/// Run the general trainer, the trending classifier, then the horror suite.
///
/// Error semantics differ by design: the standalone trainers propagate
/// failures to the caller (the scheduler logs and retries on its next tick),
/// while the horror suite isolates failures per member.
pub fn run_all(
    catalog: Arc<CatalogIndex>,
    store: Arc<dyn ResultStore>,
    run_ts: DateTime<Utc>,
) -> Result<RunSummary> {
    info!(%run_ts, "starting full training run");

    let general_trainer = GeneralModelTrainer::new(catalog.clone(), store.clone());
    let general = TrainingReport::new(general_trainer.name(), general_trainer.run(run_ts)?);

    let trending_trainer = TrendingClassifierTrainer::new(catalog.clone());
    let trending = TrainingReport::new(trending_trainer.name(), trending_trainer.run(run_ts)?);

    let horror = HorrorSuite::new(catalog, store).run(run_ts);

    info!(%run_ts, "full training run finished");
    Ok(RunSummary {
        general,
        trending,
        horror,
    })
}
