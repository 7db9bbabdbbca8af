//! The core trainer trait.

use crate::outcome::TrainingOutcome;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One retrainable model.
///
/// ## Design Note
/// - `run` is pure with respect to ambient state: the run timestamp is an
///   explicit parameter threaded down to persistence, never read from a
///   global clock, so tests can inject a fixed instant.
/// - The boundary is uniformly fallible. Standalone callers (the scheduler)
///   let an `Err` propagate and retry on their next tick; the horror suite
///   catches it per trainer so siblings still run.
/// - `Send + Sync` allows trainers to be boxed and shared across scheduling
///   contexts.
pub trait Trainer: Send + Sync {
    /// Returns the name of this trainer (used to key reports and errors)
    fn name(&self) -> &str;

    /// Train once, persist this run's results, and summarise the outcome.
    ///
    /// # Arguments
    /// * `run_ts` - The run timestamp stamped on every persisted row
    ///
    /// # Returns
    /// * `Ok(TrainingOutcome)` - trained or deliberately skipped
    /// * `Err` - a training-library or persistence failure
    fn run(&self, run_ts: DateTime<Utc>) -> Result<TrainingOutcome>;
}
