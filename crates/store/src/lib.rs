//! # Store Crate
//!
//! Persistence seam for trainer results. The trainers are the exclusive
//! writers of these tables; everything else reads them through
//! `latest_run`.
//!
//! ## Semantics
//!
//! Replace-per-run: a trainer's tables are replaced wholesale by each run.
//! Delete all rows for the model type, insert the new batch, as one logical
//! unit (`ResultStore::replace_run` must be all-or-nothing). "Latest run"
//! is the batch at the maximum run timestamp; all rows of a batch share that
//! timestamp.
//!
//! ## Implementations
//!
//! - [`MemoryStore`]: mutex-guarded map, for tests and in-process scheduling
//! - [`JsonStore`]: one JSON document per model type with atomic
//!   temp-file-then-rename replacement

pub mod error;
pub mod json;
pub mod memory;
pub mod rows;

pub use error::{Result, StoreError};
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use rows::{
    ClassificationSummaryRow, ClusterAssignmentRow, ClusterProfileRow, FeatureImportanceRow,
    HorrorPredictionRow, ModelKind, PredictionRow, RunBatch, RunRows,
};

/// The persistence contract the trainers write through.
pub trait ResultStore: Send + Sync {
    /// Atomically replace the model type's previous run with `batch`.
    fn replace_run(&self, batch: RunBatch) -> Result<()>;

    /// The most recent batch for a model type, `None` when never trained.
    fn latest_run(&self, kind: ModelKind) -> Result<Option<RunBatch>>;
}
