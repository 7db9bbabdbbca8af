//! In-memory result store.
//!
//! Used by tests and by single-process scheduling. The mutex serializes
//! `replace_run` per store, which is exactly the one-run-of-a-model-at-a-time
//! write exclusion the delete-then-insert semantics require.

use crate::error::{Result, StoreError};
use crate::rows::{ModelKind, RunBatch};
use crate::ResultStore;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    runs: Mutex<HashMap<ModelKind, RunBatch>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row count currently stored for a model type (0 when never trained).
    pub fn row_count(&self, kind: ModelKind) -> Result<usize> {
        let runs = self.runs.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(runs.get(&kind).map_or(0, |batch| batch.rows.row_count()))
    }
}

impl ResultStore for MemoryStore {
    fn replace_run(&self, batch: RunBatch) -> Result<()> {
        let mut runs = self.runs.lock().map_err(|_| StoreError::LockPoisoned)?;
        runs.insert(batch.rows.kind(), batch);
        Ok(())
    }

    fn latest_run(&self, kind: ModelKind) -> Result<Option<RunBatch>> {
        let runs = self.runs.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(runs.get(&kind).cloned())
    }
}
