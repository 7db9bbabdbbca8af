//! File-backed result store: one JSON document per model type.
//!
//! Each `replace_run` writes the new batch to a temporary file and renames it
//! over the old one, so readers either see the previous run or the new one,
//! never a half-written batch. This is the all-or-nothing replace the
//! delete-then-insert contract asks for.

use crate::ResultStore;
use crate::error::Result;
use crate::rows::{ModelKind, RunBatch};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, kind: ModelKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.as_str()))
    }
}

impl ResultStore for JsonStore {
    fn replace_run(&self, batch: RunBatch) -> Result<()> {
        let path = self.path_for(batch.rows.kind());
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&batch)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn latest_run(&self, kind: ModelKind) -> Result<Option<RunBatch>> {
        let path = self.path_for(kind);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::{PredictionRow, RunRows};
    use chrono::{TimeZone, Utc};

    fn batch(run_secs: i64, movies: usize) -> RunBatch {
        let rows = (0..movies)
            .map(|i| PredictionRow {
                movie_id: i as i64,
                predicted_popularity: 1.0,
                actual_popularity: 2.0,
                predicted_vote_average: 6.0,
                actual_vote_average: 6.5,
                mae_popularity: 0.5,
                mae_vote_average: 0.4,
            })
            .collect();
        RunBatch {
            run_ts: Utc.timestamp_opt(run_secs, 0).unwrap(),
            rows: RunRows::GeneralRegression(rows),
        }
    }

    #[test]
    fn test_roundtrip_and_replace() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        assert!(
            store
                .latest_run(ModelKind::GeneralRegression)
                .unwrap()
                .is_none()
        );

        store.replace_run(batch(100, 10)).unwrap();
        let first = store
            .latest_run(ModelKind::GeneralRegression)
            .unwrap()
            .unwrap();
        assert_eq!(first.rows.row_count(), 10);

        // Second run fully replaces the first, regardless of its size
        store.replace_run(batch(200, 3)).unwrap();
        let second = store
            .latest_run(ModelKind::GeneralRegression)
            .unwrap()
            .unwrap();
        assert_eq!(second.rows.row_count(), 3);
        assert_eq!(second.run_ts, Utc.timestamp_opt(200, 0).unwrap());
    }

    #[test]
    fn test_model_kinds_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store.replace_run(batch(100, 5)).unwrap();

        assert!(
            store
                .latest_run(ModelKind::HorrorClustering)
                .unwrap()
                .is_none(),
            "Other model kinds are untouched"
        );
    }
}
