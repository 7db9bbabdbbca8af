//! Integration test for the full training cycle.
//!
//! Builds a realistic synthetic catalog (general records, a horror subset,
//! a window of popularity snapshots), runs every trainer through `run_all`,
//! and verifies the persisted tables and the replace-per-run semantics.

use catalog::{CatalogIndex, MovieDetails, MovieId, Snapshot};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use store::{MemoryStore, ModelKind, ResultStore, RunRows};
use trainers::{SuiteOutcome, run_all};

fn run_ts() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn movie(id: MovieId, horror: bool) -> MovieDetails {
    let residue = (id % 8) as f64;
    MovieDetails {
        id,
        title: format!("Catalog Movie {id}"),
        original_title: None,
        overview: None,
        language: Some(if id % 3 == 0 { "en" } else { "es" }.to_string()),
        release_date: Some(format!("{}-{:02}-15", 1970 + id % 50, 1 + id % 12)),
        popularity: Some(3.0 + id as f64 * 1.3 + residue),
        vote_count: Some(40 + id * 11),
        vote_average: Some(3.5 + residue * 0.6),
        runtime: if id % 5 == 0 { None } else { Some(80 + id % 50) },
        genres: Some(
            if horror {
                "Horror,Mystery"
            } else {
                "Comedy,Drama"
            }
            .to_string(),
        ),
        poster_path: None,
        backdrop_path: None,
    }
}

/// 60 trainable movies (30 of them horror) plus a 40-movie snapshot window.
fn build_catalog() -> CatalogIndex {
    let loaded_at = run_ts() - Duration::days(2);
    let mut index = CatalogIndex::new();
    for id in 0..60 {
        index.upsert_movie(movie(id, id < 30), loaded_at);
    }
    for id in 0..40 {
        for (hours_ago, scale) in [(40, 0.6), (3, 1.0)] {
            index.append_snapshot(Snapshot {
                movie_id: id,
                snapshot_ts: run_ts() - Duration::hours(hours_ago),
                popularity: Some(id as f64 * scale),
                vote_count: Some(200 + id * 7),
                vote_average: Some(5.0 + (id % 5) as f64 * 0.4),
            });
        }
    }
    index
}

#[test]
fn test_full_training_run_populates_every_table() {
    let catalog = Arc::new(build_catalog());
    let store = Arc::new(MemoryStore::new());

    let summary = run_all(catalog, store.clone(), run_ts()).expect("run_all succeeds");

    // Standalone trainers
    assert!(summary.general.outcome.trained(), "general model trained");
    assert_eq!(summary.general.outcome.to_json()["samples"], 60);
    assert!(summary.trending.outcome.trained(), "trending model trained");
    assert_eq!(summary.trending.outcome.to_json()["samples"], 40);

    // Horror suite: every member completed and trained
    for model in [
        "horror_regression",
        "horror_classification",
        "horror_clustering",
    ] {
        match summary.horror.outcome_for(model) {
            Some(SuiteOutcome::Completed(outcome)) => {
                assert!(outcome.trained(), "{model} should have trained");
            }
            other => panic!("{model}: unexpected suite outcome {other:?}"),
        }
    }

    // Persisted tables
    assert_eq!(store.row_count(ModelKind::GeneralRegression).unwrap(), 60);
    assert_eq!(store.row_count(ModelKind::HorrorClassification).unwrap(), 1);

    let regression = store
        .latest_run(ModelKind::HorrorRegression)
        .unwrap()
        .expect("horror regression persisted");
    match regression.rows {
        RunRows::HorrorRegression {
            predictions,
            importances,
        } => {
            assert_eq!(predictions.len(), 30);
            assert!(!importances.is_empty());
        }
        other => panic!("unexpected rows: {other:?}"),
    }

    let clustering = store
        .latest_run(ModelKind::HorrorClustering)
        .unwrap()
        .expect("horror clustering persisted");
    match clustering.rows {
        RunRows::HorrorClustering {
            assignments,
            profiles,
        } => {
            assert_eq!(assignments.len(), 30);
            // 30 horror records: k = min(4, 30 / 10) = 3
            assert_eq!(profiles.len(), 3);
        }
        other => panic!("unexpected rows: {other:?}"),
    }
}

#[test]
fn test_rerun_replaces_rather_than_appends() {
    let catalog = Arc::new(build_catalog());
    let store = Arc::new(MemoryStore::new());

    run_all(catalog.clone(), store.clone(), run_ts()).expect("first run");
    let counts_after_first: Vec<usize> = ModelKind::ALL
        .iter()
        .map(|kind| store.row_count(*kind).unwrap())
        .collect();

    let second_ts = run_ts() + Duration::hours(1);
    run_all(catalog, store.clone(), second_ts).expect("second run");

    for (kind, first_count) in ModelKind::ALL.iter().zip(&counts_after_first) {
        assert_eq!(
            store.row_count(*kind).unwrap(),
            *first_count,
            "{kind}: rerun must leave exactly one run's worth of rows"
        );
        let batch = store.latest_run(*kind).unwrap().expect("batch present");
        assert_eq!(batch.run_ts, second_ts, "{kind}: timestamp moved forward");
    }
}

#[test]
fn test_sparse_catalog_trains_nothing_but_reports_cleanly() {
    // 5 movies, no snapshots: every trainer skips, nothing is written
    let mut index = CatalogIndex::new();
    for id in 0..5 {
        index.upsert_movie(movie(id, true), run_ts());
    }
    let store = Arc::new(MemoryStore::new());

    let summary = run_all(Arc::new(index), store.clone(), run_ts()).expect("run_all succeeds");

    assert!(!summary.general.outcome.trained());
    assert!(!summary.trending.outcome.trained());
    for entry in &summary.horror.entries {
        match &entry.outcome {
            SuiteOutcome::Completed(outcome) => assert!(!outcome.trained()),
            SuiteOutcome::Failed { error } => {
                panic!("{} should skip, not fail: {error}", entry.model)
            }
        }
    }
    for kind in ModelKind::ALL {
        assert_eq!(store.row_count(kind).unwrap(), 0);
    }
}
