//! # Trainers Crate
//!
//! The train/evaluate/persist cycle for the five model types:
//!
//! - **general**: popularity and vote-average linear regressors over the
//!   full catalog
//! - **trending**: short-window binary classifier over snapshot aggregates
//! - **horror**: regression, classification and clustering over the horror
//!   subset, orchestrated fault-isolated by [`HorrorSuite`]
//!
//! ## Architecture
//! Each trainer implements [`Trainer`]: a pure `run(run_ts) -> outcome`
//! entry point invoked by an external scheduler. No state survives between
//! invocations: features are re-extracted from current records every run,
//! and results replace the previous run's rows wholesale in the store. The
//! run timestamp is threaded through explicitly so tests can pin it.
//!
//! ## Example Usage
//! ```ignore
//! use trainers::run_all;
//!
//! let summary = run_all(catalog, store, Utc::now())?;
//! println!("{}", summary.general.outcome.to_json());
//! ```

pub mod general;
pub mod horror;
pub mod outcome;
pub mod run;
pub mod trainer;
pub mod trending;

// Re-export main types
pub use general::GeneralModelTrainer;
pub use horror::{
    HorrorClassificationTrainer, HorrorClusteringTrainer, HorrorRegressionTrainer, HorrorSuite,
    SuiteEntry, SuiteOutcome, SuiteReport,
};
pub use outcome::{ModelMetrics, TrainingOutcome, TrainingReport};
pub use run::{RunSummary, run_all};
pub use trainer::Trainer;
pub use trending::TrendingClassifierTrainer;

#[cfg(test)]
pub(crate) mod test_support {
    use catalog::{CatalogIndex, MovieDetails, MovieId};
    use chrono::{TimeZone, Utc};

    /// Deterministic synthetic record. Fields vary with the id so splits,
    /// medians and clusters all see spread-out values; every sixth movie
    /// reports a zero runtime to exercise the horror substitution.
    pub fn movie(id: MovieId, horror: bool) -> MovieDetails {
        let residue = (id % 8) as f64;
        MovieDetails {
            id,
            title: format!("Test Movie {id}"),
            original_title: None,
            overview: None,
            language: Some(if id % 3 == 0 { "en" } else { "fr" }.to_string()),
            release_date: Some(format!("{}-{:02}-10", 1975 + id % 45, 1 + id % 12)),
            popularity: Some(5.0 + id as f64 * 1.7 + residue),
            vote_count: Some(50 + id * 13),
            vote_average: Some(4.0 + residue * 0.5),
            runtime: if id % 6 == 0 { Some(0) } else { Some(85 + id % 40) },
            genres: Some(
                if horror {
                    "Horror,Thriller"
                } else {
                    "Action,Drama"
                }
                .to_string(),
            ),
            poster_path: None,
            backdrop_path: None,
        }
    }

    pub fn catalog_with(movies: Vec<MovieDetails>) -> CatalogIndex {
        let now = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let mut index = CatalogIndex::new();
        for details in movies {
            index.upsert_movie(details, now);
        }
        index
    }
}
