//! Core domain types for the movie catalog.
//!
//! This module defines the fundamental data structures used throughout the
//! system:
//! - `MovieDetails`: the raw, semi-structured record handed over by the
//!   ingestion collaborator
//! - `MovieRecord`: a stored record with insertion/update timestamps
//! - `Snapshot`: an immutable point-in-time observation of a movie's metrics
//! - `CatalogIndex`: the in-memory store with the query primitives the
//!   training pipeline reads through

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Unique, stable identifier for a movie across re-fetches.
pub type MovieId = i64;

/// Raw movie metadata as produced by the catalog ingestion client.
///
/// Fields mirror the upstream catalog API: most are nullable, and `genres`
/// is a comma-joined string rather than a structured list. Interpretation of
/// missing values (runtime, dates, genres) is owned by feature extraction,
/// not by this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// ISO 639-1 language code, e.g. "en"
    #[serde(default)]
    pub language: Option<String>,
    /// Release date as "YYYY-MM-DD"; kept raw because parse failures fall
    /// back to fixed defaults at feature-extraction time
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<i64>,
    /// Comma-joined genre names, e.g. "Horror,Thriller"
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl MovieDetails {
    /// Split the comma-joined genre string into its elements.
    ///
    /// Matches the upstream convention exactly: no trimming, and a missing
    /// or empty string yields an empty list (not a single empty element).
    pub fn genre_list(&self) -> Vec<&str> {
        match self.genres.as_deref() {
            Some(s) if !s.is_empty() => s.split(',').collect(),
            _ => Vec::new(),
        }
    }

    /// Case-sensitive substring check on the raw comma-joined genre string.
    pub fn has_genre_tag(&self, tag: &str) -> bool {
        self.genres.as_deref().is_some_and(|g| g.contains(tag))
    }
}

/// A stored catalog record: raw metadata plus bookkeeping timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub details: MovieDetails,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One immutable observation of a movie's mutable metrics.
///
/// Snapshots are append-only: many per movie over time, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub movie_id: MovieId,
    pub snapshot_ts: DateTime<Utc>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// In-memory catalog store.
///
/// Owns the movie records and the snapshot history and exposes the read
/// contract the training pipeline depends on: non-null metric filters,
/// since-timestamp snapshot queries, and stalest-first listing for
/// incremental refresh.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    movies: HashMap<MovieId, MovieRecord>,
    snapshots: Vec<Snapshot>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self {
            movies: HashMap::new(),
            snapshots: Vec::new(),
        }
    }

    /// Insert or update a movie by identifier.
    ///
    /// Upsert semantics: a record may be re-fetched arbitrarily many times;
    /// the identifier is stable, `inserted_at` is preserved across updates
    /// and `updated_at` is set to the caller-supplied clock value.
    pub fn upsert_movie(&mut self, details: MovieDetails, now: DateTime<Utc>) {
        match self.movies.entry(details.id) {
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                record.details = details;
                record.updated_at = now;
            }
            Entry::Vacant(entry) => {
                entry.insert(MovieRecord {
                    details,
                    inserted_at: now,
                    updated_at: now,
                });
            }
        }
    }

    /// Append one snapshot observation. Snapshots are never updated.
    pub fn append_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&MovieRecord> {
        self.movies.get(&id)
    }

    /// All records with non-null popularity and vote_average: the
    /// qualification filter every trainer starts from.
    pub fn movies_with_metrics(&self) -> Vec<&MovieDetails> {
        let mut movies: Vec<&MovieDetails> = self
            .movies
            .values()
            .map(|r| &r.details)
            .filter(|d| d.popularity.is_some() && d.vote_average.is_some())
            .collect();
        // Stable ordering so downstream seeded splits are reproducible
        movies.sort_by_key(|d| d.id);
        movies
    }

    pub fn all_movie_ids(&self) -> Vec<MovieId> {
        let mut ids: Vec<MovieId> = self.movies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Movies ordered by last-updated ascending, limited to `n`.
    ///
    /// Read contract for incremental refresh: the ingestion side re-fetches
    /// the records it has touched least recently.
    pub fn stalest_movies(&self, n: usize) -> Vec<&MovieRecord> {
        let mut records: Vec<&MovieRecord> = self.movies.values().collect();
        records.sort_by_key(|r| (r.updated_at, r.details.id));
        records.truncate(n);
        records
    }

    /// All snapshots observed at or after `ts`, oldest first.
    pub fn snapshots_since(&self, ts: DateTime<Utc>) -> Vec<&Snapshot> {
        let mut snapshots: Vec<&Snapshot> = self
            .snapshots
            .iter()
            .filter(|s| s.snapshot_ts >= ts)
            .collect();
        snapshots.sort_by_key(|s| (s.snapshot_ts, s.movie_id));
        snapshots
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize) {
        (self.movies.len(), self.snapshots.len())
    }
}
