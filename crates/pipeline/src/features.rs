//! Feature extraction over the full catalog.
//!
//! This module turns raw, semi-structured movie records into the numeric
//! feature table consumed by the general popularity/rating models.
//!
//! Extraction is total: any record that passed the upstream non-null filter
//! on popularity/vote_average produces exactly one row. Missing runtimes and
//! vote counts become 0, unparseable dates fall back to fixed defaults, and
//! missing genre strings become all-zero flags; nothing here raises.

use catalog::{MovieDetails, MovieId};
use chrono::{Datelike, NaiveDate};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::debug;

/// Year/month substituted when a release date is missing or unparseable.
///
/// This is a policy choice to avoid discarding rows with bad dates, not a
/// "correct" imputation. The horror extractor uses a different constant
/// (see `horror::FALLBACK_YEAR`); the discrepancy is known and deliberately
/// not unified.
pub const FALLBACK_YEAR: i32 = 2020;
pub const FALLBACK_MONTH: u32 = 1;

/// Column order of the general feature matrix. Importance and debug output
/// rely on this ordering, so it is fixed here in one place.
pub const GENERAL_FEATURES: [&str; 14] = [
    "runtime",
    "vote_count",
    "release_year",
    "release_month",
    "is_summer",
    "is_holiday",
    "genre_action",
    "genre_adventure",
    "genre_comedy",
    "genre_drama",
    "genre_scifi",
    "genre_thriller",
    "genre_count",
    "is_english",
];

/// Genre vocabulary for the general extractor: indicator flags are emitted
/// for exactly these tags, matched as whole elements of the comma-split
/// genre list.
const GENRE_VOCAB: [&str; 6] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Science Fiction",
    "Thriller",
];

/// A feature matrix joined back to its training targets, keyed by movie id.
///
/// Ephemeral by design: built fresh from current records on every training
/// run and discarded afterwards. Row `i` of `features` corresponds to
/// `ids[i]`, `popularity[i]` and `vote_average[i]`.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub ids: Vec<MovieId>,
    pub feature_names: Vec<&'static str>,
    pub features: Array2<f64>,
    pub popularity: Array1<f64>,
    pub vote_average: Array1<f64>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Parse a "YYYY-MM-DD" release date into (year, month).
///
/// Returns `None` for missing or unparseable input; the caller substitutes
/// its fallback constants.
pub(crate) fn parse_release_date(raw: Option<&str>) -> Option<(i32, u32)> {
    let raw = raw?;
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some((date.year(), date.month()))
}

pub(crate) fn bool_flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Computes the general feature table from raw movie records.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one feature row per record, in input order.
    ///
    /// Rows are computed in parallel with rayon; the mapping is
    /// order-preserving so the table stays aligned with `movies`.
    pub fn extract(&self, movies: &[&MovieDetails]) -> FeatureTable {
        debug!("Extracting general features for {} records", movies.len());
        let rows: Vec<[f64; GENERAL_FEATURES.len()]> =
            movies.par_iter().map(|m| Self::feature_row(m)).collect();

        let mut features = Array2::zeros((movies.len(), GENERAL_FEATURES.len()));
        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                features[[i, j]] = *value;
            }
        }

        FeatureTable {
            ids: movies.iter().map(|m| m.id).collect(),
            feature_names: GENERAL_FEATURES.to_vec(),
            features,
            popularity: movies
                .iter()
                .map(|m| m.popularity.unwrap_or_default())
                .collect(),
            vote_average: movies
                .iter()
                .map(|m| m.vote_average.unwrap_or_default())
                .collect(),
        }
    }

    fn feature_row(movie: &MovieDetails) -> [f64; GENERAL_FEATURES.len()] {
        let runtime = movie.runtime.unwrap_or(0) as f64;
        let vote_count = movie.vote_count.unwrap_or(0) as f64;

        let (year, month) = parse_release_date(movie.release_date.as_deref())
            .unwrap_or((FALLBACK_YEAR, FALLBACK_MONTH));
        let is_summer = bool_flag((6..=8).contains(&month));
        let is_holiday = bool_flag(month == 11 || month == 12);

        let genre_list = movie.genre_list();
        let genre_flags = GENRE_VOCAB.map(|tag| bool_flag(genre_list.iter().any(|g| *g == tag)));
        let genre_count = genre_list.len() as f64;

        let is_english = bool_flag(movie.language.as_deref() == Some("en"));

        [
            runtime,
            vote_count,
            f64::from(year),
            f64::from(month),
            is_summer,
            is_holiday,
            genre_flags[0],
            genre_flags[1],
            genre_flags[2],
            genre_flags[3],
            genre_flags[4],
            genre_flags[5],
            genre_count,
            is_english,
        ]
    }
}
