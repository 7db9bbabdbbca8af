//! Feature extraction for the horror subset.
//!
//! Same overall shape as the general extractor, with genre-tuned
//! differences: a zero or missing runtime is treated as "unknown" and
//! substituted with a typical 90 minutes (0 would bias a regressor toward
//! "very short"), the date-derived columns gain `release_decade` and the
//! seasonal `is_october` flag, and the genre vocabulary drops Horror itself
//! (it is the subset filter, not a feature) in favour of its common
//! companions.

use crate::features::{FeatureTable, bool_flag, parse_release_date};
use catalog::MovieDetails;
use ndarray::Array2;
use rayon::prelude::*;
use tracing::debug;

/// Year (and decade) substituted on missing or unparseable release dates.
///
/// Note this differs from the general extractor's 2020 fallback. The two
/// constants are deliberately left distinct; see DESIGN.md.
pub const FALLBACK_YEAR: i32 = 2000;
pub const FALLBACK_MONTH: u32 = 1;

/// Runtime substituted when the reported value is missing or zero.
const TYPICAL_RUNTIME: f64 = 90.0;

/// Column order of the horror feature matrix.
pub const HORROR_FEATURES: [&str; 14] = [
    "runtime",
    "vote_count",
    "release_year",
    "release_decade",
    "release_month",
    "is_summer",
    "is_holiday",
    "is_october",
    "genre_thriller",
    "genre_mystery",
    "genre_scifi",
    "genre_fantasy",
    "genre_count",
    "is_english",
];

const GENRE_VOCAB: [&str; 4] = ["Thriller", "Mystery", "Science Fiction", "Fantasy"];

/// Select the horror subset from a collection of records.
///
/// A record qualifies when its raw comma-joined genre string contains
/// "Horror" (case-sensitive substring) and both popularity and vote_average
/// are present.
pub fn horror_subset<'a>(movies: &[&'a MovieDetails]) -> Vec<&'a MovieDetails> {
    movies
        .iter()
        .copied()
        .filter(|m| {
            m.has_genre_tag("Horror") && m.popularity.is_some() && m.vote_average.is_some()
        })
        .collect()
}

/// Computes the horror-variant feature table.
#[derive(Debug, Clone, Default)]
pub struct HorrorFeatureExtractor;

impl HorrorFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one feature row per record, in input order. Total over any
    /// record with non-null popularity/vote_average, like the general
    /// extractor.
    pub fn extract(&self, movies: &[&MovieDetails]) -> FeatureTable {
        debug!("Extracting horror features for {} records", movies.len());
        let rows: Vec<[f64; HORROR_FEATURES.len()]> =
            movies.par_iter().map(|m| Self::feature_row(m)).collect();

        let mut features = Array2::zeros((movies.len(), HORROR_FEATURES.len()));
        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                features[[i, j]] = *value;
            }
        }

        FeatureTable {
            ids: movies.iter().map(|m| m.id).collect(),
            feature_names: HORROR_FEATURES.to_vec(),
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

    fn feature_row(movie: &MovieDetails) -> [f64; HORROR_FEATURES.len()] {
        // 0 means "runtime unknown" for this subset, not a zero-minute film
        let runtime = match movie.runtime {
            Some(minutes) if minutes != 0 => minutes as f64,
            _ => TYPICAL_RUNTIME,
        };
        let vote_count = movie.vote_count.unwrap_or(0) as f64;

        let (year, month) = parse_release_date(movie.release_date.as_deref())
            .unwrap_or((FALLBACK_YEAR, FALLBACK_MONTH));
        let decade = year - year.rem_euclid(10);
        let is_summer = bool_flag((6..=8).contains(&month));
        let is_holiday = bool_flag(month == 11 || month == 12);
        let is_october = bool_flag(month == 10);

        let genre_list = movie.genre_list();
        let genre_flags = GENRE_VOCAB.map(|tag| bool_flag(genre_list.iter().any(|g| *g == tag)));
        let genre_count = genre_list.len() as f64;

        let is_english = bool_flag(movie.language.as_deref() == Some("en"));

        [
            runtime,
            vote_count,
            f64::from(year),
            f64::from(decade),
            f64::from(month),
            is_summer,
            is_holiday,
            is_october,
            genre_flags[0],
            genre_flags[1],
            genre_flags[2],
            genre_flags[3],
            genre_count,
            is_english,
        ]
    }
}
