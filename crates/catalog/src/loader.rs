//! JSON-lines loading for the catalog.
//!
//! The ingestion collaborator hands over newline-delimited JSON documents:
//! `movies.jsonl` with one raw movie record per line and an optional
//! `snapshots.jsonl` with one observation per line. Parse failures carry the
//! file name and line number so a bad export is easy to locate.

use crate::error::{CatalogError, Result};
use crate::types::{CatalogIndex, MovieDetails, Snapshot};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

fn parse_lines<T, R>(reader: R, file: &str) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
    R: BufRead,
{
    let mut items = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue; // Skip empty lines
        }
        let item = serde_json::from_str(trimmed).map_err(|e| CatalogError::ParseError {
            file: file.to_string(),
            line: idx + 1,
            reason: e.to_string(),
        })?;
        items.push(item);
    }
    Ok(items)
}

/// Read raw movie records from a JSON-lines reader.
pub fn read_movies<R: BufRead>(reader: R) -> Result<Vec<MovieDetails>> {
    parse_lines(reader, "movies.jsonl")
}

/// Read snapshot observations from a JSON-lines reader.
pub fn read_snapshots<R: BufRead>(reader: R) -> Result<Vec<Snapshot>> {
    parse_lines(reader, "snapshots.jsonl")
}

/// Load a full catalog from a directory.
///
/// Expects `movies.jsonl`; `snapshots.jsonl` is optional (a catalog without
/// history can still train everything except the trending classifier).
/// `now` stamps the upserted records; the caller owns the clock.
pub fn load_catalog(dir: &Path, now: DateTime<Utc>) -> Result<CatalogIndex> {
    let movies_path = dir.join("movies.jsonl");
    let file = File::open(&movies_path).map_err(|_| CatalogError::FileNotFound {
        path: movies_path.display().to_string(),
    })?;
    let movies = read_movies(BufReader::new(file))?;

    let mut index = CatalogIndex::new();
    for details in movies {
        index.upsert_movie(details, now);
    }

    let snapshots_path = dir.join("snapshots.jsonl");
    if snapshots_path.exists() {
        let file = File::open(&snapshots_path)?;
        for snapshot in read_snapshots(BufReader::new(file))? {
            index.append_snapshot(snapshot);
        }
    }

    Ok(index)
}
