//! Benchmarks for feature extraction
//!
//! Run with: cargo bench --package pipeline
//!
//! Extraction runs on every training tick, so its cost over a few thousand
//! records is worth keeping an eye on.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use catalog::MovieDetails;
use pipeline::{FeatureExtractor, HorrorFeatureExtractor, horror_subset};

fn synthetic_catalog(n: usize) -> Vec<MovieDetails> {
    (0..n)
        .map(|i| MovieDetails {
            id: i as i64,
            title: format!("Movie {i}"),
            original_title: None,
            overview: None,
            language: Some(if i % 3 == 0 { "en" } else { "fr" }.to_string()),
            release_date: Some(format!("{}-{:02}-15", 1980 + (i % 45), 1 + (i % 12))),
            popularity: Some(i as f64 * 0.7),
            vote_count: Some((i * 13) as i64),
            vote_average: Some(4.0 + (i % 50) as f64 / 10.0),
            runtime: if i % 7 == 0 { None } else { Some(85 + (i % 60) as i64) },
            genres: Some(
                if i % 4 == 0 {
                    "Horror,Thriller"
                } else {
                    "Action,Drama,Science Fiction"
                }
                .to_string(),
            ),
            poster_path: None,
            backdrop_path: None,
        })
        .collect()
}

fn bench_general_extraction(c: &mut Criterion) {
    let movies = synthetic_catalog(2000);
    let refs: Vec<&MovieDetails> = movies.iter().collect();
    let extractor = FeatureExtractor::new();

    c.bench_function("general_feature_extraction_2k", |b| {
        b.iter(|| {
            let table = extractor.extract(black_box(&refs));
            black_box(table)
        })
    });
}

fn bench_horror_extraction(c: &mut Criterion) {
    let movies = synthetic_catalog(2000);
    let refs: Vec<&MovieDetails> = movies.iter().collect();
    let subset = horror_subset(&refs);
    let extractor = HorrorFeatureExtractor::new();

    c.bench_function("horror_feature_extraction", |b| {
        b.iter(|| {
            let table = extractor.extract(black_box(&subset));
            black_box(table)
        })
    });
}

criterion_group!(benches, bench_general_extraction, bench_horror_extraction);
criterion_main!(benches);
