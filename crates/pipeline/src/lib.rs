//! Feature extraction and numeric tooling for the model trainers.
//!
//! This crate provides:
//! - Feature extraction from raw movie records (general and horror variants)
//! - Seeded train/test splitting (plain and stratified)
//! - Column standardization fitted on training rows only
//! - Regression/classification metrics, including ROC/AUC
//! - Bagged tree ensembles (regression forest, classification forest)
//!
//! ## Architecture
//! The trainers drive everything in one direction:
//! 1. Qualifying records come out of the catalog
//! 2. An extractor turns them into a `FeatureTable`
//! 3. Splits, scaling and a fitted model produce predictions
//! 4. Metrics summarise the held-out error before results are persisted
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FeatureExtractor, StandardScaler, shuffle_split};
//!
//! let table = FeatureExtractor::new().extract(&movies);
//! let (train, test) = shuffle_split(table.len(), 0.25, 42);
//! let scaler = StandardScaler::fit(&table.features.select(Axis(0), &train));
//! let scaled = scaler.transform(&table.features);
//! ```

pub mod ensemble;
pub mod features;
pub mod horror;
pub mod metrics;
pub mod scaler;
pub mod split;

// Re-export main types
pub use ensemble::{ClassificationForest, ForestParams, RegressionForest};
pub use features::{FeatureExtractor, FeatureTable, GENERAL_FEATURES};
pub use horror::{HORROR_FEATURES, HorrorFeatureExtractor, horror_subset};
pub use metrics::{ConfusionMatrix, RocCurve, RocPoint, accuracy, mean_absolute_error, r2_score};
pub use scaler::StandardScaler;
pub use split::{shuffle_split, stratified_split};
