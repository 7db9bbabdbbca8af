//! # Catalog Crate
//!
//! This crate holds the raw movie catalog: records upserted from an external
//! catalog API and the append-only popularity snapshot history.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieDetails, MovieRecord, Snapshot,
//!   CatalogIndex)
//! - **loader**: Read JSON-lines exports into a CatalogIndex
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::load_catalog;
//! use chrono::Utc;
//! use std::path::Path;
//!
//! let index = load_catalog(Path::new("data/catalog"), Utc::now())?;
//! let trainable = index.movies_with_metrics();
//! println!("{} movies ready for training", trainable.len());
//! ```

// Public modules
pub mod error;
pub mod loader;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use loader::{load_catalog, read_movies, read_snapshots};
pub use types::{CatalogIndex, MovieDetails, MovieId, MovieRecord, Snapshot};
