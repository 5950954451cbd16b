#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District boundary handling.
//!
//! Loads district polygons from a `GeoJSON` boundary file, computes each
//! polygon's area in an equal-area projection, joins boundaries to
//! statistical rows by normalized name, and writes the reconciled
//! districts back out as `GeoJSON`.

pub mod area;
pub mod boundary;
pub mod export;
pub mod join;
pub mod normalize;

use thiserror::Error;

/// Errors that can occur during geography operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The boundary file is not valid `GeoJSON`.
    #[error("GeoJSON error in {path}: {source}")]
    GeoJson {
        /// File that was being parsed.
        path: String,
        /// Underlying parse error.
        #[source]
        source: Box<geojson::Error>,
    },

    /// The boundary file is `GeoJSON` but not a `FeatureCollection`.
    #[error("{path} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection {
        /// File that was being parsed.
        path: String,
    },

    /// No feature carries any of the configured name properties.
    #[error("No feature in {path} has a name property (looked for: {fields})")]
    MissingNameField {
        /// File that was being parsed.
        path: String,
        /// Comma-separated property names that were tried.
        fields: String,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
