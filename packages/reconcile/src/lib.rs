#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reconciliation pipeline.
//!
//! Ties the survey, projection, and geography packages together: loads the
//! three inputs once, derives district weights, disaggregates state
//! projections per year, joins the result onto the district boundaries,
//! derives density and growth, and writes the reconciled collection.
//!
//! Also hosts the diagnostic passes that share the same inputs: name
//! coverage, headcount sanity totals, and the official-versus-survey
//! national population check.

pub mod checks;
pub mod config;
pub mod national;
pub mod pipeline;
pub mod verify;

use india_pop_geography::GeoError;
use india_pop_projection::ProjectionError;
use india_pop_survey::SurveyError;
use thiserror::Error;

pub use india_pop_projection::progress::{NullProgress, ProgressCallback, null_progress};

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Reading the survey workbook failed.
    #[error(transparent)]
    Survey(#[from] SurveyError),

    /// Reading boundaries or writing `GeoJSON` failed.
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Reading the projection table failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// The configuration file could not be read.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`config::ReconcileConfig`].
    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        /// Config file path.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration is well-formed but inconsistent.
    #[error("Invalid configuration: {message}")]
    Config {
        /// What is wrong.
        message: String,
    },

    /// Writing a CSV output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serializing diagnostics failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The national comparison could not be made from the data present.
    #[error("Cannot verify national population: {message}")]
    Unverifiable {
        /// Which value was missing.
        message: String,
    },
}
