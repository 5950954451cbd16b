#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! State-level population projections and their district disaggregation.
//!
//! Reads the official 2011-2036 state projection table, spreads each
//! state's yearly total over its districts by weight, and derives density
//! and compound annual growth rate from the resulting series.

pub mod disaggregate;
pub mod ingest;
pub mod progress;
pub mod rates;

use thiserror::Error;

/// Errors that can occur while reading the projection table.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The projection file could not be opened.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The table lacks the name, category, or year columns.
    #[error("Projection table {path} is missing {message}")]
    MissingColumns {
        /// File that was being read.
        path: String,
        /// What was expected.
        message: String,
    },
}
