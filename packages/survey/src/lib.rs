#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Household-survey workbook handling.
//!
//! Reads the district indicator workbook, resolves its numeric district,
//! state, and indicator IDs into names via the label dictionary sheet,
//! and derives per-district population weights from a proxy indicator.
//!
//! Every analysis that needs district names or weights goes through
//! [`labels::resolve_labels`] and [`weights::build_weights`]; nothing
//! downstream re-parses the workbook.

pub mod indicators;
pub mod labels;
pub mod sheet;
pub mod weights;
pub mod workbook;

use thiserror::Error;

/// Errors that can occur while reading the survey workbook.
///
/// Only structural problems are errors. Missing IDs, missing names, and
/// unusable numbers are dropped and counted instead.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// The workbook file could not be opened or decoded.
    #[error("Failed to open workbook {path}: {source}")]
    Workbook {
        /// Path of the workbook.
        path: String,
        /// Underlying reader error.
        #[source]
        source: calamine::Error,
    },

    /// A required sheet is not present in the workbook.
    #[error("Workbook {path} has no sheet named '{sheet}' (available: {available})")]
    MissingSheet {
        /// Path of the workbook.
        path: String,
        /// Name of the sheet that was expected.
        sheet: String,
        /// Comma-separated names of the sheets that do exist.
        available: String,
    },

    /// A required column header is not present in a sheet.
    #[error("Sheet '{sheet}' has no column '{column}'")]
    MissingColumn {
        /// Sheet that was searched.
        sheet: String,
        /// Header that was expected.
        column: String,
    },
}
