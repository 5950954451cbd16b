//! Standalone input checks that stop short of disaggregation.

use india_pop_geography::boundary::load_boundaries;
use india_pop_geography::join::left_join;
use india_pop_geography_models::{BoundaryRecord, JoinDiagnostics};
use india_pop_survey::indicators::{HeadcountSummary, read_district_indicators, summarize_headcount};
use india_pop_survey::labels::resolve_labels;
use india_pop_survey::workbook::Workbook;
use india_pop_survey_models::LabelDictionary;

use crate::ReconcileError;
use crate::config::ReconcileConfig;

/// How well the labelled survey district names cover the boundaries.
#[must_use]
pub fn name_coverage(
    boundaries: &[BoundaryRecord],
    labels: &LabelDictionary,
    sample_size: usize,
) -> JoinDiagnostics {
    let names: Vec<&str> = labels.district_names.values().map(String::as_str).collect();
    let (_, diagnostics) = left_join(boundaries, &names, |name| *name, sample_size);
    diagnostics
}

/// Loads the boundaries and label sheet and reports [`name_coverage`].
///
/// # Errors
///
/// Returns [`ReconcileError`] if either input is unreadable or lacks a
/// required sheet or column.
pub fn run_coverage(config: &ReconcileConfig) -> Result<JoinDiagnostics, ReconcileError> {
    let boundaries = load_boundaries(&config.boundaries, &config.boundary_name_field)?;
    let mut workbook = Workbook::open(&config.workbook)?;
    let labels = resolve_labels(&workbook.sheet(&config.sheets.labels)?)?;
    Ok(name_coverage(&boundaries, &labels, config.unmatched_sample))
}

/// Loads the label and district sheets and totals one indicator's
/// headcount across districts.
///
/// # Errors
///
/// Returns [`ReconcileError`] if the workbook is unreadable or lacks a
/// required sheet or column.
pub fn run_sanity(
    config: &ReconcileConfig,
    indicator_id: i64,
) -> Result<HeadcountSummary, ReconcileError> {
    let mut workbook = Workbook::open(&config.workbook)?;
    let labels = resolve_labels(&workbook.sheet(&config.sheets.labels)?)?;
    let records = read_district_indicators(&workbook.sheet(&config.sheets.districts)?)?;

    let summary = summarize_headcount(&records, &labels, indicator_id);
    log::info!(
        "Indicator {indicator_id} ({}): {} rows, {} labelled, total headcount {:.0}",
        summary.indicator_name.as_deref().unwrap_or("unlabelled"),
        summary.rows,
        summary.labelled_rows,
        summary.total_headcount
    );
    Ok(summary)
}
