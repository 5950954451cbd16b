//! Temporal Disaggregator.
//!
//! For every selected year, each district's population is its state's
//! official total for that year (scaled from thousands) times the
//! district's weight. A district whose state has no projection row, or
//! whose state cell for a year is blank or malformed, gets `None` for
//! that year; the pass always continues.
//!
//! Inputs are only read, and each `(district, year)` cell is written
//! exactly once, so repeated runs give identical output.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use india_pop_geography::normalize::normalize;
use india_pop_projection_models::{DistrictProjection, StateProjectionRow, StateProjectionSeries};
use india_pop_survey_models::DistrictWeight;

use crate::ingest::state_population;
use crate::progress::ProgressCallback;

/// District series plus what could not be filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Disaggregation {
    /// One projection per input weight, in input order.
    pub projections: Vec<DistrictProjection>,
    /// Years that were requested and computed.
    pub years: Vec<u16>,
    /// Distinct state names with no projection row.
    pub unmatched_states: Vec<String>,
    /// Requested years the projection table has no column for.
    pub unavailable_years: Vec<u16>,
    /// `(district, year)` cells left empty because the state cell was
    /// blank or malformed.
    pub missing_cells: usize,
}

/// Spreads state totals over districts for each of `years`.
#[must_use]
pub fn disaggregate(
    weights: &[DistrictWeight],
    series: &StateProjectionSeries,
    years: &[u16],
    progress: &Arc<dyn ProgressCallback>,
) -> Disaggregation {
    let state_rows: Vec<Option<&StateProjectionRow>> = weights
        .iter()
        .map(|w| series.find(&normalize(&w.state_name)))
        .collect();

    let unmatched_states: BTreeSet<&str> = weights
        .iter()
        .zip(&state_rows)
        .filter(|(_, row)| row.is_none())
        .map(|(w, _)| w.state_name.as_str())
        .collect();

    if !unmatched_states.is_empty() {
        log::warn!(
            "{} states have no projection row: {:?}",
            unmatched_states.len(),
            unmatched_states
        );
    }

    let unavailable_years: Vec<u16> = years
        .iter()
        .copied()
        .filter(|year| !series.years.contains(year))
        .collect();

    if !unavailable_years.is_empty() {
        log::warn!("Projection table has no column for years {unavailable_years:?}");
    }

    let mut populations: Vec<BTreeMap<u16, Option<f64>>> = vec![BTreeMap::new(); weights.len()];
    let mut missing_cells = 0usize;

    progress.set_total(years.len() as u64);

    for &year in years {
        progress.set_message(format!("Disaggregating {year}"));

        for ((weight, row), population) in weights.iter().zip(&state_rows).zip(&mut populations) {
            let value = row.and_then(|row| {
                let state_total = state_population(row, year);
                if state_total.is_none() && series.years.contains(&year) {
                    log::debug!("No usable {year} value for state '{}'", row.name);
                    missing_cells += 1;
                }
                state_total.map(|total| total * weight.weight)
            });
            population.insert(year, value);
        }

        progress.inc(1);
    }

    let projections: Vec<DistrictProjection> = weights
        .iter()
        .zip(populations)
        .map(|(w, population)| DistrictProjection {
            district_id: w.district_id,
            district_name: w.district_name.clone(),
            state_name: w.state_name.clone(),
            base_population: w.base_population,
            weight: w.weight,
            population,
        })
        .collect();

    progress.finish(format!(
        "Disaggregated {} districts over {} years",
        projections.len(),
        years.len()
    ));
    log::info!(
        "Disaggregated {} districts over {} years ({} states unmatched, {missing_cells} empty cells)",
        projections.len(),
        years.len(),
        unmatched_states.len(),
    );

    Disaggregation {
        projections,
        years: years.to_vec(),
        unmatched_states: unmatched_states.into_iter().map(str::to_string).collect(),
        unavailable_years,
        missing_cells,
    }
}

/// Sum of district populations per year, over districts with a value.
#[must_use]
pub fn national_totals(projections: &[DistrictProjection], years: &[u16]) -> BTreeMap<u16, f64> {
    years
        .iter()
        .map(|&year| {
            let mut values: Vec<f64> = projections
                .iter()
                .filter_map(|p| p.population.get(&year).copied().flatten())
                .collect();
            values.sort_by(f64::total_cmp);
            (year, values.iter().sum())
        })
        .collect()
}
