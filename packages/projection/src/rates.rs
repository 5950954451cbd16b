//! Density and growth rate derivation.
//!
//! Both are `None` whenever an input is missing or the arithmetic would
//! not give a finite number. Nothing is coerced to zero.

use std::collections::BTreeMap;

/// People per km².
///
/// `None` if the population is missing or the area is zero, negative, or
/// not finite.
#[must_use]
pub fn density(population: Option<f64>, area_km2: f64) -> Option<f64> {
    let population = population?;
    if !area_km2.is_finite() || area_km2 <= 0.0 {
        return None;
    }
    let value = population / area_km2;
    value.is_finite().then_some(value)
}

/// Density for every year of a population series.
#[must_use]
pub fn density_series(
    population: &BTreeMap<u16, Option<f64>>,
    area_km2: f64,
) -> BTreeMap<u16, Option<f64>> {
    population
        .iter()
        .map(|(year, pop)| (*year, density(*pop, area_km2)))
        .collect()
}

/// Compound annual growth rate in percent:
/// `((end / start)^(1 / (end_year - start_year)) - 1) * 100`.
///
/// `None` if either population is missing, zero, or negative, or if
/// `end_year` is not after `start_year`.
#[must_use]
pub fn growth_rate(
    start: Option<f64>,
    end: Option<f64>,
    start_year: u16,
    end_year: u16,
) -> Option<f64> {
    let start = start?;
    let end = end?;
    if start <= 0.0 || end <= 0.0 || end_year <= start_year {
        return None;
    }
    let span = f64::from(end_year - start_year);
    let rate = ((end / start).powf(span.recip()) - 1.0) * 100.0;
    rate.is_finite().then_some(rate)
}
