//! National trend series export.

use std::collections::BTreeMap;
use std::path::Path;

use india_pop_geography::export::write_atomic;
use serde::Serialize;

use crate::ReconcileError;

#[derive(Debug, Serialize)]
struct TrendRow {
    year: u16,
    population: f64,
}

/// Renders the per-year national totals as `year,population` CSV.
///
/// # Errors
///
/// Returns [`ReconcileError::Csv`] if a row cannot be serialized.
pub fn national_csv(totals: &BTreeMap<u16, f64>) -> Result<Vec<u8>, ReconcileError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(["year", "population"])?;
    for (&year, &population) in totals {
        writer.serialize(TrendRow { year, population })?;
    }
    writer
        .into_inner()
        .map_err(|e| ReconcileError::Csv(e.into_error().into()))
}

/// Writes the national trend CSV atomically.
///
/// # Errors
///
/// Returns [`ReconcileError`] if the CSV cannot be rendered or written.
pub fn write_national_csv(
    path: &Path,
    totals: &BTreeMap<u16, f64>,
) -> Result<(), ReconcileError> {
    write_atomic(path, &national_csv(totals)?)?;
    log::info!("Wrote {} national totals to {}", totals.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_year_in_order() {
        let totals = BTreeMap::from([(2021, 2_000.5), (2011, 1_000.0)]);
        let csv = String::from_utf8(national_csv(&totals).unwrap()).unwrap();
        assert_eq!(csv, "year,population\n2011,1000.0\n2021,2000.5\n");
    }

    #[test]
    fn empty_series_still_has_header() {
        let csv = national_csv(&BTreeMap::new()).unwrap();
        assert_eq!(csv, b"year,population\n");
    }
}
