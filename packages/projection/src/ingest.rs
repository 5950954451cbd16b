//! Projection table ingest.
//!
//! The published table has a title line, then a header line, then one row
//! per (state, sex) pair. Column 0 is the state or country name, column 1
//! the sex category, and column `2 + (year - 2011)` the population for
//! that year in thousands. Only `PERSON` rows are kept. Year cells are kept
//! as text; they are parsed during disaggregation so that one bad cell
//! only blanks that cell.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use india_pop_geography::normalize::normalize;
use india_pop_projection_models::{
    FIRST_YEAR, LAST_YEAR, StateProjectionRow, StateProjectionSeries, UNIT_MULTIPLIER,
};

use crate::ProjectionError;

/// Lines before the header line.
const SKIP_ROWS: usize = 1;
const NAME_COL: usize = 0;
const CATEGORY_COL: usize = 1;
const FIRST_YEAR_COL: usize = 2;

/// Category value of the combined-sex rows.
pub const PERSON: &str = "PERSON";

/// Reads the projection table from a CSV file.
///
/// # Errors
///
/// Returns [`ProjectionError`] if the file cannot be read or parsed, or
/// lacks the name, category, and year columns.
pub fn read_projections(path: &Path) -> Result<StateProjectionSeries, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|source| ProjectionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_projections(file, &path.display().to_string())
}

/// Parses the projection table from any reader. `label` identifies the
/// input in errors and log lines.
///
/// # Errors
///
/// Returns [`ProjectionError`] if the CSV cannot be parsed or lacks the
/// name, category, and year columns.
pub fn parse_projections<R: Read>(
    reader: R,
    label: &str,
) -> Result<StateProjectionSeries, ProjectionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = reader.byte_records().skip(SKIP_ROWS);

    let header = records
        .next()
        .transpose()?
        .ok_or_else(|| ProjectionError::MissingColumns {
            path: label.to_string(),
            message: "a header row".to_string(),
        })?;

    if header.len() <= FIRST_YEAR_COL {
        return Err(ProjectionError::MissingColumns {
            path: label.to_string(),
            message: format!(
                "year columns (header has {} columns, need at least {})",
                header.len(),
                FIRST_YEAR_COL + 1
            ),
        });
    }

    let years: Vec<u16> = (FIRST_YEAR..=LAST_YEAR)
        .filter(|year| year_column(*year) < header.len())
        .collect();

    let mut rows = Vec::new();
    let mut other_categories = 0usize;

    for record in records {
        let record = record?;

        let category = lossy_field(&record, CATEGORY_COL);
        if !category.trim().eq_ignore_ascii_case(PERSON) {
            other_categories += 1;
            continue;
        }

        let name = lossy_field(&record, NAME_COL).trim().to_string();

        let cells: BTreeMap<u16, Option<String>> = years
            .iter()
            .map(|year| (*year, year_cell(&record, *year, &name, label)))
            .collect();

        rows.push(StateProjectionRow {
            key: normalize(&name),
            name,
            cells,
        });
    }

    log::info!(
        "{label}: {} {PERSON} rows over {} years ({other_categories} other rows skipped)",
        rows.len(),
        years.len(),
    );

    Ok(StateProjectionSeries { rows, years })
}

const fn year_column(year: u16) -> usize {
    FIRST_YEAR_COL + (year - FIRST_YEAR) as usize
}

fn lossy_field(record: &csv::ByteRecord, col: usize) -> String {
    record
        .get(col)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

/// Text of a year cell. Blank and undecodable cells are missing.
fn year_cell(record: &csv::ByteRecord, year: u16, name: &str, label: &str) -> Option<String> {
    let bytes = record.get(year_column(year))?;
    let Ok(text) = std::str::from_utf8(bytes) else {
        log::warn!("{label}: {name} {year} cell is not valid UTF-8, treating as missing");
        return None;
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Parses a year cell in thousands ("1,210,855") into an absolute count.
///
/// Returns `None` for text that is not a finite number.
#[must_use]
pub fn parse_thousands(raw: &str) -> Option<f64> {
    let value = raw.trim().replace(',', "").parse::<f64>().ok()?;
    let scaled = value * UNIT_MULTIPLIER;
    scaled.is_finite().then_some(scaled)
}

/// Absolute population of a state row for a year, if present and parseable.
#[must_use]
pub fn state_population(row: &StateProjectionRow, year: u16) -> Option<f64> {
    row.cells
        .get(&year)?
        .as_deref()
        .and_then(parse_thousands)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const TABLE: &str = "\
Projected Total Population by Sex as on 1st March 2011-2036,,,,
State,Sex,,,
INDIA,PERSON,\"1,210,855\",\"1,226,142\",\"1,241,442\"
INDIA,MALE,\"623,270\",\"631,200\",\"639,100\"
Uttar Pradesh,Person,\"199,812\",\"202,100\",n/a
Maharashtra,PERSON,\"112,374\",,\"114,700\"
";

    #[test]
    fn keeps_only_person_rows() {
        let series = parse_projections(TABLE.as_bytes(), "test").unwrap();
        let names: Vec<&str> = series.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["INDIA", "Uttar Pradesh", "Maharashtra"]);
    }

    #[test]
    fn years_follow_column_positions() {
        let series = parse_projections(TABLE.as_bytes(), "test").unwrap();
        assert_eq!(series.years, vec![2011, 2012, 2013]);
        let india = series.find("INDIA").unwrap();
        assert_eq!(state_population(india, 2012), Some(1_226_142_000.0));
    }

    #[test]
    fn rows_are_keyed_by_normalized_name() {
        let series = parse_projections(TABLE.as_bytes(), "test").unwrap();
        assert!(series.find("UTTARPRADESH").is_some());
    }

    #[test]
    fn blank_and_malformed_cells_are_missing() {
        let series = parse_projections(TABLE.as_bytes(), "test").unwrap();
        let maharashtra = series.find("MAHARASHTRA").unwrap();
        assert_eq!(maharashtra.cells[&2012], None);
        assert_eq!(state_population(maharashtra, 2012), None);
        let up = series.find("UTTARPRADESH").unwrap();
        assert_eq!(state_population(up, 2013), None);
        assert_eq!(state_population(up, 2030), None);
    }

    #[test]
    fn undecodable_cell_only_blanks_that_cell() {
        let mut table = b"title\nState,Sex,,\nKerala,PERSON,100,".to_vec();
        table.extend_from_slice(&[0xff, 0xfe]);
        table.extend_from_slice(b"\nGoa,PERSON,1,2\n");

        let series = parse_projections(table.as_slice(), "test").unwrap();

        let kerala = series.find("KERALA").unwrap();
        assert_eq!(state_population(kerala, 2011), Some(100_000.0));
        assert_eq!(kerala.cells[&2012], None);
        let goa = series.find("GOA").unwrap();
        assert_eq!(state_population(goa, 2012), Some(2_000.0));
    }

    #[test]
    fn parses_thousands_separators_and_scales() {
        assert_eq!(parse_thousands("1,000"), Some(1_000_000.0));
        assert_eq!(parse_thousands(" 12.5 "), Some(12_500.0));
        assert_eq!(parse_thousands("--"), None);
        assert_eq!(parse_thousands("inf"), None);
    }

    #[test]
    fn table_without_year_columns_is_fatal() {
        let err = parse_projections("title\nState,Sex\nINDIA,PERSON\n".as_bytes(), "test")
            .unwrap_err();
        assert!(matches!(err, ProjectionError::MissingColumns { .. }));
    }

    #[test]
    fn empty_table_is_fatal() {
        let err = parse_projections("".as_bytes(), "test").unwrap_err();
        assert!(matches!(err, ProjectionError::MissingColumns { .. }));
    }
}
