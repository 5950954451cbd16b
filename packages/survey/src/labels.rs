//! Label Resolver: ID -> name mappings from the label dictionary sheet.
//!
//! The label sheet lays out several dictionaries side by side. Each ID
//! column (`District ID`, `State ID`, `Indicator ID`) is immediately
//! followed by an untitled column holding the display name. The first data
//! row repeats sub-labels rather than data and is skipped.

use std::collections::BTreeMap;

use india_pop_survey_models::{LabelDictionary, LabelSkipCounts};

use crate::SurveyError;
use crate::sheet::Sheet;

/// Header of the district ID column.
pub const DISTRICT_ID: &str = "District ID";
/// Header of the state ID column.
pub const STATE_ID: &str = "State ID";
/// Header of the indicator ID column.
pub const INDICATOR_ID: &str = "Indicator ID";

/// Number of leading data rows that hold sub-labels instead of entries.
const PLACEHOLDER_ROWS: usize = 1;

/// Builds the [`LabelDictionary`] from the label sheet.
///
/// Rows whose ID or name is missing are left out of the corresponding
/// mapping and counted in [`LabelDictionary::skipped`]. When an ID occurs
/// more than once, the last row wins.
///
/// # Errors
///
/// Returns [`SurveyError::MissingColumn`] if any of the ID columns is
/// absent.
pub fn resolve_labels(sheet: &Sheet) -> Result<LabelDictionary, SurveyError> {
    let district_col = sheet.column(DISTRICT_ID)?;
    let state_col = sheet.column(STATE_ID)?;
    let indicator_col = sheet.column(INDICATOR_ID)?;

    let mut skipped = LabelSkipCounts::default();

    let district_names = build_mapping(
        sheet,
        district_col,
        district_col + 1,
        &mut skipped.district_names,
    );
    let district_states = build_mapping(
        sheet,
        district_col,
        state_col + 1,
        &mut skipped.district_states,
    );
    let state_names = build_mapping(sheet, state_col, state_col + 1, &mut skipped.state_names);
    let indicator_names = build_mapping(
        sheet,
        indicator_col,
        indicator_col + 1,
        &mut skipped.indicator_names,
    );

    log::info!(
        "Resolved labels: {} districts, {} district states, {} states, {} indicators",
        district_names.len(),
        district_states.len(),
        state_names.len(),
        indicator_names.len(),
    );
    log::debug!("Label rows skipped: {skipped:?}");

    Ok(LabelDictionary {
        district_names,
        district_states,
        state_names,
        indicator_names,
        skipped,
    })
}

fn build_mapping(
    sheet: &Sheet,
    id_col: usize,
    name_col: usize,
    skipped: &mut usize,
) -> BTreeMap<i64, String> {
    let mut mapping = BTreeMap::new();

    for row in PLACEHOLDER_ROWS..sheet.rows().len() {
        let id_cell = sheet.cell(row, id_col);
        let name_cell = sheet.cell(row, name_col);

        // Side-by-side dictionaries have different lengths; a row that is
        // blank in both cells is padding, not a broken entry.
        match (id_cell.as_id(), name_cell.as_label()) {
            (Some(id), Some(name)) => {
                mapping.insert(id, name);
            }
            (None, None) => {}
            _ => *skipped += 1,
        }
    }

    mapping
}

/// District-derived state names that do not appear among the names of the
/// dedicated state ID table.
///
/// The weighting path takes state names from the district rows only; this
/// reports where that disagrees with the state table.
#[must_use]
pub fn unverified_district_states(labels: &LabelDictionary) -> Vec<(i64, &str)> {
    let known: std::collections::BTreeSet<&str> =
        labels.state_names.values().map(String::as_str).collect();

    labels
        .district_states
        .iter()
        .filter(|(_, name)| !known.contains(name.as_str()))
        .map(|(id, name)| (*id, name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;
    use crate::sheet::tests::{num, text};

    fn label_sheet() -> Sheet {
        Sheet::from_rows(
            "Label Dictionary",
            vec![
                vec![
                    text("District ID"),
                    Cell::Empty,
                    text("State ID"),
                    Cell::Empty,
                    text("Indicator ID"),
                    Cell::Empty,
                ],
                vec![
                    text("District ID"),
                    text("District Name"),
                    text("State ID"),
                    text("State Name"),
                    text("Indicator ID"),
                    text("Indicator Name"),
                ],
                vec![
                    num(1.0),
                    text("Pune"),
                    num(27.0),
                    text("Maharashtra"),
                    num(10.0),
                    text("Health Insurance"),
                ],
                vec![
                    num(2.0),
                    text("Nagpur"),
                    num(9.0),
                    text("Uttar Pradesh"),
                    num(1.0),
                    text("BPL Card"),
                ],
                vec![
                    Cell::Empty,
                    text("Orphan"),
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                ],
                vec![num(3.0), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
            ],
        )
    }

    #[test]
    fn skips_placeholder_row_and_maps_ids() {
        let labels = resolve_labels(&label_sheet()).unwrap();
        assert_eq!(labels.district_name(1), Some("Pune"));
        assert_eq!(labels.district_name(2), Some("Nagpur"));
        assert_eq!(labels.indicator_name(10), Some("Health Insurance"));
        assert_eq!(labels.state_names.get(&27).map(String::as_str), Some("Maharashtra"));
        assert_eq!(labels.district_names.len(), 2);
    }

    #[test]
    fn district_state_comes_from_the_same_row() {
        let labels = resolve_labels(&label_sheet()).unwrap();
        assert_eq!(labels.district_state(1), Some("Maharashtra"));
        assert_eq!(labels.district_state(2), Some("Uttar Pradesh"));
    }

    #[test]
    fn missing_ids_and_names_are_dropped_and_counted() {
        let labels = resolve_labels(&label_sheet()).unwrap();
        assert_eq!(labels.district_name(3), None);
        assert_eq!(labels.skipped.district_names, 2);
        assert_eq!(labels.skipped.district_states, 1);
        assert_eq!(labels.skipped.state_names, 0);
    }

    #[test]
    fn missing_id_column_is_fatal() {
        let sheet = Sheet::from_rows("Label Dictionary", vec![vec![text("District ID")]]);
        let err = resolve_labels(&sheet).unwrap_err();
        assert!(matches!(err, SurveyError::MissingColumn { ref column, .. } if column == STATE_ID));
    }

    #[test]
    fn flags_district_states_absent_from_state_table() {
        let mut labels = resolve_labels(&label_sheet()).unwrap();
        assert!(unverified_district_states(&labels).is_empty());

        labels.district_states.insert(5, "Bombay State".to_string());
        assert_eq!(unverified_district_states(&labels), vec![(5, "Bombay State")]);
    }
}
