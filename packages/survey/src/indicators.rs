//! District and national indicator sheets.

use india_pop_survey_models::{IndicatorRecord, LabelDictionary, NationalIndicator};

use crate::SurveyError;
use crate::labels::{DISTRICT_ID, INDICATOR_ID};
use crate::sheet::Sheet;

/// Header of the district prevalence column.
pub const PREVALENCE: &str = "Prevalence 2021";
/// Header of the district headcount column.
pub const HEADCOUNT: &str = "Headcount 2021";
/// Header of the All-India prevalence column.
pub const NATIONAL_PREVALENCE: &str = "All India Prevalence 2021";
/// Header of the All-India headcount column.
pub const NATIONAL_HEADCOUNT: &str = "All India Headcount 2021";

/// Reads every row of the district indicator sheet.
///
/// Cells that cannot be read as numbers become `None`; no row is dropped
/// here.
///
/// # Errors
///
/// Returns [`SurveyError::MissingColumn`] if any of the four required
/// columns is absent.
pub fn read_district_indicators(sheet: &Sheet) -> Result<Vec<IndicatorRecord>, SurveyError> {
    let district_col = sheet.column(DISTRICT_ID)?;
    let indicator_col = sheet.column(INDICATOR_ID)?;
    let prevalence_col = sheet.column(PREVALENCE)?;
    let headcount_col = sheet.column(HEADCOUNT)?;

    let records: Vec<IndicatorRecord> = (0..sheet.rows().len())
        .map(|row| IndicatorRecord {
            district_id: sheet.cell(row, district_col).as_id(),
            indicator_id: sheet.cell(row, indicator_col).as_id(),
            prevalence: sheet.cell(row, prevalence_col).as_number(),
            headcount: sheet.cell(row, headcount_col).as_number(),
        })
        .collect();

    log::info!(
        "Read {} district indicator rows from '{}'",
        records.len(),
        sheet.name()
    );

    Ok(records)
}

/// Reads the All-India indicator aggregate sheet.
///
/// Rows without an indicator ID are skipped.
///
/// # Errors
///
/// Returns [`SurveyError::MissingColumn`] if any required column is absent.
pub fn read_national_indicators(sheet: &Sheet) -> Result<Vec<NationalIndicator>, SurveyError> {
    let indicator_col = sheet.column(INDICATOR_ID)?;
    let prevalence_col = sheet.column(NATIONAL_PREVALENCE)?;
    let headcount_col = sheet.column(NATIONAL_HEADCOUNT)?;

    Ok((0..sheet.rows().len())
        .filter_map(|row| {
            Some(NationalIndicator {
                indicator_id: sheet.cell(row, indicator_col).as_id()?,
                prevalence: sheet.cell(row, prevalence_col).as_number(),
                headcount: sheet.cell(row, headcount_col).as_number(),
            })
        })
        .collect())
}

/// Totals for one indicator across all districts.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadcountSummary {
    /// Indicator the summary covers.
    pub indicator_id: i64,
    /// Indicator display name, if labelled.
    pub indicator_name: Option<String>,
    /// Number of district rows for the indicator.
    pub rows: usize,
    /// Rows whose district ID resolved to a district name.
    pub labelled_rows: usize,
    /// Sum of the non-missing headcounts.
    pub total_headcount: f64,
}

/// Sums the headcount of one indicator across all districts.
#[must_use]
pub fn summarize_headcount(
    records: &[IndicatorRecord],
    labels: &LabelDictionary,
    indicator_id: i64,
) -> HeadcountSummary {
    let rows: Vec<&IndicatorRecord> = records
        .iter()
        .filter(|r| r.indicator_id == Some(indicator_id))
        .collect();

    let labelled_rows = rows
        .iter()
        .filter(|r| r.district_id.and_then(|id| labels.district_name(id)).is_some())
        .count();

    let total_headcount = rows.iter().filter_map(|r| r.headcount).sum();

    HeadcountSummary {
        indicator_id,
        indicator_name: labels.indicator_name(indicator_id).map(str::to_string),
        rows: rows.len(),
        labelled_rows,
        total_headcount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;
    use crate::sheet::tests::{num, text};

    fn district_sheet() -> Sheet {
        Sheet::from_rows(
            "Indicator-District Data",
            vec![
                vec![
                    text("District ID"),
                    text("Indicator ID"),
                    text("Prevalence 2021"),
                    text("Headcount 2021"),
                ],
                vec![num(1.0), num(10.0), num(20.0), num(1000.0)],
                vec![num(2.0), num(10.0), text("n/a"), num(500.0)],
                vec![num(1.0), num(1.0), num(50.0), text("2,500")],
                vec![num(3.0), num(1.0), num(10.0), Cell::Empty],
            ],
        )
    }

    #[test]
    fn reads_rows_with_missing_cells_as_none() {
        let records = read_district_indicators(&district_sheet()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].inferred_base_population(), Some(5000.0));
        assert_eq!(records[1].prevalence, None);
        assert_eq!(records[2].headcount, Some(2500.0));
    }

    #[test]
    fn requires_prevalence_and_headcount_columns() {
        let sheet = Sheet::from_rows(
            "Indicator-District Data",
            vec![vec![text("District ID"), text("Indicator ID")]],
        );
        let err = read_district_indicators(&sheet).unwrap_err();
        assert!(matches!(err, SurveyError::MissingColumn { ref column, .. } if column == PREVALENCE));
    }

    #[test]
    fn reads_national_rows() {
        let sheet = Sheet::from_rows(
            "Indicator-Specific Data",
            vec![
                vec![
                    text("Indicator ID"),
                    text("All India Prevalence 2021"),
                    text("All India Headcount 2021"),
                ],
                vec![num(10.0), num(50.0), num(700.0)],
                vec![Cell::Empty, num(1.0), num(1.0)],
            ],
        );
        let national = read_national_indicators(&sheet).unwrap();
        assert_eq!(national.len(), 1);
        assert_eq!(national[0].inferred_base_population(), Some(1400.0));
    }

    #[test]
    fn sums_headcount_for_one_indicator() {
        let records = read_district_indicators(&district_sheet()).unwrap();
        let mut labels = LabelDictionary::default();
        labels.district_names.insert(1, "Pune".to_string());
        labels.indicator_names.insert(1, "BPL Card".to_string());

        let summary = summarize_headcount(&records, &labels, 1);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.labelled_rows, 1);
        assert!((summary.total_headcount - 2500.0).abs() < 1e-9);
        assert_eq!(summary.indicator_name.as_deref(), Some("BPL Card"));
    }
}
