//! Official projection versus survey-derived national population.
//!
//! The survey's All-India headcount and prevalence for the proxy
//! indicator imply a national population. Comparing it with the official
//! projection for the survey year shows whether the proxy is a sound
//! base for the district weights.

use std::fmt;

use india_pop_geography::normalize::normalize;
use india_pop_projection::ingest::{read_projections, state_population};
use india_pop_projection_models::StateProjectionSeries;
use india_pop_survey::indicators::read_national_indicators;
use india_pop_survey::workbook::Workbook;
use india_pop_survey_models::NationalIndicator;
use serde::Serialize;

use crate::ReconcileError;
use crate::config::ReconcileConfig;

/// Year the survey headcounts describe.
pub const SURVEY_YEAR: u16 = 2021;
/// Projection row holding the national totals.
pub const COUNTRY_ROW: &str = "INDIA";

const ACCURATE_GAP_PERCENT: f64 = 1.0;
const BALLPARK_GAP_PERCENT: f64 = 5.0;

/// How closely the two national figures agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Agreement {
    /// Gap under 1%.
    Accurate,
    /// Gap under 5%.
    Ballpark,
    /// Gap of 5% or more.
    Discrepancy,
}

impl Agreement {
    /// Classifies a signed percentage gap by its magnitude.
    #[must_use]
    pub fn classify(percent_gap: f64) -> Self {
        let gap = percent_gap.abs();
        if gap < ACCURATE_GAP_PERCENT {
            Self::Accurate
        } else if gap < BALLPARK_GAP_PERCENT {
            Self::Ballpark
        } else {
            Self::Discrepancy
        }
    }
}

impl fmt::Display for Agreement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accurate => "accurate (gap < 1%)",
            Self::Ballpark => "ballpark match (gap < 5%)",
            Self::Discrepancy => "discrepancy (gap >= 5%)",
        })
    }
}

/// Result of the national comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// Indicator the survey population was derived from.
    pub indicator_id: i64,
    /// Official projection for [`SURVEY_YEAR`], in people.
    pub official: f64,
    /// `headcount / (prevalence / 100)` from the All-India row.
    pub survey_derived: f64,
    /// `(survey_derived - official) / official * 100`.
    pub percent_gap: f64,
    /// Classification of `percent_gap`.
    pub agreement: Agreement,
}

/// Compares the survey-derived national population with the official
/// projection for [`SURVEY_YEAR`].
///
/// # Errors
///
/// Returns [`ReconcileError::Unverifiable`] if the projection table has no
/// usable national value or the survey has no usable row for
/// `indicator_id`.
pub fn verify_national(
    national: &[NationalIndicator],
    series: &StateProjectionSeries,
    indicator_id: i64,
) -> Result<Verification, ReconcileError> {
    let unverifiable = |message: String| ReconcileError::Unverifiable { message };

    let official = series
        .find(&normalize(COUNTRY_ROW))
        .and_then(|row| state_population(row, SURVEY_YEAR))
        .filter(|value| *value > 0.0)
        .ok_or_else(|| {
            unverifiable(format!(
                "no positive {SURVEY_YEAR} value in the {COUNTRY_ROW} projection row"
            ))
        })?;

    let survey_derived = national
        .iter()
        .find(|row| row.indicator_id == indicator_id)
        .ok_or_else(|| unverifiable(format!("no All-India row for indicator {indicator_id}")))?
        .inferred_base_population()
        .ok_or_else(|| {
            unverifiable(format!(
                "All-India prevalence or headcount for indicator {indicator_id} is missing"
            ))
        })?;

    let percent_gap = (survey_derived - official) / official * 100.0;

    Ok(Verification {
        indicator_id,
        official,
        survey_derived,
        percent_gap,
        agreement: Agreement::classify(percent_gap),
    })
}

/// Reads the national sheet and projection table and runs
/// [`verify_national`] for the configured proxy indicator.
///
/// # Errors
///
/// Returns [`ReconcileError`] if an input is unreadable or the comparison
/// cannot be made.
pub fn run_verification(config: &ReconcileConfig) -> Result<Verification, ReconcileError> {
    let mut workbook = Workbook::open(&config.workbook)?;
    let national = read_national_indicators(&workbook.sheet(&config.sheets.national)?)?;
    let series = read_projections(&config.projections)?;

    let verification = verify_national(&national, &series, config.proxy_indicator_id)?;
    log::info!(
        "Official {SURVEY_YEAR}: {:.0}, survey-derived: {:.0}, gap {:.2}% ({})",
        verification.official,
        verification.survey_derived,
        verification.percent_gap,
        verification.agreement
    );
    Ok(verification)
}

#[cfg(test)]
mod tests {
    use india_pop_projection::ingest::parse_projections;

    use super::*;

    fn series(india_2021: &str) -> StateProjectionSeries {
        let mut header = String::from("title\nState,Sex");
        let mut india = String::from("INDIA,PERSON");
        for year in 2011..=2021 {
            header.push(',');
            india.push(',');
            if year == 2021 {
                india.push_str(india_2021);
            } else {
                india.push('1');
            }
        }
        parse_projections(format!("{header}\n{india}\n").as_bytes(), "test").unwrap()
    }

    fn national(prevalence: f64, headcount: f64) -> Vec<NationalIndicator> {
        vec![
            NationalIndicator {
                indicator_id: 1,
                prevalence: Some(50.0),
                headcount: Some(1.0),
            },
            NationalIndicator {
                indicator_id: 10,
                prevalence: Some(prevalence),
                headcount: Some(headcount),
            },
        ]
    }

    #[test]
    fn classifies_gap_magnitude() {
        assert_eq!(Agreement::classify(0.4), Agreement::Accurate);
        assert_eq!(Agreement::classify(-0.99), Agreement::Accurate);
        assert_eq!(Agreement::classify(1.0), Agreement::Ballpark);
        assert_eq!(Agreement::classify(-4.5), Agreement::Ballpark);
        assert_eq!(Agreement::classify(5.0), Agreement::Discrepancy);
        assert_eq!(Agreement::classify(-12.0), Agreement::Discrepancy);
    }

    #[test]
    fn compares_survey_population_with_official_projection() {
        // Official 1,000,000 thousand; 408 million at 40% prevalence implies 1.02 billion.
        let result = verify_national(&national(40.0, 408_000_000.0), &series("1000000"), 10).unwrap();
        assert!((result.official - 1_000_000_000.0).abs() < 1e-3);
        assert!((result.survey_derived - 1_020_000_000.0).abs() < 1e-3);
        assert!((result.percent_gap - 2.0).abs() < 1e-9);
        assert_eq!(result.agreement, Agreement::Ballpark);
    }

    #[test]
    fn missing_indicator_is_unverifiable() {
        let err = verify_national(&national(40.0, 1.0), &series("1000"), 99).unwrap_err();
        assert!(matches!(err, ReconcileError::Unverifiable { .. }));
    }

    #[test]
    fn zero_prevalence_is_unverifiable() {
        let err = verify_national(&national(0.0, 1.0), &series("1000"), 10).unwrap_err();
        assert!(matches!(err, ReconcileError::Unverifiable { .. }));
    }

    #[test]
    fn blank_official_value_is_unverifiable() {
        let err = verify_national(&national(40.0, 1.0), &series(""), 10).unwrap_err();
        assert!(matches!(err, ReconcileError::Unverifiable { .. }));
    }
}
