#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Household-survey indicator types.
//!
//! These types describe the district indicator workbook after its numeric
//! IDs have been read: the label dictionary that turns IDs into names,
//! the per-district indicator rows, and the district weights derived from
//! a population proxy indicator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Indicator used as the population proxy when none is configured
/// (health insurance coverage, measured against the whole population).
pub const DEFAULT_PROXY_INDICATOR_ID: i64 = 10;

/// ID -> name mappings read from the workbook's label sheet.
///
/// IDs or names that were missing in the sheet are not present here; the
/// counts of such rows are kept in [`LabelDictionary::skipped`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDictionary {
    /// District ID -> district name.
    pub district_names: BTreeMap<i64, String>,
    /// District ID -> state name, read from the state name column on the
    /// same row as the district ID.
    pub district_states: BTreeMap<i64, String>,
    /// State ID -> state name.
    pub state_names: BTreeMap<i64, String>,
    /// Indicator ID -> indicator name.
    pub indicator_names: BTreeMap<i64, String>,
    /// Rows dropped from each mapping because the key or value was missing.
    pub skipped: LabelSkipCounts,
}

impl LabelDictionary {
    /// Looks up the district name for a district ID.
    #[must_use]
    pub fn district_name(&self, district_id: i64) -> Option<&str> {
        self.district_names.get(&district_id).map(String::as_str)
    }

    /// Looks up the state name for a district ID.
    #[must_use]
    pub fn district_state(&self, district_id: i64) -> Option<&str> {
        self.district_states.get(&district_id).map(String::as_str)
    }

    /// Looks up the indicator name for an indicator ID.
    #[must_use]
    pub fn indicator_name(&self, indicator_id: i64) -> Option<&str> {
        self.indicator_names.get(&indicator_id).map(String::as_str)
    }
}

/// Number of label rows excluded from each mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSkipCounts {
    /// Rows with no usable district ID or district name.
    pub district_names: usize,
    /// Rows with no usable district ID or state name.
    pub district_states: usize,
    /// Rows with no usable state ID or state name.
    pub state_names: usize,
    /// Rows with no usable indicator ID or indicator name.
    pub indicator_names: usize,
}

/// One `(district, indicator)` row of the district indicator sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorRecord {
    /// District identifier.
    pub district_id: Option<i64>,
    /// Indicator identifier.
    pub indicator_id: Option<i64>,
    /// Prevalence in 2021, as a percentage.
    pub prevalence: Option<f64>,
    /// Absolute headcount in 2021.
    pub headcount: Option<f64>,
}

impl IndicatorRecord {
    /// Population implied by the headcount and prevalence:
    /// `headcount / (prevalence / 100)`.
    ///
    /// Returns `None` when either input is missing or the result is not a
    /// finite number (zero prevalence).
    #[must_use]
    pub fn inferred_base_population(&self) -> Option<f64> {
        inferred_base_population(self.headcount?, self.prevalence?)
    }
}

/// All-India row of the indicator aggregate sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalIndicator {
    /// Indicator identifier.
    pub indicator_id: i64,
    /// All-India prevalence in 2021, as a percentage.
    pub prevalence: Option<f64>,
    /// All-India headcount in 2021.
    pub headcount: Option<f64>,
}

impl NationalIndicator {
    /// National population implied by the headcount and prevalence.
    #[must_use]
    pub fn inferred_base_population(&self) -> Option<f64> {
        inferred_base_population(self.headcount?, self.prevalence?)
    }
}

/// `headcount / (prevalence / 100)`, or `None` if that is not finite.
#[must_use]
pub fn inferred_base_population(headcount: f64, prevalence: f64) -> Option<f64> {
    let value = headcount / (prevalence / 100.0);
    value.is_finite().then_some(value)
}

/// A district's share of its state's population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictWeight {
    /// District identifier from the survey.
    pub district_id: i64,
    /// District display name.
    pub district_name: String,
    /// State display name.
    pub state_name: String,
    /// Population inferred from the proxy indicator.
    pub base_population: f64,
    /// `base_population` divided by the sum over the state's districts.
    pub weight: f64,
}

/// Result of the weight derivation, with counts of excluded rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightTable {
    /// Proxy indicator the weights were derived from.
    pub proxy_indicator_id: i64,
    /// One weight per surviving district row, in indicator sheet order.
    pub weights: Vec<DistrictWeight>,
    /// Proxy rows whose district ID had no district name.
    pub missing_district_name: usize,
    /// Proxy rows whose district ID had no state name.
    pub missing_state_name: usize,
    /// Proxy rows with a missing, zero, or non-finite base population.
    pub missing_base_population: usize,
}

impl WeightTable {
    /// Sum of weights for each state name.
    #[must_use]
    pub fn state_weight_sums(&self) -> BTreeMap<&str, f64> {
        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        for w in &self.weights {
            *sums.entry(w.state_name.as_str()).or_default() += w.weight;
        }
        sums
    }
}
