#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Population projection types.
//!
//! The official projections give one combined-sex total per state and
//! year, 2011 through 2036, in thousands. District projections are those
//! totals multiplied by each district's weight.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// First year covered by the official projections.
pub const FIRST_YEAR: u16 = 2011;
/// Last year covered by the official projections.
pub const LAST_YEAR: u16 = 2036;
/// The five milestone years used for the density comparison maps.
pub const MILESTONE_YEARS: [u16; 5] = [2011, 2021, 2025, 2031, 2036];
/// Source values are in thousands of people.
pub const UNIT_MULTIPLIER: f64 = 1000.0;

/// Named year sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearMode {
    /// Every year from [`FIRST_YEAR`] to [`LAST_YEAR`] inclusive.
    Full,
    /// Only [`MILESTONE_YEARS`].
    Milestones,
}

/// Which years to disaggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearSelection {
    /// A named set.
    Mode(YearMode),
    /// An explicit list of years.
    Explicit(Vec<u16>),
}

impl Default for YearSelection {
    fn default() -> Self {
        Self::Mode(YearMode::Full)
    }
}

impl YearSelection {
    /// The selected years, ascending and without duplicates.
    #[must_use]
    pub fn years(&self) -> Vec<u16> {
        let mut years = match self {
            Self::Mode(YearMode::Full) => (FIRST_YEAR..=LAST_YEAR).collect(),
            Self::Mode(YearMode::Milestones) => MILESTONE_YEARS.to_vec(),
            Self::Explicit(years) => years.clone(),
        };
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// One combined-sex row of the projection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateProjectionRow {
    /// State or country name as written in the table.
    pub name: String,
    /// Normalized name used for matching.
    pub key: String,
    /// Raw year cells, in thousands, possibly with thousands separators.
    /// `None` when the cell is absent or blank.
    pub cells: BTreeMap<u16, Option<String>>,
}

/// The combined-sex rows of the projection table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateProjectionSeries {
    /// Rows in table order.
    pub rows: Vec<StateProjectionRow>,
    /// Years for which the table has a column.
    pub years: Vec<u16>,
}

impl StateProjectionSeries {
    /// Finds the first row with the given normalized key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&StateProjectionRow> {
        self.rows.iter().find(|row| row.key == key)
    }
}

/// Disaggregated population series for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictProjection {
    /// District identifier from the survey.
    pub district_id: i64,
    /// District display name.
    pub district_name: String,
    /// State display name.
    pub state_name: String,
    /// Population inferred from the proxy indicator.
    pub base_population: f64,
    /// Share of the state population.
    pub weight: f64,
    /// Population per year; `None` where the state value was missing.
    pub population: BTreeMap<u16, Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mode_covers_26_years() {
        let years = YearSelection::Mode(YearMode::Full).years();
        assert_eq!(years.len(), 26);
        assert_eq!(years.first(), Some(&2011));
        assert_eq!(years.last(), Some(&2036));
    }

    #[test]
    fn milestone_mode_is_five_points() {
        assert_eq!(
            YearSelection::Mode(YearMode::Milestones).years(),
            vec![2011, 2021, 2025, 2031, 2036]
        );
    }

    #[test]
    fn explicit_years_are_sorted_and_deduplicated() {
        assert_eq!(
            YearSelection::Explicit(vec![2031, 2011, 2031]).years(),
            vec![2011, 2031]
        );
    }
}
