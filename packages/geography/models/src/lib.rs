#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District boundary and reconciled district types.
//!
//! A [`BoundaryRecord`] is one district polygon from the boundary dataset
//! with its area computed once on load. A [`ReconciledDistrict`] is that
//! boundary joined to the survey-derived weight and the disaggregated
//! population series; it is the only type handed to map and chart
//! adapters.

use std::collections::BTreeMap;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// A district polygon from the boundary dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRecord {
    /// Display name as written in the boundary file.
    pub name: String,
    /// Normalized name used as the join key.
    pub key: String,
    /// Polygon geometry in longitude/latitude (WGS 84).
    pub geometry: MultiPolygon<f64>,
    /// Surface area in km², computed in an equal-area projection.
    pub area_km2: f64,
}

/// Coverage of a name join between boundaries and statistical rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDiagnostics {
    /// Number of boundary records.
    pub boundary_count: usize,
    /// Number of statistical records offered to the join.
    pub statistic_count: usize,
    /// Boundary records that found a statistical match.
    pub matched_count: usize,
    /// Statistical records dropped because an earlier record had the same
    /// normalized name.
    pub duplicate_statistic_keys: usize,
    /// Every statistical record sharing a normalized name with another,
    /// keyed by that name. The first record listed is the one joined.
    pub duplicate_statistic_names: BTreeMap<String, Vec<String>>,
    /// Boundary records whose normalized name is shared with another
    /// boundary. These may have been given another area's statistics.
    pub shared_boundary_key_count: usize,
    /// First N boundary names (sorted) counted in
    /// `shared_boundary_key_count`.
    pub shared_boundary_keys: Vec<String>,
    /// First N boundary names (sorted) with no statistical match.
    pub unmatched_boundaries: Vec<String>,
    /// First N statistical names (sorted) with no boundary match.
    pub unmatched_statistics: Vec<String>,
    /// Total boundary records with no match.
    pub unmatched_boundary_count: usize,
    /// Total distinct statistical names with no match.
    pub unmatched_statistic_count: usize,
}

impl JoinDiagnostics {
    /// Fraction of boundary records that matched, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage(&self) -> f64 {
        if self.boundary_count == 0 {
            0.0
        } else {
            self.matched_count as f64 / self.boundary_count as f64
        }
    }
}

/// A boundary record with its reconciled statistics.
///
/// Every statistical field is `None` when the boundary found no match.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledDistrict {
    /// The boundary polygon and its area.
    pub boundary: BoundaryRecord,
    /// Survey district name.
    pub district_name: Option<String>,
    /// Survey state name.
    pub state_name: Option<String>,
    /// Population inferred from the proxy indicator.
    pub base_population: Option<f64>,
    /// Share of the state population.
    pub weight: Option<f64>,
    /// Population per year.
    pub population: BTreeMap<u16, Option<f64>>,
    /// People per km² per year.
    pub density: BTreeMap<u16, Option<f64>>,
    /// Compound annual growth rate in percent between the configured
    /// endpoint years.
    pub growth_rate: Option<f64>,
}

impl ReconciledDistrict {
    /// Whether the boundary matched a statistical record.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.weight.is_some()
    }

    /// Population for a year, if known.
    #[must_use]
    pub fn population_in(&self, year: u16) -> Option<f64> {
        self.population.get(&year).copied().flatten()
    }

    /// Density for a year, if known.
    #[must_use]
    pub fn density_in(&self, year: u16) -> Option<f64> {
        self.density.get(&year).copied().flatten()
    }
}
