//! Pipeline configuration.
//!
//! [`ReconcileConfig`] is read from a TOML file. Every field has a default,
//! so an empty file (or no file at all) gives the standard layout under
//! `data/raw` and `data/processed`.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use india_pop_geography::boundary::DEFAULT_NAME_FIELDS;
use india_pop_projection_models::{FIRST_YEAR, LAST_YEAR, YearSelection};
use india_pop_survey_models::DEFAULT_PROXY_INDICATOR_ID;
use serde::{Deserialize, Serialize};

use crate::ReconcileError;

/// Default size of the unmatched-name samples in diagnostics.
pub const DEFAULT_UNMATCHED_SAMPLE: usize = 10;

// ── Top-level config ─────────────────────────────────────────────────────

/// Everything the pipeline needs to locate its inputs and shape its
/// outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// District boundary `GeoJSON`.
    pub boundaries: PathBuf,
    /// Survey workbook (`.xlsx`).
    pub workbook: PathBuf,
    /// State projection CSV.
    pub projections: PathBuf,
    /// Directory the outputs are written to.
    pub output_dir: PathBuf,
    /// Boundary feature properties tried in order for the district name.
    pub boundary_name_field: Vec<String>,
    /// Indicator whose prevalence and headcount give the base population.
    pub proxy_indicator_id: i64,
    /// Years to disaggregate.
    pub years: YearSelection,
    /// Endpoints of the growth rate.
    pub growth: GrowthEndpoints,
    /// Density range for presentation adapters.
    pub density_domain: ValueDomain,
    /// Growth rate range for presentation adapters.
    pub growth_domain: ValueDomain,
    /// Workbook sheet names.
    pub sheets: SheetNames,
    /// How many unmatched names to list in diagnostics.
    pub unmatched_sample: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            boundaries: PathBuf::from("data/raw/india_districts.geojson"),
            workbook: PathBuf::from("data/raw/IPI_District_Data.xlsx"),
            projections: PathBuf::from("data/raw/india_projections_2011_2036_total.csv"),
            output_dir: PathBuf::from("data/processed"),
            boundary_name_field: DEFAULT_NAME_FIELDS.iter().map(|s| (*s).to_string()).collect(),
            proxy_indicator_id: DEFAULT_PROXY_INDICATOR_ID,
            years: YearSelection::default(),
            growth: GrowthEndpoints::default(),
            density_domain: ValueDomain {
                min: 100.0,
                max: 15_000.0,
            },
            growth_domain: ValueDomain {
                min: -0.5,
                max: 2.5,
            },
            sheets: SheetNames::default(),
            unmatched_sample: DEFAULT_UNMATCHED_SAMPLE,
        }
    }
}

// ── Nested sections ──────────────────────────────────────────────────────

/// Start and end year of the compound annual growth rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrowthEndpoints {
    /// First year of the span.
    pub start_year: u16,
    /// Last year of the span.
    pub end_year: u16,
}

impl Default for GrowthEndpoints {
    fn default() -> Self {
        Self {
            start_year: FIRST_YEAR,
            end_year: LAST_YEAR,
        }
    }
}

/// A closed value range. Passed through to output metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueDomain {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Names of the workbook sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetNames {
    /// District, state, and indicator labels.
    pub labels: String,
    /// Per-district indicator values.
    pub districts: String,
    /// All-India indicator values.
    pub national: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            labels: "Label Dictionary".to_string(),
            districts: "Indicator-District Data".to_string(),
            national: "Indicator-Specific Data".to_string(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────

impl ReconcileConfig {
    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] if the file cannot be read, is not valid
    /// TOML for this struct, or fails [`Self::validate`].
    pub fn load(path: &Path) -> Result<Self, ReconcileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ReconcileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&contents, &path.display().to_string())?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ReconcileError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Parses and validates config text. `label` names the source in
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::ConfigParse`] for invalid TOML and
    /// [`ReconcileError::Config`] for inconsistent values.
    pub fn parse(toml_str: &str, label: &str) -> Result<Self, ReconcileError> {
        let config: Self = toml::from_str(toml_str).map_err(|source| ReconcileError::ConfigParse {
            path: label.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Config`] describing the first problem.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        let fail = |message: String| Err(ReconcileError::Config { message });

        if self.boundary_name_field.is_empty() {
            return fail("boundary_name_field must list at least one property".to_string());
        }

        let years = self.years.years();
        if years.is_empty() {
            return fail("years selects no years".to_string());
        }
        if let Some(year) = years.iter().find(|y| !(FIRST_YEAR..=LAST_YEAR).contains(*y)) {
            return fail(format!(
                "year {year} is outside the projection range {FIRST_YEAR}-{LAST_YEAR}"
            ));
        }

        if self.growth.end_year <= self.growth.start_year {
            return fail(format!(
                "growth end_year {} must be after start_year {}",
                self.growth.end_year, self.growth.start_year
            ));
        }

        for (name, domain) in [
            ("density_domain", self.density_domain),
            ("growth_domain", self.growth_domain),
        ] {
            if domain.min.partial_cmp(&domain.max) != Some(Ordering::Less) {
                return fail(format!(
                    "{name} min {} must be below max {}",
                    domain.min, domain.max
                ));
            }
        }

        Ok(())
    }

    /// Path of the reconciled `GeoJSON` collection.
    #[must_use]
    pub fn geojson_output(&self) -> PathBuf {
        self.output_dir.join("india_district_projections.geojson")
    }

    /// Path of the national trend CSV.
    #[must_use]
    pub fn national_output(&self) -> PathBuf {
        self.output_dir.join("india_national_trend.csv")
    }

    /// Path of the join and disaggregation diagnostics.
    #[must_use]
    pub fn diagnostics_output(&self) -> PathBuf {
        self.output_dir.join("india_reconcile_diagnostics.json")
    }
}

#[cfg(test)]
mod tests {
    use india_pop_projection_models::YearMode;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ReconcileConfig::parse("", "test").unwrap();
        assert_eq!(config, ReconcileConfig::default());
        assert_eq!(config.proxy_indicator_id, 10);
        assert_eq!(config.boundary_name_field, vec!["shapeName", "ADM2_EN"]);
        assert_eq!(config.years.years().len(), 26);
        assert_eq!(config.sheets.labels, "Label Dictionary");
    }

    #[test]
    fn parses_year_modes_and_lists() {
        let config = ReconcileConfig::parse("years = \"milestones\"", "test").unwrap();
        assert_eq!(config.years, YearSelection::Mode(YearMode::Milestones));

        let config = ReconcileConfig::parse("years = [2036, 2011, 2021]", "test").unwrap();
        assert_eq!(config.years.years(), vec![2011, 2021, 2036]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ReconcileConfig::parse(
            "proxy_indicator_id = 4\n\n[growth]\nstart_year = 2021\n\n[sheets]\nnational = \"India\"\n",
            "test",
        )
        .unwrap();
        assert_eq!(config.proxy_indicator_id, 4);
        assert_eq!(config.growth.start_year, 2021);
        assert_eq!(config.growth.end_year, 2036);
        assert_eq!(config.sheets.national, "India");
        assert_eq!(config.sheets.districts, "Indicator-District Data");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ReconcileConfig::parse("proxy_indicator = 4", "test").unwrap_err();
        assert!(matches!(err, ReconcileError::ConfigParse { .. }));
    }

    #[test]
    fn reversed_growth_span_is_rejected() {
        let err = ReconcileConfig::parse("[growth]\nstart_year = 2036\nend_year = 2011\n", "test")
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Config { .. }));
    }

    #[test]
    fn years_outside_projection_range_are_rejected() {
        let err = ReconcileConfig::parse("years = [2011, 2050]", "test").unwrap_err();
        assert!(matches!(err, ReconcileError::Config { .. }));
    }

    #[test]
    fn inverted_domain_is_rejected() {
        let err = ReconcileConfig::parse("density_domain = { min = 10.0, max = 1.0 }", "test")
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Config { .. }));
    }

    #[test]
    fn output_paths_live_under_output_dir() {
        let config = ReconcileConfig {
            output_dir: PathBuf::from("out"),
            ..ReconcileConfig::default()
        };
        assert_eq!(
            config.geojson_output(),
            PathBuf::from("out/india_district_projections.geojson")
        );
        assert_eq!(config.national_output(), PathBuf::from("out/india_national_trend.csv"));
    }
}
