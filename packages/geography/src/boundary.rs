//! Boundary loading from `GeoJSON`.
//!
//! Each polygon feature becomes a [`BoundaryRecord`]: its display name is
//! taken from the first configured name property that is present, its key
//! is the normalized name, and its area is computed once here.

use std::path::Path;

use geo::MultiPolygon;
use geojson::{Feature, GeoJson};
use india_pop_geography_models::BoundaryRecord;

use crate::GeoError;
use crate::area::area_km2;
use crate::normalize::normalize;

/// Name properties tried when none are configured (geoBoundaries ADM2).
pub const DEFAULT_NAME_FIELDS: &[&str] = &["shapeName", "ADM2_EN"];

/// Reads and parses a boundary file.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read, is not a `GeoJSON`
/// `FeatureCollection`, or has no feature with any of `name_fields`.
pub fn load_boundaries(
    path: &Path,
    name_fields: &[String],
) -> Result<Vec<BoundaryRecord>, GeoError> {
    let contents = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_boundaries(&contents, name_fields, &path.display().to_string())
}

/// Parses boundary records from `GeoJSON` text.
///
/// Features without a name or without polygon geometry are skipped and
/// logged. `label` identifies the input in errors and log lines.
///
/// # Errors
///
/// Returns [`GeoError`] if the text is not a `GeoJSON` `FeatureCollection`
/// or no feature has any of `name_fields`.
pub fn parse_boundaries(
    geojson_str: &str,
    name_fields: &[String],
    label: &str,
) -> Result<Vec<BoundaryRecord>, GeoError> {
    let geojson: GeoJson = geojson_str.parse().map_err(|e| GeoError::GeoJson {
        path: label.to_string(),
        source: Box::new(e),
    })?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeoError::NotFeatureCollection {
            path: label.to_string(),
        });
    };

    let total = collection.features.len();
    let mut unnamed = 0usize;
    let mut non_polygon = 0usize;
    let mut records = Vec::with_capacity(total);

    for feature in &collection.features {
        let Some(name) = feature_name(feature, name_fields) else {
            unnamed += 1;
            continue;
        };

        let Some(geometry) = feature_polygons(feature) else {
            log::debug!("{label}: boundary '{name}' has no polygon geometry");
            non_polygon += 1;
            continue;
        };

        records.push(BoundaryRecord {
            key: normalize(&name),
            area_km2: area_km2(&geometry),
            name,
            geometry,
        });
    }

    if total > 0 && unnamed == total {
        return Err(GeoError::MissingNameField {
            path: label.to_string(),
            fields: name_fields.join(", "),
        });
    }

    if unnamed > 0 || non_polygon > 0 {
        log::warn!(
            "{label}: skipped {unnamed} unnamed and {non_polygon} non-polygon features of {total}"
        );
    }
    log::info!("{label}: loaded {} boundaries", records.len());

    Ok(records)
}

/// Display name from the first present, non-null name property.
///
/// Non-string values are rendered with their JSON representation.
fn feature_name(feature: &Feature, name_fields: &[String]) -> Option<String> {
    name_fields.iter().find_map(|field| {
        let value = feature.property(field)?;
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    })
}

/// Converts a feature's geometry to a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn feature_polygons(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
