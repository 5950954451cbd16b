//! `GeoJSON` export of reconciled districts.
//!
//! One feature per boundary record. Missing statistics are written as JSON
//! `null` so that map adapters can tell "no data" apart from zero.

use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use india_pop_geography_models::ReconciledDistrict;

use crate::GeoError;

/// Builds the `GeoJSON` feature for one reconciled district.
#[must_use]
pub fn to_feature(district: &ReconciledDistrict) -> Feature {
    let mut feature = Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(
            &district.boundary.geometry,
        ))),
        id: None,
        properties: None,
        foreign_members: None,
    };

    feature.set_property("shapeName", district.boundary.name.clone());
    feature.set_property("district", district.district_name.clone());
    feature.set_property("state", district.state_name.clone());
    feature.set_property("pop_base", district.base_population);
    feature.set_property("weight", district.weight);
    feature.set_property("area_km2", district.boundary.area_km2);
    for (year, population) in &district.population {
        feature.set_property(format!("pop_{year}"), *population);
    }
    for (year, density) in &district.density {
        feature.set_property(format!("density_{year}"), *density);
    }
    feature.set_property("growth_rate", district.growth_rate);

    feature
}

/// Builds the feature collection, attaching `metadata` as a foreign
/// member when it is non-empty.
#[must_use]
pub fn to_feature_collection(
    districts: &[ReconciledDistrict],
    metadata: JsonObject,
) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: districts.iter().map(to_feature).collect(),
        foreign_members: if metadata.is_empty() {
            None
        } else {
            let mut members = JsonObject::new();
            members.insert("metadata".to_string(), serde_json::Value::Object(metadata));
            Some(members)
        },
    }
}

/// Writes the reconciled districts as a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns [`GeoError::Io`] if the file cannot be written.
pub fn write_geojson(
    path: &Path,
    districts: &[ReconciledDistrict],
    metadata: JsonObject,
) -> Result<(), GeoError> {
    let geojson = GeoJson::from(to_feature_collection(districts, metadata));
    write_atomic(path, geojson.to_string().as_bytes())?;
    log::info!("Wrote {} features to {}", districts.len(), path.display());
    Ok(())
}

/// Writes `contents` to a sibling temporary file and renames it over
/// `path`, so readers never see a partial file.
///
/// # Errors
///
/// Returns [`GeoError::Io`] if the directory, temporary file, or rename
/// fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), GeoError> {
    let io_err = |source| GeoError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}
