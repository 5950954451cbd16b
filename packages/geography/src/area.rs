//! Polygon surface area.
//!
//! Planar area of longitude/latitude coordinates is in square degrees and
//! shrinks towards the poles, so polygons are first projected with the
//! Lambert cylindrical equal-area projection on the authalic sphere. Planar
//! area in that projection is true surface area.

use geo::{Area, Coord, MapCoords, MultiPolygon};

/// Radius of the sphere with the same surface area as the WGS 84
/// ellipsoid, in meters.
pub const AUTHALIC_RADIUS_M: f64 = 6_371_007.2;

const SQ_M_PER_SQ_KM: f64 = 1_000_000.0;

/// Projects longitude/latitude degrees to Lambert cylindrical equal-area
/// meters.
#[must_use]
pub fn project_equal_area(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geometry.map_coords(|Coord { x, y }| Coord {
        x: AUTHALIC_RADIUS_M * x.to_radians(),
        y: AUTHALIC_RADIUS_M * y.to_radians().sin(),
    })
}

/// Surface area of a longitude/latitude polygon in km².
#[must_use]
pub fn area_km2(geometry: &MultiPolygon<f64>) -> f64 {
    project_equal_area(geometry).unsigned_area() / SQ_M_PER_SQ_KM
}

#[cfg(test)]
mod tests {
    use geo::{Polygon, polygon};

    use super::*;

    fn one_degree_cell(lat: f64) -> MultiPolygon<f64> {
        let cell: Polygon<f64> = polygon![
            (x: 80.0, y: lat),
            (x: 81.0, y: lat),
            (x: 81.0, y: lat + 1.0),
            (x: 80.0, y: lat + 1.0),
            (x: 80.0, y: lat),
        ];
        MultiPolygon(vec![cell])
    }

    #[test]
    fn one_degree_cell_at_equator() {
        let area = area_km2(&one_degree_cell(0.0));
        assert!((area - 12_363.71).abs() < 0.1, "{area}");
    }

    #[test]
    fn area_is_not_square_degrees() {
        let cell = one_degree_cell(20.0);
        assert!((cell.unsigned_area() - 1.0).abs() < 1e-9);
        assert!(area_km2(&cell) > 10_000.0);
    }

    #[test]
    fn cells_shrink_with_latitude() {
        let ratio = area_km2(&one_degree_cell(60.0)) / area_km2(&one_degree_cell(0.0));
        assert!((ratio - 0.4924).abs() < 1e-3, "{ratio}");
    }

    #[test]
    fn holes_are_subtracted() {
        let with_hole: Polygon<f64> = polygon!(
            exterior: [
                (x: 80.0, y: 0.0),
                (x: 81.0, y: 0.0),
                (x: 81.0, y: 1.0),
                (x: 80.0, y: 1.0),
                (x: 80.0, y: 0.0),
            ],
            interiors: [[
                (x: 80.25, y: 0.25),
                (x: 80.75, y: 0.25),
                (x: 80.75, y: 0.75),
                (x: 80.25, y: 0.75),
                (x: 80.25, y: 0.25),
            ]],
        );
        let full = area_km2(&one_degree_cell(0.0));
        let holed = area_km2(&MultiPolygon(vec![with_hole]));
        assert!(holed < full * 0.76 && holed > full * 0.74, "{holed} vs {full}");
    }
}
