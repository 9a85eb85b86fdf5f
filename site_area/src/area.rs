//! Surface area of drawn shapes, in square meters.
//!
//! Polygons and rectangles are measured on a sphere using the spherical
//! excess of the vertex ring. The ring is split into triangles that share
//! the north pole and the signed area of each is summed, which is the same
//! method web-mapping geometry libraries use for their area functions.

use crate::geometry::{LatLng, Shape};
use std::f64::consts::{FRAC_PI_2, PI};

/// Earth radius in meters used for area computation.
///
/// This is the equatorial WGS84 radius, which is what the web map's
/// geometry library uses and what saved areas were measured with.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Meters per degree used by the flat-earth approximation.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// How polygon areas are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMethod {
    /// Spherical excess on a sphere of [`EARTH_RADIUS_M`].
    #[default]
    Spherical,
    /// Shoelace formula on raw degrees scaled by [`METERS_PER_DEGREE`].
    ///
    /// Lower precision: it ignores the narrowing of longitude degrees away
    /// from the equator. Only for parity with areas measured this way.
    Planar,
}

/// Area in square meters of `shape` using `method` for polygon rings.
pub fn shape_area(shape: &Shape, method: AreaMethod) -> f64 {
    let area = match shape {
        Shape::Polygon { vertices } => ring_area(vertices, method),
        Shape::Rectangle { bounds } => ring_area(&bounds.corners(), method),
        Shape::Circle { radius_m, .. } => circle_area(*radius_m),
    };
    log::debug!("{} area {:.3} m2 ({:?})", shape.kind(), area, method);
    area
}

fn ring_area(ring: &[LatLng], method: AreaMethod) -> f64 {
    match method {
        AreaMethod::Spherical => polygon_area(ring),
        AreaMethod::Planar => planar_polygon_area(ring),
    }
}

/// Unsigned spherical area of the ring in square meters.
pub fn polygon_area(ring: &[LatLng]) -> f64 {
    signed_polygon_area(ring).abs()
}

/// Signed spherical area of the ring in square meters.
///
/// Counter-clockwise rings are positive, clockwise rings negative. The ring
/// is implicitly closed; rings with fewer than three vertices measure zero.
pub fn signed_polygon_area(ring: &[LatLng]) -> f64 {
    signed_polygon_area_on_sphere(ring, EARTH_RADIUS_M)
}

/// Signed ring area on a sphere of the given radius.
pub fn signed_polygon_area_on_sphere(ring: &[LatLng], radius: f64) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let last = ring[ring.len() - 1];
    let mut prev_tan_lat = half_colatitude_tan(last.lat);
    let mut prev_lng = last.lng.to_radians();
    let mut total = 0.0;
    for p in ring {
        let tan_lat = half_colatitude_tan(p.lat);
        let lng = p.lng.to_radians();
        total += polar_triangle_area(tan_lat, lng, prev_tan_lat, prev_lng);
        prev_tan_lat = tan_lat;
        prev_lng = lng;
    }
    total * radius * radius
}

fn half_colatitude_tan(lat_deg: f64) -> f64 {
    ((FRAC_PI_2 - lat_deg.to_radians()) / 2.0).tan()
}

/// Signed excess of the triangle formed by the north pole and two points.
fn polar_triangle_area(tan1: f64, lng1: f64, tan2: f64, lng2: f64) -> f64 {
    let delta_lng = lng1 - lng2;
    let t = tan1 * tan2;
    2.0 * (t * delta_lng.sin()).atan2(1.0 + t * delta_lng.cos())
}

/// Flat-earth shoelace area of the ring in square meters. See [`AreaMethod::Planar`].
pub fn planar_polygon_area(ring: &[LatLng]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        sum += ring[i].lng * ring[j].lat - ring[i].lat * ring[j].lng;
    }
    (sum / 2.0).abs() * METERS_PER_DEGREE * METERS_PER_DEGREE
}

/// Planar disk area; curvature is ignored for the radii drawn on a job site.
pub fn circle_area(radius_m: f64) -> f64 {
    PI * radius_m * radius_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    fn ring(points: &[(f64, f64)]) -> Vec<LatLng> {
        points.iter().map(|&(lat, lng)| LatLng::new(lat, lng)).collect()
    }

    #[test]
    fn degenerate_rings_are_zero() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&ring(&[(0.0, 0.0), (1.0, 1.0)])), 0.0);
        assert_eq!(planar_polygon_area(&ring(&[(0.0, 0.0), (1.0, 1.0)])), 0.0);
    }

    #[test]
    fn winding_sets_sign() {
        let cw = ring(&[(1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let ccw: Vec<LatLng> = cw.iter().rev().copied().collect();
        let a = signed_polygon_area(&cw);
        let b = signed_polygon_area(&ccw);
        assert!(a < 0.0);
        assert!((a + b).abs() < 1e-3);
    }

    #[test]
    fn one_degree_cell_at_equator() {
        // Close to the latitude band R^2 * dlng * (sin(1deg) - sin(0)),
        // slightly larger because the northern edge is a great circle.
        let bounds = Bounds::new(1.0, 0.0, 1.0, 0.0).unwrap();
        let area = polygon_area(&bounds.corners());
        assert!((area - 12_391_714_368.86).abs() / area < 1e-9);
        let band = EARTH_RADIUS_M.powi(2) * 1f64.to_radians() * 1f64.to_radians().sin();
        assert!((area - band).abs() / band < 1e-4);
    }

    #[test]
    fn small_square_spherical_vs_planar() {
        let sq = ring(&[(0.001, 0.0), (0.001, 0.001), (0.0, 0.001), (0.0, 0.0)]);
        let spherical = polygon_area(&sq);
        let planar = planar_polygon_area(&sq);
        assert!((spherical - 12_392.029).abs() < 0.01);
        assert!((planar - 12_392.1424).abs() < 0.001);
    }

    #[test]
    fn planar_overestimates_at_high_latitude() {
        let sq = ring(&[(60.001, 10.0), (60.001, 10.001), (60.0, 10.001), (60.0, 10.0)]);
        let spherical = polygon_area(&sq);
        assert!((spherical - 6_195.92).abs() < 0.01);
        assert!(planar_polygon_area(&sq) > 1.9 * spherical);
    }

    #[test]
    fn circle_uses_disk_formula() {
        let c = Shape::circle(LatLng::new(45.0, -93.0), 100.0).unwrap();
        assert!((shape_area(&c, AreaMethod::Spherical) - 31_415.926_535).abs() < 1e-5);
        let zero = Shape::circle(LatLng::new(45.0, -93.0), 0.0).unwrap();
        assert_eq!(shape_area(&zero, AreaMethod::Spherical), 0.0);
    }
}
