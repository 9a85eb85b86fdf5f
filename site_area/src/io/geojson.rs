use crate::area::{shape_area, AreaMethod};
use crate::geometry::{LatLng, Shape};
use std::io;

use geo_types::{LineString, Point as GeoPoint, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};

/// Converts a shape into a GeoJSON feature.
///
/// Polygons and rectangles become closed polygon rings in `[lng, lat]`
/// order. Circles become a point with a `radius_m` property. Every feature
/// carries `shape_type` and `area_m2`, and `name` when given.
pub fn shape_to_feature(shape: &Shape, name: Option<&str>, method: AreaMethod) -> Feature {
    let geometry = match shape {
        Shape::Polygon { vertices } => ring_geometry(vertices),
        Shape::Rectangle { bounds } => ring_geometry(&bounds.corners()),
        Shape::Circle { center, .. } => {
            Geometry::new(geojson::Value::from(&GeoPoint::new(center.lng, center.lat)))
        }
    };

    let mut properties = JsonObject::new();
    properties.insert("shape_type".into(), shape.kind().as_str().into());
    properties.insert("area_m2".into(), shape_area(shape, method).into());
    if let Shape::Circle { radius_m, .. } = shape {
        properties.insert("radius_m".into(), (*radius_m).into());
    }
    if let Some(name) = name {
        properties.insert("name".into(), name.into());
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn ring_geometry(ring: &[LatLng]) -> Geometry {
    let exterior: LineString<f64> = ring.iter().map(|p| (p.lng, p.lat)).collect::<Vec<_>>().into();
    let polygon = Polygon::new(exterior, vec![]);
    Geometry::new(geojson::Value::from(&polygon))
}

/// Writes named shapes to a GeoJSON feature collection.
pub fn write_shapes_geojson(
    path: &str,
    shapes: &[(Option<&str>, &Shape)],
    method: AreaMethod,
) -> io::Result<()> {
    let collection = FeatureCollection {
        bbox: None,
        features: shapes
            .iter()
            .map(|(name, shape)| shape_to_feature(shape, *name, method))
            .collect(),
        foreign_members: None,
    };
    let json = serde_json::to_string_pretty(&collection).map_err(io::Error::other)?;
    super::write_string(path, &json)
}
