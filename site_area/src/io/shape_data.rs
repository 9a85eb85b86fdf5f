//! JSON form of a [`Shape`] as stored in the `shape_data` column.
//!
//! ```text
//! { "type": "polygon",   "path": [{lat,lng}, ...], "center": {lat,lng} }
//! { "type": "rectangle", "bounds": {north,south,east,west}, "center": {lat,lng} }
//! { "type": "circle",    "center": {lat,lng}, "radius": <meters> }
//! ```
//!
//! `center` is always derived from the geometry when writing and ignored
//! when reading, so the two can never disagree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ShapeError;
use crate::geometry::{Bounds, LatLng, Shape};

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireShapeOut<'a> {
    Polygon { path: &'a [LatLng], center: LatLng },
    Rectangle { bounds: Bounds, center: LatLng },
    Circle { center: LatLng, radius: f64 },
}

/// Every field optional so missing geometry is reported per shape type.
#[derive(Deserialize)]
struct WireShapeIn {
    #[serde(rename = "type")]
    kind: Option<String>,
    path: Option<Vec<LatLng>>,
    bounds: Option<Bounds>,
    center: Option<LatLng>,
    radius: Option<f64>,
}

/// Serializes a shape to its stored JSON text.
///
/// Fails only for a polygon without vertices, which has no center.
pub fn to_json(shape: &Shape) -> Result<String, ShapeError> {
    let center = shape
        .center()
        .ok_or_else(|| ShapeError::Malformed("polygon has no vertices".into()))?;
    let wire = match shape {
        Shape::Polygon { vertices } => WireShapeOut::Polygon {
            path: vertices,
            center,
        },
        Shape::Rectangle { bounds } => WireShapeOut::Rectangle {
            bounds: *bounds,
            center,
        },
        Shape::Circle { center, radius_m } => WireShapeOut::Circle {
            center: *center,
            radius: *radius_m,
        },
    };
    serde_json::to_string(&wire).map_err(|e| ShapeError::Malformed(e.to_string()))
}

/// Parses stored shape JSON, unwrapping one extra level of string encoding
/// when the payload was stringified twice.
pub fn from_json(text: &str) -> Result<Shape, ShapeError> {
    from_value(&Value::String(text.to_string()))
}

/// Decodes a shape from a JSON value that is either the shape object or a
/// string containing it, as a text column does. Text that was stringified
/// once more before storage is unwrapped a second time.
pub fn from_value(value: &Value) -> Result<Shape, ShapeError> {
    let parsed;
    let object = match value {
        Value::String(text) => {
            parsed = match parse_text(text)? {
                Value::String(inner) => {
                    log::warn!("shape data was double-encoded, decoding inner string");
                    parse_text(&inner)?
                }
                other => other,
            };
            &parsed
        }
        other => other,
    };
    match object {
        Value::Object(_) => decode_object(object),
        _ => Err(ShapeError::Malformed("expected a JSON object".into())),
    }
}

fn parse_text(text: &str) -> Result<Value, ShapeError> {
    serde_json::from_str(text).map_err(|e| ShapeError::Malformed(e.to_string()))
}

fn decode_object(value: &Value) -> Result<Shape, ShapeError> {
    let wire = WireShapeIn::deserialize(value).map_err(|e| ShapeError::Malformed(e.to_string()))?;
    let kind = wire
        .kind
        .ok_or_else(|| ShapeError::Malformed("missing `type`".into()))?;
    let shape = match kind.as_str() {
        "polygon" => Shape::polygon(require(wire.path, "path", &kind)?)?,
        "rectangle" => Shape::rectangle(require(wire.bounds, "bounds", &kind)?)?,
        "circle" => Shape::circle(
            require(wire.center, "center", &kind)?,
            require(wire.radius, "radius", &kind)?,
        )?,
        other => return Err(ShapeError::Malformed(format!("unknown shape type `{other}`"))),
    };
    Ok(shape)
}

fn require<T>(field: Option<T>, name: &str, kind: &str) -> Result<T, ShapeError> {
    field.ok_or_else(|| ShapeError::Malformed(format!("{kind} is missing `{name}`")))
}
