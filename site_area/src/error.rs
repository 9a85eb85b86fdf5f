use thiserror::Error;

use crate::units::Unit;

/// Geometry that cannot describe a shape on the Earth's surface.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GeometryError {
    #[error("coordinate ({lat}, {lng}) is not a valid latitude/longitude")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("bounds are inverted: north {north} < south {south} or east {east} < west {west}")]
    InvertedBounds {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },

    #[error("radius must be a finite value >= 0, got {0}")]
    InvalidRadius(f64),

    #[error("vertex index {index} out of range for polygon with {len} vertices")]
    VertexOutOfRange { index: usize, len: usize },

    #[error("{op} is not supported on a {kind}")]
    UnsupportedEdit { op: &'static str, kind: &'static str },

    #[error("no shape has been drawn")]
    NoShape,
}

/// Failure to decode or encode stored shape data.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ShapeError {
    #[error("malformed shape data: {0}")]
    Malformed(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Reasons a save request is rejected before reaching the areas API.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("draw an area before saving")]
    EmptyShape,

    #[error("area rounds to zero in {}; choose a smaller unit", .0.label())]
    RoundsToZero(Unit),

    #[error("enter an area name")]
    MissingName,

    #[error("select a job")]
    NoJobSelected,
}

/// Outcome of a failed save.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("could not encode shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("areas API rejected the save: {0}")]
    Api(String),
}

/// Problems decoding stored material dimensions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DimensionError {
    #[error("dimensions must be a JSON object")]
    NotAnObject,
}

/// Unknown unit code passed to a strict parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown area unit `{0}` (expected sqft, sqm, acres or hectares)")]
pub struct UnitError(pub String);
