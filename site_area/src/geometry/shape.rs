use super::{mean_center, Bounds, LatLng};
use crate::error::GeometryError;

/// Discriminant of a [`Shape`], matching the `type` tag of stored shape data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Polygon,
    Rectangle,
    Circle,
}

impl ShapeKind {
    /// Wire name used in stored shape data.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shape drawn on the map.
///
/// The constructors and edit methods enforce the coordinate, bounds and
/// radius invariants. Stored shape data is always decoded through them.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Ordered vertex ring. Fewer than three vertices is allowed while
    /// drawing; such a polygon measures zero.
    Polygon { vertices: Vec<LatLng> },
    Rectangle { bounds: Bounds },
    Circle { center: LatLng, radius_m: f64 },
}

impl Shape {
    pub fn polygon(vertices: Vec<LatLng>) -> Result<Self, GeometryError> {
        for v in &vertices {
            v.validated()?;
        }
        Ok(Shape::Polygon { vertices })
    }

    pub fn rectangle(bounds: Bounds) -> Result<Self, GeometryError> {
        Ok(Shape::Rectangle {
            bounds: bounds.validated()?,
        })
    }

    pub fn circle(center: LatLng, radius_m: f64) -> Result<Self, GeometryError> {
        Ok(Shape::Circle {
            center: center.validated()?,
            radius_m: validate_radius(radius_m)?,
        })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Polygon { .. } => ShapeKind::Polygon,
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Point the map re-centres on when the shape is loaded.
    ///
    /// Polygons use the mean of their vertices, rectangles the midpoint of
    /// their bounds and circles their own center. An empty polygon has none.
    pub fn center(&self) -> Option<LatLng> {
        match self {
            Shape::Polygon { vertices } => mean_center(vertices),
            Shape::Rectangle { bounds } => Some(bounds.center()),
            Shape::Circle { center, .. } => Some(*center),
        }
    }

    /// Vertices of a polygon, or an empty slice for other kinds.
    pub fn vertices(&self) -> &[LatLng] {
        match self {
            Shape::Polygon { vertices } => vertices,
            _ => &[],
        }
    }

    /// Appends a vertex to a polygon.
    pub fn push_vertex(&mut self, p: LatLng) -> Result<(), GeometryError> {
        let p = p.validated()?;
        match self {
            Shape::Polygon { vertices } => {
                vertices.push(p);
                Ok(())
            }
            other => Err(unsupported("push_vertex", other)),
        }
    }

    /// Moves the polygon vertex at `index`.
    pub fn move_vertex(&mut self, index: usize, to: LatLng) -> Result<(), GeometryError> {
        let to = to.validated()?;
        match self {
            Shape::Polygon { vertices } => {
                let len = vertices.len();
                let v = vertices
                    .get_mut(index)
                    .ok_or(GeometryError::VertexOutOfRange { index, len })?;
                *v = to;
                Ok(())
            }
            other => Err(unsupported("move_vertex", other)),
        }
    }

    /// Replaces the bounds of a rectangle.
    pub fn set_bounds(&mut self, new_bounds: Bounds) -> Result<(), GeometryError> {
        let new_bounds = new_bounds.validated()?;
        match self {
            Shape::Rectangle { bounds } => {
                *bounds = new_bounds;
                Ok(())
            }
            other => Err(unsupported("set_bounds", other)),
        }
    }

    /// Changes the radius of a circle.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), GeometryError> {
        let radius = validate_radius(radius)?;
        match self {
            Shape::Circle { radius_m, .. } => {
                *radius_m = radius;
                Ok(())
            }
            other => Err(unsupported("set_radius", other)),
        }
    }

    /// Moves the center of a circle.
    pub fn set_center(&mut self, p: LatLng) -> Result<(), GeometryError> {
        let p = p.validated()?;
        match self {
            Shape::Circle { center, .. } => {
                *center = p;
                Ok(())
            }
            other => Err(unsupported("set_center", other)),
        }
    }
}

fn validate_radius(radius: f64) -> Result<f64, GeometryError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(radius)
    } else {
        Err(GeometryError::InvalidRadius(radius))
    }
}

fn unsupported(op: &'static str, shape: &Shape) -> GeometryError {
    GeometryError::UnsupportedEdit {
        op,
        kind: shape.kind().as_str(),
    }
}
