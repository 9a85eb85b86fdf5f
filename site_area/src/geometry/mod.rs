//! Shape primitives a user can draw on the map.

mod point;
mod shape;

pub use point::{mean_center, LatLng};
pub use shape::{Shape, ShapeKind};

use crate::error::GeometryError;

/// Latitude/longitude box given by its four edges in degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    /// Creates bounds, rejecting inverted edges and invalid coordinates.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, GeometryError> {
        Self {
            north,
            south,
            east,
            west,
        }
        .validated()
    }

    /// Builds normalized bounds from any two opposite corners.
    pub fn from_corners(a: LatLng, b: LatLng) -> Result<Self, GeometryError> {
        Self::new(
            a.lat.max(b.lat),
            a.lat.min(b.lat),
            a.lng.max(b.lng),
            a.lng.min(b.lng),
        )
    }

    /// Checks the box invariants: valid corners, `north >= south`, `east >= west`.
    pub fn validated(self) -> Result<Self, GeometryError> {
        LatLng::new(self.north, self.east).validated()?;
        LatLng::new(self.south, self.west).validated()?;
        if self.north < self.south || self.east < self.west {
            return Err(GeometryError::InvertedBounds {
                north: self.north,
                south: self.south,
                east: self.east,
                west: self.west,
            });
        }
        Ok(self)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    /// Corner ring `[NW, NE, SE, SW]` used for area computation.
    ///
    /// NW and SE are derived from the NE/SW corners. The order fixes the
    /// winding of the ring, so it must not change.
    pub fn corners(&self) -> [LatLng; 4] {
        let ne = self.north_east();
        let sw = self.south_west();
        let nw = LatLng::new(ne.lat, sw.lng);
        let se = LatLng::new(sw.lat, ne.lng);
        [nw, ne, se, sw]
    }

    /// Midpoint of the north/south and east/west edges.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}
