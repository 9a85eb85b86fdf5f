//! Geographic coordinate type used throughout the crate.

use crate::error::GeometryError;

/// Latitude/longitude pair in decimal degrees.
///
/// The web client stores `{lat, lng}` while the mobile client writes
/// `{latitude, longitude}`; both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLng {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the point if it is finite and its latitude lies within the poles.
    pub fn validated(self) -> Result<Self, GeometryError> {
        if self.lat.is_finite() && self.lng.is_finite() && (-90.0..=90.0).contains(&self.lat) {
            Ok(self)
        } else {
            Err(GeometryError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

/// Arithmetic mean of the given coordinates, or `None` for an empty slice.
///
/// This is not the geometric centroid of an irregular polygon; it is the
/// point a reloaded shape is re-centred on.
pub fn mean_center(points: &[LatLng]) -> Option<LatLng> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(LatLng::new(lat / n, lng / n))
}
