//! Core library for the job-site area calculator.
//!
//! Measures shapes drawn on a map, converts areas between display units,
//! and encodes shapes for the areas API so they can be reloaded and edited.

pub mod area;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod materials;
pub mod record;
pub mod session;
pub mod store;
pub mod units;

pub use area::AreaMethod;
pub use error::{GeometryError, SaveError, ShapeError, ValidationError};
pub use geometry::{Bounds, LatLng, Shape, ShapeKind};
pub use units::Unit;
