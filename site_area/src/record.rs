//! Saved areas as exchanged with the areas API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ShapeError;
use crate::geometry::Shape;
use crate::io::shape_data;
use crate::units::Unit;

/// A saved area as returned by `GET /areas/...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub area_name: String,
    /// Display-unit value at save time. The backend returns decimals as
    /// strings, older rows as numbers.
    #[serde(deserialize_with = "decimal")]
    pub area_value: f64,
    pub unit: String,
    /// Shape JSON text, or the object itself when the driver parsed it.
    pub shape_data: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AreaRecord {
    /// Unit of `area_value`; unknown codes read as square meters.
    pub fn unit(&self) -> Unit {
        Unit::from_code(&self.unit)
    }

    /// Decodes the stored shape.
    pub fn shape(&self) -> Result<Shape, ShapeError> {
        shape_data::from_value(&self.shape_data)
    }

    /// Stored value converted back to square meters.
    ///
    /// Lossy: `area_value` was rounded to display precision when saved.
    pub fn stored_area_m2(&self) -> f64 {
        self.unit().to_m2(self.area_value)
    }
}

fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("area_value out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("area_value `{s}` is not a number"))),
        other => Err(serde::de::Error::custom(format!(
            "area_value must be a number or string, got {other}"
        ))),
    }
}

/// Body of `POST /areas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArea {
    pub user_id: i64,
    pub job_id: i64,
    pub customer_id: Option<i64>,
    pub area_name: String,
    /// Fixed-precision display value, e.g. `"338157.89"`.
    pub area_value: String,
    pub unit: String,
    /// Output of [`shape_data::to_json`].
    pub shape_data: String,
}

/// Job (and its customer) a new area is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTarget {
    pub job_id: i64,
    pub customer_id: Option<i64>,
}

impl JobTarget {
    pub fn new(job_id: i64, customer_id: Option<i64>) -> Self {
        Self {
            job_id,
            customer_id,
        }
    }
}

/// The areas endpoints of the backend. Every call is scoped to a user.
pub trait AreasApi {
    type Error: std::fmt::Display;

    /// `POST /areas`
    fn create_area(&mut self, area: &NewArea) -> Result<AreaRecord, Self::Error>;

    /// `GET /areas/job/:jobId/:userId`, newest first.
    fn areas_for_job(&self, job_id: i64, user_id: i64) -> Result<Vec<AreaRecord>, Self::Error>;

    /// `GET /areas/user/:userId`, newest first.
    fn areas_for_user(&self, user_id: i64) -> Result<Vec<AreaRecord>, Self::Error>;

    /// `DELETE /areas/:id/:userId`. Returns whether a row was removed.
    fn delete_area(&mut self, id: i64, user_id: i64) -> Result<bool, Self::Error>;
}
