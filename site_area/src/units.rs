//! Display units for measured areas.

use crate::error::UnitError;
use std::str::FromStr;

/// Unit an area is displayed and saved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "sqft")]
    SquareFeet,
    #[serde(rename = "sqm")]
    SquareMeters,
    #[serde(rename = "acres")]
    Acres,
    #[serde(rename = "hectares")]
    Hectares,
}

impl Unit {
    pub const ALL: [Unit; 4] = [
        Unit::SquareFeet,
        Unit::SquareMeters,
        Unit::Acres,
        Unit::Hectares,
    ];

    /// Multiplier from square meters to this unit.
    pub fn factor(&self) -> f64 {
        match self {
            Unit::SquareFeet => 10.7639,
            Unit::SquareMeters => 1.0,
            Unit::Acres => 0.000247105,
            Unit::Hectares => 0.0001,
        }
    }

    /// Decimal places shown for this unit. Acres and hectares keep four
    /// because typical job-site values are small fractions.
    pub fn decimals(&self) -> usize {
        match self {
            Unit::SquareFeet | Unit::SquareMeters => 2,
            Unit::Acres | Unit::Hectares => 4,
        }
    }

    /// Code stored in the `unit` column.
    pub fn code(&self) -> &'static str {
        match self {
            Unit::SquareFeet => "sqft",
            Unit::SquareMeters => "sqm",
            Unit::Acres => "acres",
            Unit::Hectares => "hectares",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Unit::SquareFeet => "sq ft",
            Unit::SquareMeters => "sq m",
            Unit::Acres => "acres",
            Unit::Hectares => "hectares",
        }
    }

    /// Lenient lookup for stored codes; anything unknown is treated as square meters.
    pub fn from_code(code: &str) -> Unit {
        code.parse().unwrap_or(Unit::SquareMeters)
    }

    /// Converts a canonical area in square meters to this unit.
    pub fn from_m2(&self, area_m2: f64) -> f64 {
        area_m2 * self.factor()
    }

    /// Converts a value in this unit back to square meters.
    pub fn to_m2(&self, value: f64) -> f64 {
        value / self.factor()
    }

    /// Rounds a value already in this unit to its display precision.
    pub fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals() as i32);
        (value * scale).round() / scale
    }

    /// Formats a canonical area as the fixed-precision string that is
    /// displayed and sent as `area_value`.
    pub fn format(&self, area_m2: f64) -> String {
        format!("{:.*}", self.decimals(), self.from_m2(area_m2))
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqft" => Ok(Unit::SquareFeet),
            "sqm" => Ok(Unit::SquareMeters),
            "acres" => Ok(Unit::Acres),
            "hectares" => Ok(Unit::Hectares),
            _ => Err(UnitError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
