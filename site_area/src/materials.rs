//! Material kinds and their stored dimension metadata.
//!
//! Dimensions used to be stored as bare values (`{"thickness": 5}`) and are
//! now stored with a unit (`{"thickness": {"value": 5, "unit": "inches"}}`).
//! Both forms decode to [`Dimension`]. This only feeds descriptive text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DimensionError;

/// Unit assumed when an object-form dimension carries none.
pub const DEFAULT_DIMENSION_UNIT: &str = "inches";

/// A single measured dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    pub unit: String,
}

impl Dimension {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Dimensions keyed by field name (`length`, `width`, ...).
pub type Dimensions = BTreeMap<String, Dimension>;

/// Unit a field starts with in the material form, used for legacy values.
pub fn field_default_unit(field: &str) -> &'static str {
    match field {
        "length" => "feet",
        _ => DEFAULT_DIMENSION_UNIT,
    }
}

/// Decodes stored dimensions in either format.
///
/// The column may hold the object itself or a JSON string of it. Fields are
/// read independently: null, empty, zero and unreadable values are skipped
/// and the remaining fields are kept.
pub fn decode_dimensions(stored: &Value) -> Result<Dimensions, DimensionError> {
    let parsed;
    let map = match stored {
        Value::Object(map) => map,
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text).map_err(|_| DimensionError::NotAnObject)?;
            parsed.as_object().ok_or(DimensionError::NotAnObject)?
        }
        _ => return Err(DimensionError::NotAnObject),
    };

    let mut dims = Dimensions::new();
    for (field, raw) in map {
        let dim = match raw {
            Value::Null => continue,
            Value::String(s) if s.trim().is_empty() => continue,
            Value::Object(obj) => obj.get("value").and_then(numeric).map(|value| {
                let unit = obj
                    .get("unit")
                    .and_then(Value::as_str)
                    .filter(|u| !u.trim().is_empty())
                    .unwrap_or(DEFAULT_DIMENSION_UNIT);
                Dimension::new(value, unit)
            }),
            legacy => numeric(legacy).map(|value| Dimension::new(value, field_default_unit(field))),
        };
        match dim {
            Some(dim) if dim.value != 0.0 => {
                dims.insert(field.clone(), dim);
            }
            Some(_) => {}
            None => log::warn!("skipping dimension `{}`: no numeric value in {}", field, raw),
        }
    }
    Ok(dims)
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Encodes the dimensions relevant to `kind` in the current `{value, unit}`
/// form, or `None` when none of the kind's fields are set.
pub fn encode_dimensions(kind: MaterialKind, dims: &Dimensions) -> Option<Value> {
    let mut out = Map::new();
    for field in kind.fields() {
        if let Some(dim) = dims.get(*field) {
            out.insert(
                (*field).to_string(),
                serde_json::json!({ "value": dim.value, "unit": dim.unit }),
            );
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(Value::Object(out))
    }
}

/// Description line listing the kind's dimensions in field order.
pub fn describe(kind: MaterialKind, dims: &Dimensions) -> Option<String> {
    let parts: Vec<String> = kind
        .fields()
        .iter()
        .filter_map(|field| {
            dims.get(*field)
                .map(|d| format!("{}: {} {}", field, d.value, d.unit))
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(format!("Dimensions: {}", parts.join(", ")))
    }
}

/// Category of material, detected from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Lumber,
    Pipe,
    Concrete,
    Drywall,
    Paint,
    Roofing,
    Insulation,
}

impl MaterialKind {
    /// Detection order; the first kind with a matching keyword wins.
    pub const ALL: [MaterialKind; 7] = [
        MaterialKind::Lumber,
        MaterialKind::Pipe,
        MaterialKind::Concrete,
        MaterialKind::Drywall,
        MaterialKind::Paint,
        MaterialKind::Roofing,
        MaterialKind::Insulation,
    ];

    /// Name stored in the `material_type` column.
    pub fn name(&self) -> &'static str {
        match self {
            MaterialKind::Lumber => "lumber",
            MaterialKind::Pipe => "pipe",
            MaterialKind::Concrete => "concrete",
            MaterialKind::Drywall => "drywall",
            MaterialKind::Paint => "paint",
            MaterialKind::Roofing => "roofing",
            MaterialKind::Insulation => "insulation",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            MaterialKind::Lumber => &[
                "lumber", "wood", "timber", "2x4", "2x6", "2x8", "4x4", "plywood", "board",
            ],
            MaterialKind::Pipe => &["pipe", "pvc", "copper", "pex", "conduit"],
            MaterialKind::Concrete => &["concrete", "cement", "mortar", "grout"],
            MaterialKind::Drywall => &["drywall", "sheetrock", "gypsum"],
            MaterialKind::Paint => &["paint", "stain", "primer", "sealer"],
            MaterialKind::Roofing => &["shingle", "roofing", "tile", "membrane"],
            MaterialKind::Insulation => &["insulation", "foam", "fiberglass"],
        }
    }

    /// Dimension fields collected for this kind, in display order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            MaterialKind::Lumber | MaterialKind::Drywall | MaterialKind::Insulation => {
                &["thickness", "width", "length"]
            }
            MaterialKind::Pipe => &["diameter", "length"],
            MaterialKind::Concrete => &["height", "width", "length"],
            MaterialKind::Paint => &[],
            MaterialKind::Roofing => &["width", "length"],
        }
    }

    /// Purchasing unit suggested when the material has none yet.
    pub fn default_unit(&self) -> &'static str {
        match self {
            MaterialKind::Lumber => "pieces",
            MaterialKind::Pipe => "linear feet",
            MaterialKind::Concrete => "cubic yards",
            MaterialKind::Drywall => "sheets",
            MaterialKind::Paint => "gallons",
            MaterialKind::Roofing => "squares",
            MaterialKind::Insulation => "square feet",
        }
    }

    /// Case-insensitive keyword match against a material name.
    pub fn detect(name: &str) -> Option<MaterialKind> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.keywords().iter().any(|k| lower.contains(k)))
    }
}
