//! Calculator settings persisted as JSON.

use crate::area::AreaMethod;
use crate::units::Unit;

/// Settings a calculator session starts with.
///
/// Missing keys fall back to their defaults, so a partial file such as
/// `{"default_unit": "acres"}` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Unit new sessions display and save in.
    pub default_unit: Unit,
    /// Method used for polygon and rectangle areas.
    pub method: AreaMethod,
}

impl CalculatorConfig {
    pub fn new(default_unit: Unit, method: AreaMethod) -> Self {
        Self {
            default_unit,
            method,
        }
    }

    /// Saves the settings to a JSON file.
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: &str) -> std::io::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: CalculatorConfig = serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }
}
