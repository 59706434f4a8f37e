//! Calibration constants for unit normalization and window defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable thresholds and fallback values used by the thermal core.
///
/// Every call site reads its constants from one instance of this struct, so
/// the millimeter heuristic and window defaults cannot drift apart between
/// element families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermalConfig {
    /// Plain numbers strictly above this are read as millimeters.
    pub length_mm_threshold: f64,
    /// Frame conductivity (W/mK) when the frame material has none.
    pub frame_conductivity: f64,
    /// Frame thickness (m) when the frame material name carries none.
    pub frame_thickness: f64,
    /// Glass U-value (W/m²K) when the glazing conductivity is missing or implausible.
    pub glass_u: f64,
    /// Exclusive lower bound of plausible glazing values.
    pub glass_u_min: f64,
    /// Exclusive upper bound of plausible glazing values.
    pub glass_u_max: f64,
    /// Share of the window area assigned to the frame when no frame width is known.
    pub frame_area_fraction: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            length_mm_threshold: 10.0,
            frame_conductivity: 0.17,
            frame_thickness: 0.07,
            glass_u: 1.2,
            glass_u_min: 0.1,
            glass_u_max: 3.5,
            frame_area_fraction: 0.15,
        }
    }
}

impl ThermalConfig {
    /// Loads a TOML configuration file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::FileRead {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make the calculator produce nonsense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("length_mm_threshold", self.length_mm_threshold),
            ("frame_conductivity", self.frame_conductivity),
            ("frame_thickness", self.frame_thickness),
            ("glass_u", self.glass_u),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: format!("must be a positive number, got {value}"),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.frame_area_fraction) {
            return Err(ConfigError::InvalidValue {
                field: "frame_area_fraction",
                message: format!("must lie in [0, 1], got {}", self.frame_area_fraction),
            });
        }

        if self.glass_u_min >= self.glass_u_max {
            return Err(ConfigError::InvalidValue {
                field: "glass_u_min",
                message: format!(
                    "band {}..{} is empty",
                    self.glass_u_min, self.glass_u_max
                ),
            });
        }

        Ok(())
    }
}
