//! Travel factors.
//!
//! Modes are kept in a list rather than a map: the calculator evaluates
//! (and records) modes in table order.

use serde::{Deserialize, Serialize};

use super::{check_factor, normalize_key};
use crate::errors::{ConfigError, ConfigResult};

/// Keys the travel result already uses; a mode cannot share them
const RESERVED_MODE_NAMES: [&str; 2] = ["total", "errors"];

/// kg CO2e per unit of distance for one travel mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeFactor {
    pub mode: String,
    pub factor: f64,
}

impl ModeFactor {
    pub fn new(mode: impl Into<String>, factor: f64) -> Self {
        ModeFactor {
            mode: mode.into(),
            factor,
        }
    }

    /// Name of the yes/no field for this mode (e.g., `air_travel`)
    pub fn toggle_field(&self) -> String {
        format!("{}_travel", self.mode)
    }

    /// Name of the distance field for this mode (e.g., `air_distance`)
    pub fn distance_field(&self) -> String {
        format!("{}_distance", self.mode)
    }

    /// Category name under which this mode's events are recorded
    pub fn event_category(&self) -> String {
        format!("{}_travel_emissions", self.mode)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelFactors {
    pub modes: Vec<ModeFactor>,
}

impl TravelFactors {
    /// Factor for an already-normalized mode name
    pub fn factor(&self, mode: &str) -> Option<f64> {
        self.modes.iter().find(|m| m.mode == mode).map(|m| m.factor)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModeFactor> {
        self.modes.iter()
    }

    pub(crate) fn normalized(self) -> Self {
        TravelFactors {
            modes: self
                .modes
                .into_iter()
                .map(|m| ModeFactor::new(normalize_key(&m.mode), m.factor))
                .collect(),
        }
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        for (i, mode) in self.modes.iter().enumerate() {
            if mode.mode.is_empty() {
                return Err(ConfigError::invalid_table("travel", "empty mode name"));
            }
            if RESERVED_MODE_NAMES.contains(&mode.mode.as_str()) {
                return Err(ConfigError::invalid_table(
                    "travel",
                    format!("'{}' is reserved and cannot name a mode", mode.mode),
                ));
            }
            if self.modes[..i].iter().any(|m| m.mode == mode.mode) {
                return Err(ConfigError::invalid_table(
                    "travel",
                    format!("duplicate mode '{}'", mode.mode),
                ));
            }
            check_factor("travel", &mode.mode, mode.factor)?;
        }
        Ok(())
    }
}

impl Default for TravelFactors {
    fn default() -> Self {
        TravelFactors {
            modes: vec![
                ModeFactor::new("air", 0.440),
                ModeFactor::new("train", 0.072),
                ModeFactor::new("car", 0.240),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_modes_in_order() {
        let travel = TravelFactors::default();
        let modes: Vec<_> = travel.iter().map(|m| m.mode.as_str()).collect();
        assert_eq!(modes, ["air", "train", "car"]);
        assert_eq!(travel.factor("train"), Some(0.072));
        assert_eq!(travel.factor("boat"), None);
    }

    #[test]
    fn test_field_names() {
        let car = ModeFactor::new("car", 0.24);
        assert_eq!(car.toggle_field(), "car_travel");
        assert_eq!(car.distance_field(), "car_distance");
        assert_eq!(car.event_category(), "car_travel_emissions");
    }

    #[test]
    fn test_duplicate_mode_rejected() {
        let mut travel = TravelFactors::default();
        travel.modes.push(ModeFactor::new("air", 0.5));
        let err = travel.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate mode 'air'"));
    }

    #[test]
    fn test_reserved_mode_rejected() {
        let travel = TravelFactors {
            modes: vec![ModeFactor::new("total", 1.0)],
        };
        assert!(travel.validate().is_err());
    }
}
