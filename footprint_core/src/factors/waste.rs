//! Waste disposal factors.
//!
//! Each age group maps to a weekly-equivalent waste weight. A single
//! emission factor converts that weight to kg CO2e for every age group.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{check_factor, normalize_map};
use crate::errors::ConfigResult;

/// Emission factor applied to every waste weight
pub const WASTE_EMISSION_FACTOR: f64 = 0.700;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteFactors {
    /// kg CO2e per unit of waste weight
    pub emission_factor: f64,
    /// Age group -> waste weight
    pub age_groups: BTreeMap<String, f64>,
}

impl WasteFactors {
    /// Waste weight for an already-normalized age group key
    pub fn weight(&self, age_group: &str) -> Option<f64> {
        self.age_groups.get(age_group).copied()
    }

    /// Accepted age group tokens
    pub fn age_group_keys(&self) -> impl Iterator<Item = &str> {
        self.age_groups.keys().map(String::as_str)
    }

    pub(crate) fn normalized(self) -> Self {
        WasteFactors {
            emission_factor: self.emission_factor,
            age_groups: normalize_map(self.age_groups),
        }
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        check_factor("waste", "emission_factor", self.emission_factor)?;
        for (age_group, weight) in &self.age_groups {
            check_factor("waste", age_group, *weight)?;
        }
        Ok(())
    }
}

impl Default for WasteFactors {
    fn default() -> Self {
        WasteFactors {
            emission_factor: WASTE_EMISSION_FACTOR,
            age_groups: BTreeMap::from([
                ("below 18 to 30".to_string(), 30.0),
                ("31 to 50".to_string(), 36.0),
                ("51 and above".to_string(), 24.0),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_weights() {
        let waste = WasteFactors::default();
        assert_eq!(waste.weight("31 to 50"), Some(36.0));
        assert_eq!(waste.weight("below 18 to 30"), Some(30.0));
        assert_eq!(waste.weight("51 and above"), Some(24.0));
        assert_eq!(waste.weight("31 To 50"), None);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut waste = WasteFactors::default();
        waste.age_groups.insert("ghost".to_string(), -1.0);
        assert!(waste.validate().is_err());
    }
}
