//! Home energy factors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{check_factor, normalize_map};
use crate::errors::ConfigResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyFactors {
    /// kg CO2e per unit of electricity bill
    pub electricity_factor: f64,
    /// Gas meter type -> kg CO2e per unit of gas bill
    pub gas_factors: BTreeMap<String, f64>,
}

impl EnergyFactors {
    /// Gas factor for an already-normalized meter type
    pub fn gas_factor(&self, meter_type: &str) -> Option<f64> {
        self.gas_factors.get(meter_type).copied()
    }

    pub fn meter_types(&self) -> impl Iterator<Item = &str> {
        self.gas_factors.keys().map(String::as_str)
    }

    pub(crate) fn normalized(self) -> Self {
        EnergyFactors {
            electricity_factor: self.electricity_factor,
            gas_factors: normalize_map(self.gas_factors),
        }
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        check_factor("energy", "electricity_factor", self.electricity_factor)?;
        for (meter_type, factor) in &self.gas_factors {
            check_factor("energy", meter_type, *factor)?;
        }
        Ok(())
    }
}

impl Default for EnergyFactors {
    fn default() -> Self {
        EnergyFactors {
            electricity_factor: 0.685294118,
            gas_factors: BTreeMap::from([
                ("imperial".to_string(), 6.4434483),
                ("metric".to_string(), 6.4484259),
            ]),
        }
    }
}
