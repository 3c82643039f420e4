//! # Home Energy Calculation
//!
//! ```text
//! electricity = electricity_bill × 0.685294118
//! gas         = gas_bill × factor(gas_meter_type)   imperial 6.4434483, metric 6.4484259
//! ```
//!
//! When `energy_usage` is no, the result is an informational message with
//! no figures. An unrecognized meter type fails the whole request.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Calculator, Computed};
use crate::errors::ValidationResult;
use crate::factors::FactorTables;
use crate::input::{Category, CategoryInput};
use crate::recorder::{NoopRecorder, ResultRecorder};
use crate::units::KgCo2e;
use crate::validation::{validate_energy, EnergyAnswers};

/// Message returned when no energy was used
pub const NO_ENERGY_MESSAGE: &str = "No emissions calculated as no energy was used.";

/// Energy emissions, or a note that none were calculated.
///
/// ## JSON Example
///
/// ```json
/// { "electricity": 68.5294118, "gas": 322.172415 }
/// ```
///
/// ```json
/// { "message": "No emissions calculated as no energy was used." }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnergyResult {
    Computed { electricity: KgCo2e, gas: KgCo2e },
    NotUsed { message: String },
}

impl EnergyResult {
    pub fn not_used() -> Self {
        EnergyResult::NotUsed {
            message: NO_ENERGY_MESSAGE.to_string(),
        }
    }

    /// Electricity plus gas; `None` when no energy was used
    pub fn total(&self) -> Option<KgCo2e> {
        match self {
            EnergyResult::Computed { electricity, gas } => Some(*electricity + *gas),
            EnergyResult::NotUsed { .. } => None,
        }
    }
}

/// Energy calculator. Never records events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyCalculator;

impl Calculator for EnergyCalculator {
    type Output = EnergyResult;

    fn category(&self) -> Category {
        Category::Energy
    }

    fn calculate(
        &self,
        input: &CategoryInput,
        tables: &FactorTables,
        _recorder: &dyn ResultRecorder,
    ) -> ValidationResult<Computed<EnergyResult>> {
        let result = match validate_energy(input, tables)? {
            EnergyAnswers::NotUsed => EnergyResult::not_used(),
            EnergyAnswers::Used {
                electricity_bill,
                electricity_factor,
                meter_type,
                gas_bill,
                gas_factor,
            } => {
                let electricity = KgCo2e::from_factor(electricity_bill, electricity_factor);
                let gas = KgCo2e::from_factor(gas_bill, gas_factor);
                info!(
                    "Energy emissions: electricity {} kg CO2e, gas ({} meter) {} kg CO2e",
                    electricity.value(),
                    meter_type,
                    gas.value()
                );
                EnergyResult::Computed { electricity, gas }
            }
        };

        Ok(Computed::new(result))
    }
}

/// Calculate energy emissions.
pub fn calculate(input: &CategoryInput, tables: &FactorTables) -> ValidationResult<EnergyResult> {
    EnergyCalculator
        .calculate(input, tables, &NoopRecorder)
        .map(|computed| computed.result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy_input(meter_type: &str) -> CategoryInput {
        CategoryInput::new()
            .with_field("energy_usage", "yes")
            .with_field("electricity_bill", 100.0)
            .with_field("gas_meter_type", meter_type)
            .with_field("gas_bill", 50.0)
    }

    #[test]
    fn test_imperial_meter() {
        let result = calculate(&energy_input("imperial"), FactorTables::standard()).unwrap();
        match result {
            EnergyResult::Computed { electricity, gas } => {
                assert!((electricity.value() - 68.5294118).abs() < 1e-9);
                assert!((gas.value() - 322.172415).abs() < 1e-9);
            }
            other => panic!("expected computed result, got {:?}", other),
        }
    }

    #[test]
    fn test_metric_meter_case_insensitive() {
        let result = calculate(&energy_input("Metric"), FactorTables::standard()).unwrap();
        let total = result.total().unwrap().value();
        // 68.5294118 + 50 × 6.4484259
        assert!((total - (68.5294118 + 322.421295)).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_meter_is_validation_failure() {
        let err = calculate(&energy_input("cubic feet"), FactorTables::standard()).unwrap_err();
        assert_eq!(err.field(), Some("gas_meter_type"));
    }

    #[test]
    fn test_no_usage_returns_message() {
        let input = CategoryInput::new().with_field("energy_usage", "NO");
        let result = calculate(&input, FactorTables::standard()).unwrap();
        assert_eq!(result, EnergyResult::not_used());
        assert!(result.total().is_none());

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"message":"No emissions calculated as no energy was used."}"#);
    }

    #[test]
    fn test_invalid_usage_token() {
        let input = CategoryInput::new().with_field("energy_usage", "sometimes");
        assert!(calculate(&input, FactorTables::standard()).is_err());
    }

    #[test]
    fn test_missing_gas_bill() {
        let input = CategoryInput::new()
            .with_field("energy_usage", "yes")
            .with_field("electricity_bill", 100.0)
            .with_field("gas_meter_type", "imperial");
        let err = calculate(&input, FactorTables::standard()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_json_roundtrip() {
        let result = calculate(&energy_input("imperial"), FactorTables::standard()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let roundtrip: EnergyResult = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, result);
    }
}
