//! # Waste Disposal Calculation
//!
//! ```text
//! emissions = weight(age_group) × 0.700   if generated_waste = yes
//!           = 0                          otherwise
//! ```
//!
//! ## Example
//!
//! ```rust
//! use footprint_core::calculations::waste;
//! use footprint_core::config::UnknownKeyPolicy;
//! use footprint_core::factors::FactorTables;
//! use footprint_core::input::CategoryInput;
//!
//! let input = CategoryInput::new()
//!     .with_field("age_group", "31 to 50")
//!     .with_field("generated_waste", "yes");
//!
//! let result = waste::calculate(&input, FactorTables::standard(), UnknownKeyPolicy::Error).unwrap();
//! assert!((result.value() - 25.2).abs() < 1e-9);
//! ```

use tracing::info;

use super::{Calculator, Computed, ScalarEmissions};
use crate::config::UnknownKeyPolicy;
use crate::errors::ValidationResult;
use crate::factors::FactorTables;
use crate::input::{Category, CategoryInput, Toggle};
use crate::recorder::{NoopRecorder, ResultRecorder};
use crate::units::KgCo2e;
use crate::validation::validate_waste;

/// Event category for recorded waste calculations
pub const WASTE_EVENT: &str = "waste_disposal_emissions";

pub type WasteResult = ScalarEmissions;

/// Waste disposal calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct WasteCalculator {
    /// What to do with an age group missing from the table
    pub on_unknown_key: UnknownKeyPolicy,
}

impl WasteCalculator {
    pub fn new(on_unknown_key: UnknownKeyPolicy) -> Self {
        WasteCalculator { on_unknown_key }
    }
}

impl Calculator for WasteCalculator {
    type Output = WasteResult;

    fn category(&self) -> Category {
        Category::Waste
    }

    fn calculate(
        &self,
        input: &CategoryInput,
        tables: &FactorTables,
        recorder: &dyn ResultRecorder,
    ) -> ValidationResult<Computed<WasteResult>> {
        let answers = validate_waste(input, tables, self.on_unknown_key)?;

        let emissions = match answers.generated_waste {
            Toggle::Yes => KgCo2e::from_factor(answers.weight, answers.emission_factor),
            Toggle::No => KgCo2e::ZERO,
        };
        info!(
            "Waste emissions for age group {:?}: {} kg CO2e",
            answers.age_group, emissions.value()
        );

        let mut computed = Computed::new(ScalarEmissions::new(emissions));
        computed.record(recorder, WASTE_EVENT, answers.weight, emissions);
        Ok(computed)
    }
}

/// Calculate waste emissions without recording.
pub fn calculate(
    input: &CategoryInput,
    tables: &FactorTables,
    on_unknown_key: UnknownKeyPolicy,
) -> ValidationResult<WasteResult> {
    WasteCalculator::new(on_unknown_key)
        .calculate(input, tables, &NoopRecorder)
        .map(|computed| computed.result)
}
