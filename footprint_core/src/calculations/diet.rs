//! # Diet Calculation
//!
//! ```text
//! emissions = caloric_baseline[age_category][gender] × conversion_factor[diet_type]
//! ```
//!
//! Every key must match the tables; there are no defaults.
//!
//! ## Example
//!
//! ```rust
//! use footprint_core::calculations::diet;
//! use footprint_core::factors::FactorTables;
//! use footprint_core::input::CategoryInput;
//!
//! let input = CategoryInput::new()
//!     .with_field("age_category", "19-30")
//!     .with_field("gender", "male")
//!     .with_field("diet_type", "vegan");
//!
//! // 80400 × 0.00069
//! let result = diet::calculate(&input, FactorTables::standard()).unwrap();
//! assert!((result.value() - 55.476).abs() < 1e-9);
//! ```

use tracing::info;

use super::{Calculator, Computed, ScalarEmissions};
use crate::errors::ValidationResult;
use crate::factors::FactorTables;
use crate::input::{Category, CategoryInput};
use crate::recorder::{NoopRecorder, ResultRecorder};
use crate::units::KgCo2e;
use crate::validation::validate_diet;

pub type DietResult = ScalarEmissions;

/// Diet calculator.
///
/// Records `<diet_type>_emissions` with the caloric baseline as input.
#[derive(Debug, Clone, Copy, Default)]
pub struct DietCalculator;

impl Calculator for DietCalculator {
    type Output = DietResult;

    fn category(&self) -> Category {
        Category::Diet
    }

    fn calculate(
        &self,
        input: &CategoryInput,
        tables: &FactorTables,
        recorder: &dyn ResultRecorder,
    ) -> ValidationResult<Computed<DietResult>> {
        let answers = validate_diet(input, tables)?;
        let emissions = KgCo2e::from_factor(answers.caloric_baseline, answers.conversion_factor);
        info!(
            "Diet emissions for {} {} ({}): {} kg CO2e",
            answers.age_category,
            answers.gender,
            answers.diet_type,
            emissions.value()
        );

        let mut computed = Computed::new(ScalarEmissions::new(emissions));
        computed.record(
            recorder,
            &format!("{}_emissions", answers.diet_type),
            answers.caloric_baseline,
            emissions,
        );
        Ok(computed)
    }
}

/// Calculate diet emissions without recording.
pub fn calculate(input: &CategoryInput, tables: &FactorTables) -> ValidationResult<DietResult> {
    DietCalculator
        .calculate(input, tables, &NoopRecorder)
        .map(|computed| computed.result)
}
