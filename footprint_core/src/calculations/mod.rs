//! # Category Calculations
//!
//! One calculator per category. Each follows the pattern:
//!
//! - validate the raw [`CategoryInput`] against the factor tables
//!   (see [`crate::validation`])
//! - multiply the resolved quantities by their factors
//! - optionally hand each sub-result to a [`ResultRecorder`]
//!
//! All four share the [`Calculator`] trait, so persistence is an explicit
//! capability passed in by the caller. Pass [`NoopRecorder`] for a pure
//! calculation.
//!
//! ## Available Calculations
//!
//! - [`waste`] - waste disposal by age group
//! - [`travel`] - air, train and car travel, per mode with a total
//! - [`energy`] - electricity and gas bills
//! - [`diet`] - caloric baseline by age and gender, times a diet factor
//!
//! [`NoopRecorder`]: crate::recorder::NoopRecorder

pub mod diet;
pub mod energy;
pub mod travel;
pub mod waste;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{StorageError, ValidationResult};
use crate::factors::FactorTables;
use crate::input::{Category, CategoryInput};
use crate::recorder::ResultRecorder;
use crate::units::KgCo2e;

// Re-export commonly used types
pub use diet::DietCalculator;
pub use energy::{EnergyCalculator, EnergyResult};
pub use travel::{TravelCalculator, TravelResult};
pub use waste::WasteCalculator;

/// A category calculator.
///
/// Implementations are stateless apart from their own settings; the same
/// input and tables always produce the same figures.
pub trait Calculator {
    type Output;

    fn category(&self) -> Category;

    /// Validate `input` and compute its emissions.
    ///
    /// A [`ValidationError`](crate::errors::ValidationError) means nothing was
    /// computed or recorded. Recorder failures do not fail the calculation;
    /// they come back in [`Computed::storage_errors`].
    fn calculate(
        &self,
        input: &CategoryInput,
        tables: &FactorTables,
        recorder: &dyn ResultRecorder,
    ) -> ValidationResult<Computed<Self::Output>>;
}

/// A calculation result plus any recorder failures that happened along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed<T> {
    pub result: T,
    pub storage_errors: Vec<StorageError>,
}

impl<T> Computed<T> {
    pub fn new(result: T) -> Self {
        Computed {
            result,
            storage_errors: Vec::new(),
        }
    }

    /// Send one event to the recorder, keeping any failure.
    pub(crate) fn record(
        &mut self,
        recorder: &dyn ResultRecorder,
        category: &str,
        input_value: f64,
        output: KgCo2e,
    ) {
        if let Err(err) = recorder.record(category, input_value, output.value()) {
            warn!("Failed to record {} event: {}", category, err);
            self.storage_errors.push(err);
        }
    }

    /// True when every event reached the recorder
    pub fn fully_recorded(&self) -> bool {
        self.storage_errors.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Computed<U> {
        Computed {
            result: f(self.result),
            storage_errors: self.storage_errors,
        }
    }
}

/// A single emissions figure (waste and diet).
///
/// ## JSON Example
///
/// ```json
/// { "emissions": 25.2 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarEmissions {
    pub emissions: KgCo2e,
}

impl ScalarEmissions {
    pub fn new(emissions: KgCo2e) -> Self {
        ScalarEmissions { emissions }
    }

    pub fn value(&self) -> f64 {
        self.emissions.value()
    }
}

/// Output of any calculator.
///
/// Serializes as the bare category result, so the JSON matches what each
/// category endpoint returns on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EmissionResult {
    Waste(ScalarEmissions),
    Travel(TravelResult),
    Energy(EnergyResult),
    Diet(ScalarEmissions),
}

impl EmissionResult {
    pub fn category(&self) -> Category {
        match self {
            EmissionResult::Waste(_) => Category::Waste,
            EmissionResult::Travel(_) => Category::Travel,
            EmissionResult::Energy(_) => Category::Energy,
            EmissionResult::Diet(_) => Category::Diet,
        }
    }

    /// Overall figure for the result, if it has one.
    ///
    /// Energy sums electricity and gas; an unused-energy result has none.
    pub fn total(&self) -> Option<KgCo2e> {
        match self {
            EmissionResult::Waste(r) | EmissionResult::Diet(r) => Some(r.emissions),
            EmissionResult::Travel(r) => Some(r.total),
            EmissionResult::Energy(r) => r.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageResult;

    struct BrokenRecorder;

    impl ResultRecorder for BrokenRecorder {
        fn record(&self, _: &str, _: f64, _: f64) -> StorageResult<()> {
            Err(StorageError::Unavailable {
                reason: "disk full".to_string(),
            })
        }
    }

    #[test]
    fn test_computed_keeps_storage_errors() {
        let mut computed = Computed::new(ScalarEmissions::new(KgCo2e(1.0)));
        computed.record(&BrokenRecorder, "waste_disposal_emissions", 1.0, KgCo2e(0.7));
        assert!(!computed.fully_recorded());
        assert_eq!(computed.result.value(), 1.0);
    }

    #[test]
    fn test_scalar_json_shape() {
        let result = EmissionResult::Diet(ScalarEmissions::new(KgCo2e(55.476)));
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"emissions":55.476}"#);
        assert_eq!(result.category(), Category::Diet);
    }
}
