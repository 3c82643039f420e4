//! # Travel Calculation
//!
//! Each mode in the travel table (air, train, car) is an independent
//! sub-calculation:
//!
//! ```text
//! <mode>_travel = yes  →  emissions = <mode>_distance × factor(mode)
//! <mode>_travel = no   →  emissions = 0
//! total = Σ emissions
//! ```
//!
//! A mode with a bad toggle or distance lands in `errors` without
//! affecting the other modes. Modes missing from the request are left out.
//!
//! Every yes/no mode produces one recorder event, in table order, named
//! `<mode>_travel_emissions`. A "no" mode records input 0 and output 0.
//!
//! ## JSON Example
//!
//! ```json
//! { "air": 440.0, "train": 0.0, "total": 440.0 }
//! ```
//!
//! With a bad mode:
//!
//! ```json
//! {
//!   "air": 440.0,
//!   "total": 440.0,
//!   "errors": {
//!     "car": { "type": "MissingField", "details": { "field": "car_distance" } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Calculator, Computed};
use crate::errors::{ValidationError, ValidationResult};
use crate::factors::FactorTables;
use crate::input::{Category, CategoryInput};
use crate::recorder::ResultRecorder;
use crate::units::KgCo2e;
use crate::validation::{validate_travel, ModeAnswer};

/// Per-mode breakdown, total, and per-mode validation failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelResult {
    /// Mode -> emissions, for every mode answered yes or no
    #[serde(flatten)]
    pub modes: BTreeMap<String, KgCo2e>,

    /// Sum of all mode emissions
    pub total: KgCo2e,

    /// Mode -> why it could not be computed
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, ValidationError>,
}

impl TravelResult {
    /// Emissions for one mode, if it was computed
    pub fn mode(&self, mode: &str) -> Option<f64> {
        self.modes.get(mode).map(|kg| kg.value())
    }

    /// True when no mode failed validation
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Travel calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelCalculator;

impl Calculator for TravelCalculator {
    type Output = TravelResult;

    fn category(&self) -> Category {
        Category::Travel
    }

    fn calculate(
        &self,
        input: &CategoryInput,
        tables: &FactorTables,
        recorder: &dyn ResultRecorder,
    ) -> ValidationResult<Computed<TravelResult>> {
        let selections = validate_travel(input, tables)?;
        let mut computed = Computed::new(TravelResult::default());

        for selection in selections {
            let mode = selection.mode;
            match selection.answer {
                ModeAnswer::Yes { distance } => {
                    let emissions = KgCo2e::from_factor(distance, mode.factor);
                    computed.result.modes.insert(mode.mode.clone(), emissions);
                    // Running total in table order
                    computed.result.total = computed.result.total + emissions;
                    computed.record(recorder, &mode.event_category(), distance, emissions);
                }
                ModeAnswer::No => {
                    computed.result.modes.insert(mode.mode.clone(), KgCo2e::ZERO);
                    computed.record(recorder, &mode.event_category(), 0.0, KgCo2e::ZERO);
                }
                ModeAnswer::Invalid(err) => {
                    warn!("Travel mode {} rejected: {}", mode.mode, err);
                    computed.result.errors.insert(mode.mode.clone(), err);
                }
            }
        }

        info!(
            "Travel emissions: {} kg CO2e across {} mode(s), {} rejected",
            computed.result.total.value(),
            computed.result.modes.len(),
            computed.result.errors.len()
        );

        Ok(computed)
    }
}
