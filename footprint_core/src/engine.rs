//! # Engine
//!
//! Ties factor tables, configuration and a recorder together and dispatches
//! a request to the right calculator. This is the entry point transport code
//! (the CLI, an HTTP handler) should use.
//!
//! The engine holds no per-request state. It can be shared across threads
//! and called concurrently; the recorder is the only shared resource.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use footprint_core::engine::Engine;
//! use footprint_core::input::{Category, CategoryInput};
//! use footprint_core::recorder::MemoryRecorder;
//!
//! let recorder = Arc::new(MemoryRecorder::new());
//! let engine = Engine::standard().with_recorder(recorder.clone());
//!
//! let input = CategoryInput::new()
//!     .with_field("air_travel", "yes")
//!     .with_field("air_distance", 1000.0)
//!     .with_field("train_travel", "no");
//!
//! let computed = engine.calculate(Category::Travel, &input).unwrap();
//! assert_eq!(computed.result.total().unwrap().value(), 440.0);
//! assert_eq!(recorder.len(), 2);
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::calculations::{
    Calculator, Computed, DietCalculator, EmissionResult, EnergyCalculator, TravelCalculator,
    WasteCalculator,
};
use crate::config::EngineConfig;
use crate::errors::{ConfigResult, FootprintResult, ValidationResult};
use crate::factors::FactorTables;
use crate::input::{Category, CategoryInput};
use crate::recorder::{EventLog, NoopRecorder, ResultRecorder};

/// Emissions computation engine.
#[derive(Clone)]
pub struct Engine {
    tables: Arc<FactorTables>,
    config: EngineConfig,
    recorder: Arc<dyn ResultRecorder>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("tables_version", &self.tables.version)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(tables: Arc<FactorTables>, config: EngineConfig, recorder: Arc<dyn ResultRecorder>) -> Self {
        Engine {
            tables,
            config,
            recorder,
        }
    }

    /// Built-in tables, default config, no recording.
    pub fn standard() -> Self {
        Engine::new(
            Arc::new(FactorTables::standard().clone()),
            EngineConfig::default(),
            Arc::new(NoopRecorder),
        )
    }

    /// Build an engine from configuration, loading the factor table override
    /// and opening the event log if they are set.
    pub fn from_config(config: EngineConfig) -> FootprintResult<Self> {
        let tables = Self::load_tables(&config)?;

        let recorder: Arc<dyn ResultRecorder> = match &config.event_log {
            Some(path) => Arc::new(EventLog::open(path)?),
            None => Arc::new(NoopRecorder),
        };

        info!(
            "Engine ready: factor tables {}, recording {:?}",
            tables.version, config.record_categories
        );
        Ok(Engine::new(tables, config, recorder))
    }

    fn load_tables(config: &EngineConfig) -> ConfigResult<Arc<FactorTables>> {
        match &config.factor_tables {
            Some(path) => FactorTables::load(path).map(Arc::new),
            None => Ok(Arc::new(FactorTables::standard().clone())),
        }
    }

    /// Replace the recorder
    pub fn with_recorder(mut self, recorder: Arc<dyn ResultRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn tables(&self) -> &FactorTables {
        &self.tables
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The recorder a calculation in `category` should write to
    fn recorder_for(&self, category: Category) -> &dyn ResultRecorder {
        if self.config.records(category) {
            self.recorder.as_ref()
        } else {
            &NoopRecorder
        }
    }

    /// Validate and compute one category's emissions.
    pub fn calculate(&self, category: Category, input: &CategoryInput) -> ValidationResult<Computed<EmissionResult>> {
        debug!("Calculating {} emissions from {} field(s)", category, input.len());
        let recorder = self.recorder_for(category);
        let tables = self.tables.as_ref();

        let outcome = match category {
            Category::Waste => WasteCalculator::new(self.config.on_unknown_key)
                .calculate(input, tables, recorder)
                .map(|c| c.map(EmissionResult::Waste)),
            Category::Travel => TravelCalculator
                .calculate(input, tables, recorder)
                .map(|c| c.map(EmissionResult::Travel)),
            Category::Energy => EnergyCalculator
                .calculate(input, tables, recorder)
                .map(|c| c.map(EmissionResult::Energy)),
            Category::Diet => DietCalculator
                .calculate(input, tables, recorder)
                .map(|c| c.map(EmissionResult::Diet)),
        };

        if let Err(err) = &outcome {
            warn!("Rejected {} request: {}", category, err);
        }
        outcome
    }

    /// Like [`Engine::calculate`], with the category given by name.
    pub fn calculate_named(&self, category: &str, input: &CategoryInput) -> ValidationResult<Computed<EmissionResult>> {
        self.calculate(Category::from_str_flexible(category)?, input)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::standard()
    }
}
