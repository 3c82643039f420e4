//! # footprint_core - Personal Emissions Calculation Engine
//!
//! `footprint_core` estimates a person's greenhouse-gas emissions from
//! self-reported answers in four categories: waste disposal, travel, home
//! energy and diet. Answers are mapped to kg CO2e through fixed, versioned
//! factor tables. All inputs and outputs are JSON-serializable, so any
//! transport (CLI, HTTP) can sit in front of it.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Calculators are pure apart from an explicit recorder
//! - **Injected data**: Factor tables are an immutable value passed in, not globals
//! - **Rich Errors**: Validation failures name the field and the accepted values
//! - **Best-effort recording**: A failed event append never discards a result
//!
//! ## Quick Start
//!
//! ```rust
//! use footprint_core::{Category, CategoryInput, Engine};
//!
//! let engine = Engine::standard();
//! let input = CategoryInput::new()
//!     .with_field("energy_usage", "yes")
//!     .with_field("electricity_bill", 100.0)
//!     .with_field("gas_meter_type", "imperial")
//!     .with_field("gas_bill", 50.0);
//!
//! let computed = engine.calculate(Category::Energy, &input).unwrap();
//! let json = serde_json::to_string(&computed.result).unwrap();
//! assert!(json.contains("\"electricity\""));
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Entry point: dispatches a category request to its calculator
//! - [`calculations`] - The four category calculators
//! - [`validation`] - Input checks that run before any computation
//! - [`factors`] - Factor tables and their TOML format
//! - [`input`] - Raw per-request input and categories
//! - [`recorder`] - Append-only computed event log
//! - [`config`] - Engine configuration
//! - [`units`] - kg CO2e newtype
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod engine;
pub mod errors;
pub mod factors;
pub mod input;
pub mod recorder;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{Calculator, Computed, EmissionResult, EnergyResult, ScalarEmissions, TravelResult};
pub use config::{EngineConfig, UnknownKeyPolicy};
pub use engine::Engine;
pub use errors::{FootprintError, FootprintResult, StorageError, ValidationError, ValidationResult};
pub use factors::FactorTables;
pub use input::{Category, CategoryInput, InputValue, Toggle};
pub use recorder::{ComputedEvent, EventLog, MemoryRecorder, NoopRecorder, ResultRecorder};
pub use units::KgCo2e;
