//! # Factor Tables
//!
//! Versioned lookup data that turns user answers into emissions. One table
//! per category:
//!
//! | Table  | Key                       | Value                           |
//! |--------|---------------------------|---------------------------------|
//! | waste  | age group                 | waste weight (x 0.700 factor)   |
//! | travel | mode (air, train, car)    | kg CO2e per distance unit       |
//! | energy | gas meter type            | kg CO2e per gas bill unit       |
//! | diet   | age category x gender     | caloric baseline                |
//! | diet   | diet type                 | kg CO2e per calorie             |
//!
//! Tables are immutable once built. Every key is normalized to trimmed
//! lower case, and lookups must use [`normalize_key`] on user input first.
//!
//! The built-in tables are shared process-wide through [`FactorTables::standard`].
//! Alternate tables (for tests, or a newer data release) can be loaded from
//! TOML and passed to the calculators instead.
//!
//! ## Example
//!
//! ```rust
//! use footprint_core::factors::FactorTables;
//!
//! let tables = FactorTables::standard();
//! assert_eq!(tables.travel.factor("air"), Some(0.440));
//! assert_eq!(tables.diet.baseline("19-30", "male"), Some(80400.0));
//! ```

pub mod diet;
pub mod energy;
pub mod travel;
pub mod waste;

pub use diet::DietFactors;
pub use energy::EnergyFactors;
pub use travel::{ModeFactor, TravelFactors};
pub use waste::{WasteFactors, WASTE_EMISSION_FACTOR};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{ConfigError, ConfigResult};

/// Version tag of the built-in tables
pub const STANDARD_TABLES_VERSION: &str = "1.0.0";

static STANDARD_TABLES: Lazy<FactorTables> = Lazy::new(FactorTables::default);

/// Normalize a lookup key: trimmed, lower case.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

fn normalize_map(map: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    map.into_iter().map(|(k, v)| (normalize_key(&k), v)).collect()
}

/// Factors must be finite and non-negative so that no result can go negative.
fn check_factor(table: &str, key: &str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid_table(
            table,
            format!("'{}' has invalid factor {}", key, value),
        ));
    }
    Ok(())
}

/// All four category tables plus a version tag.
///
/// ## TOML Format
///
/// ```toml
/// version = "2.0.0"
///
/// [waste]
/// emission_factor = 0.7
/// age_groups = { "below 18 to 30" = 30, "31 to 50" = 36, "51 and above" = 24 }
///
/// [[travel.modes]]
/// mode = "air"
/// factor = 0.44
///
/// [energy]
/// electricity_factor = 0.685294118
/// gas_factors = { imperial = 6.4434483, metric = 6.4484259 }
///
/// [diet.caloric_baselines]
/// "19-30" = { male = 80400, female = 62400 }
///
/// [diet.conversion_factors]
/// vegan = 0.00069
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTables {
    /// Data release these factors come from
    pub version: String,
    pub waste: WasteFactors,
    pub travel: TravelFactors,
    pub energy: EnergyFactors,
    pub diet: DietFactors,
}

impl FactorTables {
    /// The built-in tables, initialized on first use and shared read-only.
    pub fn standard() -> &'static FactorTables {
        &STANDARD_TABLES
    }

    /// Parse tables from TOML text, normalizing keys and validating factors.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let tables: FactorTables = toml::from_str(source).map_err(|e| ConfigError::ParseError {
            source_name: "factor tables".to_string(),
            reason: e.to_string(),
        })?;
        let tables = tables.normalized();
        tables.validate()?;
        Ok(tables)
    }

    /// Load tables from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        debug!("Loading factor tables from {}", path.display());
        let source = fs::read_to_string(path).map_err(|e| ConfigError::FileError {
            operation: "read".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let tables = Self::from_toml_str(&source)?;
        info!("Loaded factor tables version {} from {}", tables.version, path.display());
        Ok(tables)
    }

    /// Serialize to TOML, e.g. to seed an override file
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            source_name: "factor tables".to_string(),
            reason: e.to_string(),
        })
    }

    fn normalized(self) -> Self {
        FactorTables {
            version: self.version,
            waste: self.waste.normalized(),
            travel: self.travel.normalized(),
            energy: self.energy.normalized(),
            diet: self.diet.normalized(),
        }
    }

    /// Check structural rules across all tables
    pub fn validate(&self) -> ConfigResult<()> {
        self.waste.validate()?;
        self.travel.validate()?;
        self.energy.validate()?;
        self.diet.validate()
    }
}

impl Default for FactorTables {
    fn default() -> Self {
        FactorTables {
            version: STANDARD_TABLES_VERSION.to_string(),
            waste: WasteFactors::default(),
            travel: TravelFactors::default(),
            energy: EnergyFactors::default(),
            diet: DietFactors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_are_valid() {
        let tables = FactorTables::standard();
        assert_eq!(tables.version, STANDARD_TABLES_VERSION);
        assert!(tables.validate().is_ok());
    }

    #[test]
    fn test_standard_tables_are_shared() {
        assert!(std::ptr::eq(FactorTables::standard(), FactorTables::standard()));
    }

    #[test]
    fn test_toml_keys_are_normalized() {
        let source = r#"
            version = "test"

            [waste]
            emission_factor = 1.0
            age_groups = { "Everyone" = 10 }

            [[travel.modes]]
            mode = " Bike "
            factor = 0.0

            [energy]
            electricity_factor = 1.0
            gas_factors = { IMPERIAL = 2.0 }

            [diet.caloric_baselines]
            "Adult" = { Male = 100, Female = 90 }

            [diet.conversion_factors]
            Vegan = 0.5
        "#;

        let tables = FactorTables::from_toml_str(source).unwrap();
        assert_eq!(tables.waste.weight("everyone"), Some(10.0));
        assert_eq!(tables.travel.factor("bike"), Some(0.0));
        assert_eq!(tables.energy.gas_factor("imperial"), Some(2.0));
        assert_eq!(tables.diet.baseline("adult", "female"), Some(90.0));
        assert_eq!(tables.diet.conversion_factor("vegan"), Some(0.5));
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml = FactorTables::standard().to_toml_string().unwrap();
        let parsed = FactorTables::from_toml_str(&toml).unwrap();
        assert_eq!(&parsed, FactorTables::standard());
    }

    #[test]
    fn test_negative_factor_rejected() {
        let mut tables = FactorTables::default();
        tables.energy.electricity_factor = -0.1;
        let err = tables.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTable { ref table, .. } if table == "energy"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = FactorTables::from_toml_str("version = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Below 18 TO 30 "), "below 18 to 30");
    }
}
