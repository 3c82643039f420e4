//! Diet factors.
//!
//! A caloric baseline per (age category, gender) cell, multiplied by a
//! per-diet conversion factor.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{check_factor, normalize_key, normalize_map};
use crate::errors::{ConfigError, ConfigResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietFactors {
    /// Age category -> gender -> caloric baseline
    pub caloric_baselines: BTreeMap<String, BTreeMap<String, f64>>,
    /// Diet type -> kg CO2e per calorie
    pub conversion_factors: BTreeMap<String, f64>,
}

impl DietFactors {
    /// Baseline for already-normalized age category and gender keys
    pub fn baseline(&self, age_category: &str, gender: &str) -> Option<f64> {
        self.caloric_baselines
            .get(age_category)
            .and_then(|row| row.get(gender))
            .copied()
    }

    pub fn conversion_factor(&self, diet_type: &str) -> Option<f64> {
        self.conversion_factors.get(diet_type).copied()
    }

    pub fn age_categories(&self) -> impl Iterator<Item = &str> {
        self.caloric_baselines.keys().map(String::as_str)
    }

    /// Every gender that appears in the baseline table
    pub fn genders(&self) -> BTreeSet<&str> {
        self.caloric_baselines
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    pub fn diet_types(&self) -> impl Iterator<Item = &str> {
        self.conversion_factors.keys().map(String::as_str)
    }

    pub(crate) fn normalized(self) -> Self {
        DietFactors {
            caloric_baselines: self
                .caloric_baselines
                .into_iter()
                .map(|(age, row)| (normalize_key(&age), normalize_map(row)))
                .collect(),
            conversion_factors: normalize_map(self.conversion_factors),
        }
    }

    /// Every age category must define a baseline for every gender
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        let genders = self.genders();
        for (age, row) in &self.caloric_baselines {
            let row_genders: BTreeSet<&str> = row.keys().map(String::as_str).collect();
            if row_genders != genders {
                return Err(ConfigError::invalid_table(
                    "diet",
                    format!("age category '{}' does not cover every gender", age),
                ));
            }
            for (gender, baseline) in row {
                check_factor("diet", &format!("{}/{}", age, gender), *baseline)?;
            }
        }
        for (diet_type, factor) in &self.conversion_factors {
            check_factor("diet", diet_type, *factor)?;
        }
        Ok(())
    }
}

fn row(male: f64, female: f64) -> BTreeMap<String, f64> {
    BTreeMap::from([("male".to_string(), male), ("female".to_string(), female)])
}

impl Default for DietFactors {
    fn default() -> Self {
        DietFactors {
            caloric_baselines: BTreeMap::from([
                ("18 and below".to_string(), row(72000.0, 58500.0)),
                ("19-30".to_string(), row(80400.0, 62400.0)),
                ("31-50".to_string(), row(77000.0, 60000.0)),
                ("51 and above".to_string(), row(70000.0, 55000.0)),
            ]),
            conversion_factors: BTreeMap::from([
                ("vegan".to_string(), 0.00069),
                ("vegetarian".to_string(), 0.00116),
                ("omnivorous".to_string(), 0.00223),
                ("pescetarian".to_string(), 0.00166),
                ("paleo".to_string(), 0.00262),
                ("keto".to_string(), 0.00291),
            ]),
        }
    }
}
