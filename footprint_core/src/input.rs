//! # Category Input
//!
//! The raw, per-request answers a user gives for one category. Transport
//! code decodes a request body into a [`CategoryInput`]; the validator then
//! turns it into typed input for a calculator.
//!
//! Values arrive loosely typed: a toggle may be `"Yes"`, `"no"` or `true`, a
//! distance may be `1000`, `1000.5` or `"1000"`. The accessors here absorb
//! that variation and report anything else as a [`ValidationError`].
//!
//! ## Example
//!
//! ```rust
//! use footprint_core::input::{CategoryInput, Toggle};
//!
//! let input: CategoryInput = serde_json::from_str(
//!     r#"{ "air_travel": "YES", "air_distance": "1000" }"#,
//! ).unwrap();
//!
//! assert_eq!(input.toggle("air_travel").unwrap(), Toggle::Yes);
//! assert_eq!(input.number("air_distance").unwrap(), 1000.0);
//! assert!(input.toggle("train_travel").is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::factors::normalize_key;

/// The four independent computation domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Waste,
    Travel,
    Energy,
    Diet,
}

impl Category {
    /// All categories, in presentation order
    pub const ALL: [Category; 4] = [
        Category::Waste,
        Category::Travel,
        Category::Energy,
        Category::Diet,
    ];

    /// Lower-case identifier used on the wire and in config files
    pub fn code(&self) -> &'static str {
        match self {
            Category::Waste => "waste",
            Category::Travel => "travel",
            Category::Energy => "energy",
            Category::Diet => "diet",
        }
    }

    /// Parse from common string representations, including the legacy
    /// endpoint names (`calculate_travel_emissions`, ...).
    pub fn from_str_flexible(s: &str) -> ValidationResult<Self> {
        match normalize_key(s).replace([' ', '-'], "_").trim_start_matches('/') {
            "waste" | "waste_disposal" | "waste_disposal_emissions" => Ok(Category::Waste),
            "travel" | "calculate_travel_emissions" => Ok(Category::Travel),
            "energy" | "calculate_energy_emissions" => Ok(Category::Energy),
            "diet" | "calculate_diet_emissions" => Ok(Category::Diet),
            _ => Err(ValidationError::UnknownCategory {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Yes,
    No,
}

impl Toggle {
    pub const TOKENS: [&'static str; 2] = ["yes", "no"];

    /// Parse a toggle token, case-insensitively
    pub fn parse(field: &str, raw: &str) -> ValidationResult<Self> {
        match normalize_key(raw).as_str() {
            "yes" => Ok(Toggle::Yes),
            "no" => Ok(Toggle::No),
            _ => Err(ValidationError::invalid_token(field, raw, Toggle::TOKENS)),
        }
    }
}

/// One raw field value as it arrived from the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl InputValue {
    /// Render the value as a token string (booleans become `yes`/`no`)
    fn as_text(&self) -> Option<String> {
        match self {
            InputValue::Text(s) => Some(s.trim().to_string()),
            InputValue::Bool(true) => Some("yes".to_string()),
            InputValue::Bool(false) => Some("no".to_string()),
            InputValue::Number(n) => Some(n.to_string()),
            InputValue::Null => None,
        }
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Text(s)
    }
}

impl From<f64> for InputValue {
    fn from(n: f64) -> Self {
        InputValue::Number(n)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Bool(b)
    }
}

/// Flat mapping of field name to raw value, scoped to one category.
///
/// Constructed per request and discarded after the calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryInput {
    fields: BTreeMap<String, InputValue>,
}

impl CategoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<InputValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Raw value of a field; explicit nulls read as absent
    pub fn get(&self, field: &str) -> Option<&InputValue> {
        match self.fields.get(field) {
            Some(InputValue::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// True when the field is present and non-null
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Required field as trimmed text
    pub fn text(&self, field: &str) -> ValidationResult<String> {
        self.get(field)
            .and_then(InputValue::as_text)
            .ok_or_else(|| ValidationError::missing_field(field))
    }

    /// Required field as a normalized (trimmed, lower-case) lookup token
    pub fn token(&self, field: &str) -> ValidationResult<String> {
        self.text(field).map(|s| normalize_key(&s))
    }

    /// Required yes/no field
    pub fn toggle(&self, field: &str) -> ValidationResult<Toggle> {
        let raw = self.text(field)?;
        Toggle::parse(field, &raw)
    }

    /// Required non-negative, finite number. Numeric strings are accepted.
    pub fn number(&self, field: &str) -> ValidationResult<f64> {
        let value = match self.get(field) {
            None => return Err(ValidationError::missing_field(field)),
            Some(InputValue::Number(n)) => *n,
            Some(InputValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| {
                ValidationError::invalid_number(field, s.as_str(), "Not a number")
            })?,
            Some(InputValue::Bool(b)) => {
                return Err(ValidationError::invalid_number(
                    field,
                    b.to_string(),
                    "Expected a number, got a boolean",
                ))
            }
            Some(InputValue::Null) => return Err(ValidationError::missing_field(field)),
        };

        if !value.is_finite() {
            return Err(ValidationError::invalid_number(
                field,
                value.to_string(),
                "Value must be finite",
            ));
        }
        if value < 0.0 {
            return Err(ValidationError::invalid_number(
                field,
                value.to_string(),
                "Value cannot be negative",
            ));
        }
        Ok(value)
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for CategoryInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = CategoryInput::new();
        for (field, value) in iter {
            input.insert(field, value);
        }
        input
    }
}
