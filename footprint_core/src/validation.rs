//! # Input Validation
//!
//! Turns a raw [`CategoryInput`] into typed answers for one calculator.
//! Validators check that every field the calculator reads is present, that
//! enumerated fields match a key of the relevant factor table
//! (case-insensitively), and that numeric fields are non-negative numbers.
//! The factor values are resolved here, so calculators only multiply.
//!
//! Waste, energy and diet validate all-or-nothing: the first bad field
//! rejects the whole request. Travel validates each mode on its own and
//! reports a per-mode outcome, so one bad mode never blocks the others.

use tracing::{debug, warn};

use crate::config::UnknownKeyPolicy;
use crate::errors::{ValidationError, ValidationResult};
use crate::factors::{normalize_key, FactorTables, ModeFactor};
use crate::input::{CategoryInput, Toggle};

pub mod fields {
    pub const AGE_GROUP: &str = "age_group";
    pub const GENERATED_WASTE: &str = "generated_waste";

    pub const ENERGY_USAGE: &str = "energy_usage";
    pub const ELECTRICITY_BILL: &str = "electricity_bill";
    pub const GAS_METER_TYPE: &str = "gas_meter_type";
    pub const GAS_BILL: &str = "gas_bill";

    pub const AGE_CATEGORY: &str = "age_category";
    pub const GENDER: &str = "gender";
    pub const DIET_TYPE: &str = "diet_type";
}

/// Read `field` and look up its normalized token, or fail with the accepted
/// token set. Errors carry the value as the caller sent it.
fn lookup<'a, F, K>(input: &CategoryInput, field: &str, get: F, accepted: K) -> ValidationResult<(String, f64)>
where
    F: FnOnce(&str) -> Option<f64>,
    K: IntoIterator<Item = &'a str>,
{
    let raw = input.text(field)?;
    let token = normalize_key(&raw);
    match get(&token) {
        Some(value) => Ok((token, value)),
        None => Err(ValidationError::invalid_token(field, raw, accepted)),
    }
}

// ============================================================================
// Waste
// ============================================================================

/// Validated waste answers
#[derive(Debug, Clone, PartialEq)]
pub struct WasteAnswers {
    pub generated_waste: Toggle,
    /// Normalized age group, when one was given
    pub age_group: Option<String>,
    /// Waste weight resolved from the age group (0 when no waste was generated)
    pub weight: f64,
    pub emission_factor: f64,
}

/// Validate waste input.
///
/// The age group is only consulted when `generated_waste` is yes. An age
/// group missing from the table is handled per `policy`, and so is a
/// `generated_waste` answer other than yes/no: `Error` rejects it, `Default`
/// reads anything but "yes" as no.
pub fn validate_waste(
    input: &CategoryInput,
    tables: &FactorTables,
    policy: UnknownKeyPolicy,
) -> ValidationResult<WasteAnswers> {
    let generated_waste = match policy {
        UnknownKeyPolicy::Error => input.toggle(fields::GENERATED_WASTE)?,
        UnknownKeyPolicy::Default(_) => {
            let token = input.token(fields::GENERATED_WASTE).unwrap_or_default();
            if token == "yes" {
                Toggle::Yes
            } else {
                if token != "no" {
                    debug!("Reading generated_waste {:?} as no", token);
                }
                Toggle::No
            }
        }
    };
    let age_group_raw = input.text(fields::AGE_GROUP).ok();
    let age_group = age_group_raw.as_deref().map(normalize_key);
    let emission_factor = tables.waste.emission_factor;

    if generated_waste == Toggle::No {
        return Ok(WasteAnswers {
            generated_waste,
            age_group,
            weight: 0.0,
            emission_factor,
        });
    }

    let known = age_group.as_deref().and_then(|a| tables.waste.weight(a));
    let weight = match (known, policy) {
        (Some(weight), _) => weight,
        (None, UnknownKeyPolicy::Default(fallback)) => {
            warn!(
                "Unknown age group {:?}, substituting weight {}",
                age_group, fallback
            );
            fallback
        }
        (None, UnknownKeyPolicy::Error) => {
            return Err(match age_group_raw {
                None => ValidationError::missing_field(fields::AGE_GROUP),
                Some(raw) => ValidationError::invalid_token(
                    fields::AGE_GROUP,
                    raw,
                    tables.waste.age_group_keys(),
                ),
            })
        }
    };

    Ok(WasteAnswers {
        generated_waste,
        age_group,
        weight,
        emission_factor,
    })
}

// ============================================================================
// Travel
// ============================================================================

/// Outcome of validating one travel mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeAnswer {
    /// Travelled this distance
    Yes { distance: f64 },
    /// Did not use this mode
    No,
    /// Toggle or distance was unusable
    Invalid(ValidationError),
}

/// One mode present in the request, with its table entry
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSelection<'t> {
    pub mode: &'t ModeFactor,
    pub answer: ModeAnswer,
}

fn validate_mode(input: &CategoryInput, mode: &ModeFactor) -> ModeAnswer {
    let toggle = match input.toggle(&mode.toggle_field()) {
        Ok(toggle) => toggle,
        Err(err) => return ModeAnswer::Invalid(err),
    };
    match toggle {
        Toggle::No => ModeAnswer::No,
        Toggle::Yes => match input.number(&mode.distance_field()) {
            Ok(distance) => ModeAnswer::Yes { distance },
            Err(err) => ModeAnswer::Invalid(err),
        },
    }
}

/// Validate travel input mode by mode, in factor table order.
///
/// Modes whose toggle field is absent are skipped. A request that mentions
/// no mode at all is rejected, naming the first mode's toggle field.
pub fn validate_travel<'t>(
    input: &CategoryInput,
    tables: &'t FactorTables,
) -> ValidationResult<Vec<ModeSelection<'t>>> {
    let selections: Vec<ModeSelection<'t>> = tables
        .travel
        .iter()
        .filter(|mode| input.contains(&mode.toggle_field()))
        .map(|mode| {
            let answer = validate_mode(input, mode);
            debug!("Travel mode {}: {:?}", mode.mode, answer);
            ModeSelection { mode, answer }
        })
        .collect();

    if selections.is_empty() {
        let field = tables
            .travel
            .iter()
            .next()
            .map(ModeFactor::toggle_field)
            .unwrap_or_else(|| "travel".to_string());
        return Err(ValidationError::missing_field(field));
    }

    Ok(selections)
}

// ============================================================================
// Energy
// ============================================================================

/// Validated energy answers
#[derive(Debug, Clone, PartialEq)]
pub enum EnergyAnswers {
    Used {
        electricity_bill: f64,
        electricity_factor: f64,
        meter_type: String,
        gas_bill: f64,
        gas_factor: f64,
    },
    NotUsed,
}

/// Validate energy input, all-or-nothing.
pub fn validate_energy(input: &CategoryInput, tables: &FactorTables) -> ValidationResult<EnergyAnswers> {
    if input.toggle(fields::ENERGY_USAGE)? == Toggle::No {
        return Ok(EnergyAnswers::NotUsed);
    }

    let electricity_bill = input.number(fields::ELECTRICITY_BILL)?;
    let (meter_type, gas_factor) = lookup(
        input,
        fields::GAS_METER_TYPE,
        |k| tables.energy.gas_factor(k),
        tables.energy.meter_types(),
    )?;
    let gas_bill = input.number(fields::GAS_BILL)?;

    Ok(EnergyAnswers::Used {
        electricity_bill,
        electricity_factor: tables.energy.electricity_factor,
        meter_type,
        gas_bill,
        gas_factor,
    })
}

// ============================================================================
// Diet
// ============================================================================

/// Validated diet answers
#[derive(Debug, Clone, PartialEq)]
pub struct DietAnswers {
    pub age_category: String,
    pub gender: String,
    pub diet_type: String,
    pub caloric_baseline: f64,
    pub conversion_factor: f64,
}

/// Validate diet input, all-or-nothing. No defaults, no partial credit.
pub fn validate_diet(input: &CategoryInput, tables: &FactorTables) -> ValidationResult<DietAnswers> {
    let diet = &tables.diet;

    let raw_age = input.text(fields::AGE_CATEGORY)?;
    let age_category = normalize_key(&raw_age);
    if !diet.caloric_baselines.contains_key(&age_category) {
        return Err(ValidationError::invalid_token(
            fields::AGE_CATEGORY,
            raw_age,
            diet.age_categories(),
        ));
    }

    let (gender, caloric_baseline) = lookup(
        input,
        fields::GENDER,
        |g| diet.baseline(&age_category, g),
        diet.genders(),
    )?;

    let (diet_type, conversion_factor) = lookup(
        input,
        fields::DIET_TYPE,
        |d| diet.conversion_factor(d),
        diet.diet_types(),
    )?;

    Ok(DietAnswers {
        age_category,
        gender,
        diet_type,
        caloric_baseline,
        conversion_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> &'static FactorTables {
        FactorTables::standard()
    }

    #[test]
    fn test_waste_unknown_age_group_error_policy() {
        let input = CategoryInput::new()
            .with_field("generated_waste", "yes")
            .with_field("age_group", "centenarian");
        let err = validate_waste(&input, tables(), UnknownKeyPolicy::Error).unwrap_err();
        match err {
            ValidationError::InvalidToken { field, accepted, .. } => {
                assert_eq!(field, "age_group");
                assert_eq!(accepted.len(), 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_waste_unknown_age_group_default_policy() {
        let input = CategoryInput::new()
            .with_field("generated_waste", "yes")
            .with_field("age_group", "centenarian");
        let answers = validate_waste(&input, tables(), UnknownKeyPolicy::Default(0.0)).unwrap();
        assert_eq!(answers.weight, 0.0);
    }

    #[test]
    fn test_waste_no_skips_age_group() {
        let input = CategoryInput::new().with_field("generated_waste", "No");
        let answers = validate_waste(&input, tables(), UnknownKeyPolicy::Error).unwrap();
        assert_eq!(answers.generated_waste, Toggle::No);
        assert_eq!(answers.weight, 0.0);
    }

    #[test]
    fn test_waste_toggle_strict_under_error_policy() {
        let input = CategoryInput::new()
            .with_field("generated_waste", "maybe")
            .with_field("age_group", "31 to 50");
        let err = validate_waste(&input, tables(), UnknownKeyPolicy::Error).unwrap_err();
        assert_eq!(err.field(), Some("generated_waste"));
    }

    #[test]
    fn test_waste_toggle_lenient_under_default_policy() {
        let input = CategoryInput::new()
            .with_field("generated_waste", "maybe")
            .with_field("age_group", "31 to 50");
        let answers = validate_waste(&input, tables(), UnknownKeyPolicy::Default(0.0)).unwrap();
        assert_eq!(answers.generated_waste, Toggle::No);
        assert_eq!(answers.weight, 0.0);

        let missing = CategoryInput::new().with_field("age_group", "31 to 50");
        let answers = validate_waste(&missing, tables(), UnknownKeyPolicy::Default(0.0)).unwrap();
        assert_eq!(answers.weight, 0.0);

        let shouted = input.with_field("generated_waste", " YES ");
        let answers = validate_waste(&shouted, tables(), UnknownKeyPolicy::Default(0.0)).unwrap();
        assert_eq!(answers.weight, 36.0);
    }

    #[test]
    fn test_invalid_token_keeps_value_as_sent() {
        let input = CategoryInput::new()
            .with_field("energy_usage", "yes")
            .with_field("electricity_bill", 10.0)
            .with_field("gas_meter_type", "  Cubic ")
            .with_field("gas_bill", 5.0);
        match validate_energy(&input, tables()).unwrap_err() {
            ValidationError::InvalidToken { value, .. } => assert_eq!(value, "  Cubic "),
            other => panic!("unexpected error: {:?}", other),
        }

        let input = CategoryInput::new()
            .with_field("generated_waste", "yes")
            .with_field("age_group", "Centenarian");
        match validate_waste(&input, tables(), UnknownKeyPolicy::Error).unwrap_err() {
            ValidationError::InvalidToken { value, .. } => assert_eq!(value, "Centenarian"),
            other => panic!("unexpected error: {:?}", other),
        }

        let input = CategoryInput::new()
            .with_field("age_category", "19-30")
            .with_field("gender", "Male ")
            .with_field("diet_type", "Vegan");
        let answers = validate_diet(&input, tables()).unwrap();
        assert_eq!(answers.gender, "male");
        assert_eq!(answers.diet_type, "vegan");
    }

    #[test]
    fn test_waste_missing_age_group() {
        let input = CategoryInput::new().with_field("generated_waste", "yes");
        let err = validate_waste(&input, tables(), UnknownKeyPolicy::Error).unwrap_err();
        assert_eq!(err, ValidationError::missing_field("age_group"));
    }

    #[test]
    fn test_travel_modes_are_isolated() {
        let input = CategoryInput::new()
            .with_field("air_travel", "yes")
            .with_field("air_distance", 1000.0)
            .with_field("train_travel", "sometimes")
            .with_field("car_travel", "yes");

        let selections = validate_travel(&input, tables()).unwrap();
        assert_eq!(selections.len(), 3);
        assert_eq!(selections[0].answer, ModeAnswer::Yes { distance: 1000.0 });
        assert!(matches!(selections[1].answer, ModeAnswer::Invalid(ValidationError::InvalidToken { .. })));
        assert_eq!(
            selections[2].answer,
            ModeAnswer::Invalid(ValidationError::missing_field("car_distance"))
        );
    }

    #[test]
    fn test_travel_omitted_modes_skipped() {
        let input = CategoryInput::new().with_field("train_travel", "no");
        let selections = validate_travel(&input, tables()).unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].mode.mode, "train");
    }

    #[test]
    fn test_travel_requires_some_mode() {
        let err = validate_travel(&CategoryInput::new(), tables()).unwrap_err();
        assert_eq!(err, ValidationError::missing_field("air_travel"));
    }

    #[test]
    fn test_energy_bad_meter_type() {
        let input = CategoryInput::new()
            .with_field("energy_usage", "yes")
            .with_field("electricity_bill", 100.0)
            .with_field("gas_meter_type", "cubic")
            .with_field("gas_bill", 50.0);
        let err = validate_energy(&input, tables()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::invalid_token("gas_meter_type", "cubic", ["imperial", "metric"])
        );
    }

    #[test]
    fn test_energy_bad_toggle() {
        let input = CategoryInput::new().with_field("energy_usage", "sometimes");
        let err = validate_energy(&input, tables()).unwrap_err();
        assert_eq!(err.field(), Some("energy_usage"));
    }

    #[test]
    fn test_diet_resolves_factors() {
        let input = CategoryInput::new()
            .with_field("age_category", "31-50")
            .with_field("gender", "Female")
            .with_field("diet_type", "KETO");
        let answers = validate_diet(&input, tables()).unwrap();
        assert_eq!(answers.caloric_baseline, 60000.0);
        assert_eq!(answers.conversion_factor, 0.00291);
    }

    #[test]
    fn test_diet_rejects_unknown_gender() {
        let input = CategoryInput::new()
            .with_field("age_category", "31-50")
            .with_field("gender", "other")
            .with_field("diet_type", "vegan");
        let err = validate_diet(&input, tables()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::invalid_token("gender", "other", ["female", "male"])
        );
    }

    #[test]
    fn test_diet_rejects_unknown_diet_type() {
        let input = CategoryInput::new()
            .with_field("age_category", "19-30")
            .with_field("gender", "male")
            .with_field("diet_type", "carnivore");
        assert_eq!(
            validate_diet(&input, tables()).unwrap_err().field(),
            Some("diet_type")
        );
    }
}
