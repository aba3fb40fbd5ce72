// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value validation against function definitions.
//!
//! Validation never adjusts a value: out-of-range input is rejected, not
//! clamped.
//!
//! # Examples
//!
//! ```
//! use daichi_hvac::registry::Registry;
//! use daichi_hvac::snapshot::RawValue;
//! use daichi_hvac::types::FunctionId;
//! use daichi_hvac::validation::validate;
//!
//! let temp = Registry::builtin().definition_for(FunctionId::TEMPERATURE).unwrap();
//! assert!(validate(temp, &RawValue::Int(16)).is_ok());
//! assert!(validate(temp, &RawValue::Int(31)).is_err());
//! assert!(validate(temp, &RawValue::Bool(true)).is_err());
//! ```

use serde_json::{Map, Value};

use crate::error::ValueError;
use crate::registry::{FunctionDefinition, ParameterKind, Registry, ValueType};
use crate::snapshot::{RawValue, ValueKind};
use crate::types::{FunctionCategory, FunctionId};

/// Checks a value against a definition of the built-in registry.
///
/// Shorthand for [`validate_in`] with [`Registry::builtin`].
///
/// # Errors
///
/// See [`validate_in`].
pub fn validate(definition: &FunctionDefinition, value: &RawValue) -> Result<(), ValueError> {
    validate_in(Registry::builtin(), definition, value)
}

/// Checks a value against the type and range of a definition.
///
/// Activations must name a function that `registry` knows in the same
/// category as the definition.
///
/// # Errors
///
/// - `ValueError::WrongType` if the value has the wrong primitive type
/// - `ValueError::OutOfRange` if an integer is outside the declared range
/// - `ValueError::NotInCategory` if an activation names a function of
///   another category, or one the registry does not know
pub fn validate_in(
    registry: &Registry,
    definition: &FunctionDefinition,
    value: &RawValue,
) -> Result<(), ValueError> {
    let function = definition.id;

    match definition.value_type {
        ValueType::Boolean => match value {
            RawValue::Bool(_) => Ok(()),
            other => Err(ValueError::WrongType {
                function,
                expected: ValueKind::Boolean,
                actual: other.kind(),
            }),
        },
        ValueType::IntegerRange => validate_integer(definition, value).map(|_| ()),
        ValueType::EnumActivation => {
            let named = value.as_integer().ok_or_else(|| ValueError::WrongType {
                function,
                expected: ValueKind::Integer,
                actual: value.kind(),
            })?;
            let category = definition.category();
            let in_category = u32::try_from(named)
                .map(FunctionId::new)
                .is_ok_and(|id| match category {
                    // custom functions have no siblings
                    FunctionCategory::Other => id == function,
                    _ => registry.get(id).is_some_and(|d| d.category() == category),
                });
            if in_category {
                Ok(())
            } else {
                Err(ValueError::NotInCategory {
                    function,
                    value: named,
                })
            }
        }
    }
}

/// Checks a literal number against an integer-range definition and
/// returns it.
///
/// # Errors
///
/// - `ValueError::WrongType` if the definition is not an integer range or
///   the value is not a whole number
/// - `ValueError::OutOfRange` if the number is outside the declared range
pub fn validate_integer(
    definition: &FunctionDefinition,
    value: &RawValue,
) -> Result<i64, ValueError> {
    let function = definition.id;
    if definition.value_type != ValueType::IntegerRange {
        return Err(ValueError::WrongType {
            function,
            expected: match definition.value_type {
                ValueType::Boolean => ValueKind::Boolean,
                ValueType::IntegerRange | ValueType::EnumActivation => ValueKind::Integer,
            },
            actual: value.kind(),
        });
    }

    let actual = value.as_integer().ok_or_else(|| ValueError::WrongType {
        function,
        expected: ValueKind::Integer,
        actual: value.kind(),
    })?;
    match definition.range {
        Some(range) if !range.contains(actual) => Err(ValueError::OutOfRange {
            function,
            min: range.min,
            max: range.max,
            actual,
        }),
        _ => Ok(actual),
    }
}

/// Checks a nested payload against the parameter schema of a definition.
///
/// Every declared field must be present with the right type and within its
/// bounds. Undeclared keys are ignored.
///
/// # Errors
///
/// - `ValueError::UnexpectedParameters` if the definition declares no schema
/// - `ValueError::MissingParameter` if a declared field is absent
/// - `ValueError::WrongParameterType` if a field has the wrong type
/// - `ValueError::ParameterOutOfRange` if an integer field is out of bounds
pub fn validate_parameters(
    definition: &FunctionDefinition,
    parameters: &Map<String, Value>,
) -> Result<(), ValueError> {
    let function = definition.id;
    let schema = definition
        .parameters
        .as_ref()
        .ok_or(ValueError::UnexpectedParameters(function))?;

    for field in &schema.fields {
        let value = parameters
            .get(&field.name)
            .ok_or_else(|| ValueError::MissingParameter {
                function,
                field: field.name.clone(),
            })?;

        match field.kind {
            ParameterKind::Boolean => {
                if !value.is_boolean() {
                    return Err(ValueError::WrongParameterType {
                        function,
                        field: field.name.clone(),
                        expected: ValueKind::Boolean,
                    });
                }
            }
            ParameterKind::Integer { min, max } => {
                let actual = value.as_i64().ok_or_else(|| ValueError::WrongParameterType {
                    function,
                    field: field.name.clone(),
                    expected: ValueKind::Integer,
                })?;
                let low = min.unwrap_or(i64::MIN);
                let high = max.unwrap_or(i64::MAX);
                if !(low..=high).contains(&actual) {
                    return Err(ValueError::ParameterOutOfRange {
                        function,
                        field: field.name.clone(),
                        min: low,
                        max: high,
                        actual,
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn def(id: FunctionId) -> &'static FunctionDefinition {
        Registry::builtin().definition_for(id).unwrap()
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        let temp = def(FunctionId::TEMPERATURE);
        assert!(validate(temp, &RawValue::Int(16)).is_ok());
        assert!(validate(temp, &RawValue::Int(30)).is_ok());
        assert_eq!(
            validate(temp, &RawValue::Int(15)),
            Err(ValueError::OutOfRange {
                function: FunctionId::TEMPERATURE,
                min: 16,
                max: 30,
                actual: 15,
            })
        );
        assert!(validate(temp, &RawValue::Int(31)).is_err());
    }

    #[test]
    fn fan_speed_bounds_are_inclusive() {
        let fan = def(FunctionId::FAN_SPEED);
        assert!(validate(fan, &RawValue::Int(1)).is_ok());
        assert!(validate(fan, &RawValue::Int(5)).is_ok());
        assert!(validate(fan, &RawValue::Int(0)).is_err());
        assert!(validate(fan, &RawValue::Int(6)).is_err());
    }

    #[test]
    fn fractional_number_is_a_type_error() {
        assert_eq!(
            validate(def(FunctionId::TEMPERATURE), &RawValue::Float(21.5)),
            Err(ValueError::WrongType {
                function: FunctionId::TEMPERATURE,
                expected: ValueKind::Integer,
                actual: ValueKind::Float,
            })
        );
        assert!(validate(def(FunctionId::TEMPERATURE), &RawValue::Float(21.0)).is_ok());
    }

    #[test]
    fn boolean_must_be_exact() {
        let eco = def(FunctionId::ECO);
        assert!(validate(eco, &RawValue::Bool(false)).is_ok());
        assert!(matches!(
            validate(eco, &RawValue::Int(1)),
            Err(ValueError::WrongType { actual: ValueKind::Integer, .. })
        ));
    }

    #[test]
    fn activation_names_a_sibling() {
        let heat = def(FunctionId::HEAT);
        assert!(validate(heat, &RawValue::from(FunctionId::HEAT)).is_ok());
        assert!(validate(heat, &RawValue::from(FunctionId::COOL)).is_ok());
        assert_eq!(
            validate(heat, &RawValue::from(FunctionId::ECO)),
            Err(ValueError::NotInCategory {
                function: FunctionId::HEAT,
                value: 363,
            })
        );
        assert!(validate(heat, &RawValue::Int(-1)).is_err());
    }

    #[test]
    fn activation_requires_a_registered_sibling() {
        let registry = Registry::new(vec![
            FunctionDefinition::boolean(FunctionId::POWER, "Power").with_ignore_power_off(),
            FunctionDefinition::enum_activation(FunctionId::COOL, "Cool"),
            FunctionDefinition::enum_activation(FunctionId::HEAT, "Heat"),
        ])
        .unwrap();
        let heat = registry.definition_for(FunctionId::HEAT).unwrap();

        assert!(validate_in(&registry, heat, &RawValue::from(FunctionId::COOL)).is_ok());
        assert_eq!(
            validate_in(&registry, heat, &RawValue::from(FunctionId::DRY)),
            Err(ValueError::NotInCategory {
                function: FunctionId::HEAT,
                value: 355,
            })
        );
        assert!(validate(def(FunctionId::HEAT), &RawValue::from(FunctionId::DRY)).is_ok());
    }

    #[test]
    fn integer_is_returned_after_checks() {
        let temp = def(FunctionId::TEMPERATURE);
        assert_eq!(validate_integer(temp, &RawValue::Float(24.0)), Ok(24));
        assert!(matches!(
            validate_integer(temp, &RawValue::Int(40)),
            Err(ValueError::OutOfRange { actual: 40, .. })
        ));
        assert!(matches!(
            validate_integer(def(FunctionId::ECO), &RawValue::Int(1)),
            Err(ValueError::WrongType { expected: ValueKind::Boolean, .. })
        ));
    }

    #[test]
    fn comfort_sleep_parameters() {
        let sleep = def(FunctionId::COMFORTABLE_SLEEP);
        let ok = json!({"temp": 24, "sleepTime": 300});
        assert!(validate_parameters(sleep, ok.as_object().unwrap()).is_ok());

        let missing = json!({"temp": 24});
        assert_eq!(
            validate_parameters(sleep, missing.as_object().unwrap()),
            Err(ValueError::MissingParameter {
                function: FunctionId::COMFORTABLE_SLEEP,
                field: "sleepTime".to_string(),
            })
        );

        let wrong = json!({"temp": "warm", "sleepTime": 300});
        assert!(matches!(
            validate_parameters(sleep, wrong.as_object().unwrap()),
            Err(ValueError::WrongParameterType { field, .. }) if field == "temp"
        ));

        let hot = json!({"temp": 35, "sleepTime": 300});
        assert!(matches!(
            validate_parameters(sleep, hot.as_object().unwrap()),
            Err(ValueError::ParameterOutOfRange { actual: 35, .. })
        ));

        let zero = json!({"temp": 22, "sleepTime": 0});
        assert!(matches!(
            validate_parameters(sleep, zero.as_object().unwrap()),
            Err(ValueError::ParameterOutOfRange { field, min: 1, .. }) if field == "sleepTime"
        ));
    }

    #[test]
    fn parameters_on_plain_function() {
        let eco = def(FunctionId::ECO);
        assert_eq!(
            validate_parameters(eco, &Map::new()),
            Err(ValueError::UnexpectedParameters(FunctionId::ECO))
        );
    }
}
