// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw device state.
//!
//! A [`DeviceStateSnapshot`] is the complete Function ID to value mapping
//! reported by a device at one instant. Snapshots are immutable: each poll
//! produces a new one that fully replaces the previous one.
//!
//! # Examples
//!
//! ```
//! use daichi_hvac::snapshot::{DeviceStateSnapshot, RawValue};
//! use daichi_hvac::types::FunctionId;
//!
//! let snapshot: DeviceStateSnapshot = [
//!     (FunctionId::POWER, RawValue::Bool(true)),
//!     (FunctionId::TEMPERATURE, RawValue::Int(21)),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(snapshot.get(FunctionId::TEMPERATURE), Some(&RawValue::Int(21)));
//! ```

mod cloud;

pub use cloud::{
    CloudDevice, CloudDeviceState, PultFunction, PultFunctionState, PultSection,
    parse_device_document,
};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::command::{Command, FunctionInstruction};
use crate::types::FunctionId;

/// Primitive kind of a raw value, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `true` / `false`.
    Boolean,
    /// Whole number.
    Integer,
    /// Number with a fractional part.
    Float,
    /// Nested object.
    Object,
    /// String.
    Text,
    /// Array.
    Array,
    /// JSON `null`.
    Null,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Object => "object",
            Self::Text => "text",
            Self::Array => "array",
            Self::Null => "null",
        })
    }
}

/// A value as reported by the device for one function.
///
/// Deserializes from plain JSON. Anything that is not a boolean, a number or
/// an object lands in `Other` unchanged so that decoding never fails on the
/// shape of device data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// On/off state.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Number with a fractional part.
    Float(f64),
    /// Nested object, e.g. `{"isOn": true, "parameters": {...}}`.
    Object(Map<String, Value>),
    /// Any other JSON value, kept verbatim.
    Other(Value),
}

impl RawValue {
    /// Key of the on/off flag inside an object value.
    pub const IS_ON_KEY: &'static str = "isOn";

    /// Key of the numeric value inside an object value.
    pub const VALUE_KEY: &'static str = "value";

    /// Key of the nested parameters inside an object value.
    pub const PARAMETERS_KEY: &'static str = "parameters";

    /// Converts a requested number into a raw value.
    ///
    /// Whole numbers become `Int`, anything else stays `Float`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn from_number(value: f64) -> Self {
        // i64::MAX as f64 rounds up, so the upper bound is exclusive
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            Self::Int(value as i64)
        } else {
            Self::Float(value)
        }
    }

    /// Returns the primitive kind of the value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Boolean,
            Self::Int(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Object(_) => ValueKind::Object,
            Self::Other(value) => match value {
                Value::Null => ValueKind::Null,
                Value::Bool(_) => ValueKind::Boolean,
                Value::Number(n) if n.is_i64() || n.is_u64() => ValueKind::Integer,
                Value::Number(_) => ValueKind::Float,
                Value::String(_) => ValueKind::Text,
                Value::Array(_) => ValueKind::Array,
                Value::Object(_) => ValueKind::Object,
            },
        }
    }

    /// Reads the value as an on/off flag.
    ///
    /// Booleans are taken as is, integers are on when non-zero, and objects
    /// are read through their `isOn` key. Returns `None` for anything else.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(n) => Some(*n != 0),
            Self::Object(map) => map.get(Self::IS_ON_KEY).and_then(Value::as_bool),
            Self::Float(_) | Self::Other(_) => None,
        }
    }

    /// Reads the value as a whole number.
    ///
    /// Objects are read through their `value` key.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Object(map) => {
                let value = map.get(Self::VALUE_KEY)?;
                value
                    .as_i64()
                    .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            }
            _ => None,
        }
    }

    /// Reads the value as a number.
    ///
    /// Objects are read through their `value` key.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Object(map) => map.get(Self::VALUE_KEY).and_then(Value::as_f64),
            _ => None,
        }
    }

    /// Returns the nested object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<FunctionId> for RawValue {
    fn from(value: FunctionId) -> Self {
        Self::Int(i64::from(value.value()))
    }
}

/// Complete state of a device at one instant.
///
/// Keys are kept in ascending id order so that iteration, and everything
/// derived from it, is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceStateSnapshot {
    values: BTreeMap<FunctionId, RawValue>,
}

impl DeviceStateSnapshot {
    /// Creates a snapshot from a complete mapping.
    #[must_use]
    pub fn new(values: BTreeMap<FunctionId, RawValue>) -> Self {
        Self { values }
    }

    /// Returns the raw value of a function, if reported.
    #[must_use]
    pub fn get(&self, id: FunctionId) -> Option<&RawValue> {
        self.values.get(&id)
    }

    /// Returns `true` if the function was reported.
    #[must_use]
    pub fn contains(&self, id: FunctionId) -> bool {
        self.values.contains_key(&id)
    }

    /// Iterates over the reported functions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (FunctionId, &RawValue)> {
        self.values.iter().map(|(id, value)| (*id, value))
    }

    /// Returns the number of reported functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Projects the snapshot the device would report after accepting the
    /// given instructions.
    ///
    /// Returns a new snapshot; `self` is left untouched. Activating a member
    /// of an exclusive category switches off the siblings that currently
    /// report an on/off flag, the way the device does. Useful for optimistic
    /// state updates between polls.
    #[must_use]
    pub fn applying(&self, instructions: &[FunctionInstruction]) -> Self {
        let mut values = self.values.clone();

        for instruction in instructions {
            let id = instruction.function_id;
            let value = match (&instruction.command, &instruction.parameters) {
                (command, Some(parameters)) => {
                    let mut object = Map::new();
                    object.insert(RawValue::IS_ON_KEY.to_string(), Value::Bool(command.is_on()));
                    object.insert(
                        RawValue::PARAMETERS_KEY.to_string(),
                        Value::Object(parameters.clone()),
                    );
                    RawValue::Object(object)
                }
                (Command::Int(n), None) => RawValue::Int(*n),
                (command, None) => RawValue::Bool(command.is_on()),
            };

            let category = id.category();
            if category.is_exclusive() && instruction.command.is_on() {
                for (sibling, sibling_value) in &mut values {
                    if *sibling != id
                        && sibling.category() == category
                        && matches!(sibling_value, RawValue::Bool(_))
                    {
                        *sibling_value = RawValue::Bool(false);
                    }
                }
            }

            values.insert(id, value);
        }

        Self { values }
    }
}

impl FromIterator<(FunctionId, RawValue)> for DeviceStateSnapshot {
    fn from_iter<I: IntoIterator<Item = (FunctionId, RawValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
