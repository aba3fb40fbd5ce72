// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Function definition metadata.

use serde::{Deserialize, Serialize};

use crate::types::{FunctionCategory, FunctionId};

/// How the value of a function is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    /// On/off flag.
    Boolean,
    /// Whole number within an inclusive range.
    IntegerRange,
    /// Member of an exclusive category, switched on by activation.
    EnumActivation,
}

/// How a function is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationKind {
    /// Independent on and off commands, or a literal value.
    Toggle,
    /// A single activation command; siblings are switched off by the device.
    Applyable,
}

/// Inclusive bounds of an integer-range function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lowest accepted value.
    pub min: i64,
    /// Highest accepted value.
    pub max: i64,
}

impl ValueRange {
    /// Creates a range from its inclusive bounds.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `value` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Primitive type of one parameter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterKind {
    /// `true` / `false`.
    Boolean,
    /// Whole number with optional bounds.
    Integer {
        /// Lowest accepted value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        /// Highest accepted value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
}

/// One field of a composite payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterField {
    /// Payload key.
    pub name: String,
    /// Expected type and bounds.
    #[serde(flatten)]
    pub kind: ParameterKind,
}

impl ParameterField {
    /// Creates a bounded integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>, min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Integer { min, max },
        }
    }

    /// Creates a boolean field.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Boolean,
        }
    }
}

/// Schema of the nested payload carried by a function.
///
/// Every declared field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSchema {
    /// Declared fields, in payload order.
    pub fields: Vec<ParameterField>,
}

impl ParameterSchema {
    /// Creates a schema from its fields.
    #[must_use]
    pub fn new(fields: Vec<ParameterField>) -> Self {
        Self { fields }
    }

    /// Looks up a field by payload key.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ParameterField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Static metadata of one device function.
///
/// # Examples
///
/// ```
/// use daichi_hvac::registry::{FunctionDefinition, ValueType};
/// use daichi_hvac::types::FunctionId;
///
/// let eco = FunctionDefinition::boolean(FunctionId::ECO, "Eco")
///     .with_commands("eco_on", "eco_off")
///     .linked_to(FunctionId::POWER);
///
/// assert_eq!(eco.value_type, ValueType::Boolean);
/// assert_eq!(eco.command(true), Some("eco_on"));
/// assert!(!eco.ignore_power_off);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    /// Unique function id.
    pub id: FunctionId,

    /// Human label, for diagnostics.
    pub name: String,

    /// How the value is interpreted.
    pub value_type: ValueType,

    /// Bounds of an integer-range function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,

    /// How the function is switched on.
    pub activation_kind: ActivationKind,

    /// Command literal that switches a toggle on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_command: Option<String>,

    /// Command literal that switches a toggle off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_command: Option<String>,

    /// The function may be commanded while the device is off.
    #[serde(default)]
    pub ignore_power_off: bool,

    /// Function this one depends on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_function_id: Option<FunctionId>,

    /// Schema of the nested payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterSchema>,
}

impl FunctionDefinition {
    fn base(id: FunctionId, name: impl Into<String>, value_type: ValueType) -> Self {
        let activation_kind = match value_type {
            ValueType::EnumActivation => ActivationKind::Applyable,
            ValueType::Boolean | ValueType::IntegerRange => ActivationKind::Toggle,
        };
        Self {
            id,
            name: name.into(),
            value_type,
            range: None,
            activation_kind,
            on_command: None,
            off_command: None,
            ignore_power_off: false,
            linked_function_id: None,
            parameters: None,
        }
    }

    /// Creates an on/off toggle without a command pair.
    #[must_use]
    pub fn boolean(id: FunctionId, name: impl Into<String>) -> Self {
        Self::base(id, name, ValueType::Boolean)
    }

    /// Creates an integer-range toggle.
    #[must_use]
    pub fn integer_range(id: FunctionId, name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            range: Some(ValueRange::new(min, max)),
            ..Self::base(id, name, ValueType::IntegerRange)
        }
    }

    /// Creates an applyable member of an exclusive category.
    #[must_use]
    pub fn enum_activation(id: FunctionId, name: impl Into<String>) -> Self {
        Self::base(id, name, ValueType::EnumActivation)
    }

    /// Sets the on/off command pair.
    #[must_use]
    pub fn with_commands(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.on_command = Some(on.into());
        self.off_command = Some(off.into());
        self
    }

    /// Allows the function to be commanded while the device is off.
    #[must_use]
    pub fn with_ignore_power_off(mut self) -> Self {
        self.ignore_power_off = true;
        self
    }

    /// Declares the function this one depends on.
    #[must_use]
    pub fn linked_to(mut self, id: FunctionId) -> Self {
        self.linked_function_id = Some(id);
        self
    }

    /// Declares the nested payload schema.
    #[must_use]
    pub fn with_parameters(mut self, schema: ParameterSchema) -> Self {
        self.parameters = Some(schema);
        self
    }

    /// Returns the category of the function.
    #[must_use]
    pub const fn category(&self) -> FunctionCategory {
        self.id.category()
    }

    /// Returns `true` for applyable functions.
    #[must_use]
    pub fn is_applyable(&self) -> bool {
        self.activation_kind == ActivationKind::Applyable
    }

    /// Returns the on/off command pair when both halves are declared.
    #[must_use]
    pub fn commands(&self) -> Option<(&str, &str)> {
        Some((self.on_command.as_deref()?, self.off_command.as_deref()?))
    }

    /// Returns the command literal for switching the function on or off.
    #[must_use]
    pub fn command(&self, on: bool) -> Option<&str> {
        self.commands().map(|(on_cmd, off_cmd)| if on { on_cmd } else { off_cmd })
    }
}
