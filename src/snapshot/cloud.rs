// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for the cloud device document.
//!
//! The cloud describes a device as a list of control panel sections
//! (`pult`), each holding the functions it shows together with their
//! current state. This module flattens that document into a
//! [`DeviceStateSnapshot`].

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{DeviceStateSnapshot, RawValue};
use crate::error::ParseError;
use crate::types::FunctionId;

/// Device document as returned by `GET /devices/{id}`.
///
/// Not all fields are present in every document.
///
/// # Examples
///
/// ```
/// use daichi_hvac::snapshot::CloudDevice;
/// use daichi_hvac::types::FunctionId;
///
/// let json = r#"{
///     "id": 42,
///     "status": "connected",
///     "pult": [
///         {"title": "Mode", "functions": [
///             {"id": 350, "state": {"isOn": true}},
///             {"id": 351, "state": {"value": 21}}
///         ]}
///     ]
/// }"#;
/// let device: CloudDevice = serde_json::from_str(json).unwrap();
/// let snapshot = device.to_snapshot();
///
/// assert!(device.is_connected());
/// assert_eq!(snapshot.len(), 2);
/// assert!(snapshot.contains(FunctionId::TEMPERATURE));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudDevice {
    /// Device id on the account.
    #[serde(default)]
    pub id: Option<u64>,

    /// User-assigned title.
    #[serde(default)]
    pub title: Option<String>,

    /// Device serial number.
    #[serde(default)]
    pub serial: Option<String>,

    /// Connection status (e.g. `"connected"`, `"disconnected"`).
    #[serde(default)]
    pub status: Option<String>,

    /// Summary state shown in device lists.
    #[serde(default)]
    pub state: Option<CloudDeviceState>,

    /// Control panel sections.
    #[serde(default)]
    pub pult: Option<Vec<PultSection>>,
}

/// Summary state of a device.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudDeviceState {
    /// Whether the device is powered.
    #[serde(default)]
    pub is_on: Option<bool>,
}

/// One section of the control panel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PultSection {
    /// Section title (e.g. `"Fan speed"`).
    #[serde(default)]
    pub title: Option<String>,

    /// Functions shown in this section.
    #[serde(default)]
    pub functions: Vec<PultFunction>,
}

/// One function of a control panel section.
#[derive(Debug, Clone, Deserialize)]
pub struct PultFunction {
    /// Function id.
    pub id: FunctionId,

    /// Display title.
    #[serde(default)]
    pub title: Option<String>,

    /// Current state.
    #[serde(default)]
    pub state: PultFunctionState,
}

/// Current state of a control panel function.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PultFunctionState {
    /// On/off flag.
    #[serde(default)]
    pub is_on: Option<bool>,

    /// Numeric value (temperature, fan speed).
    #[serde(default)]
    pub value: Option<Value>,

    /// Nested parameters (Comfortable Sleep).
    #[serde(default)]
    pub parameters: Option<Value>,
}

impl PultFunctionState {
    /// Converts the state into the raw value the decoder reads.
    ///
    /// A state carrying parameters, or both a flag and a number, becomes an
    /// object so that each reader picks its own key. Otherwise the number or
    /// the flag is taken alone. Returns `None` when the state carries
    /// nothing.
    #[must_use]
    pub fn to_raw(&self) -> Option<RawValue> {
        let parameters = self.parameters.as_ref().filter(|p| !p.is_null());
        let number = match &self.value {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        };

        if parameters.is_some() || (number.is_some() && self.is_on.is_some()) {
            let mut object = Map::new();
            if let Some(is_on) = self.is_on {
                object.insert(RawValue::IS_ON_KEY.to_string(), Value::Bool(is_on));
            }
            if let Some(n) = number {
                object.insert(RawValue::VALUE_KEY.to_string(), Value::Number(n.clone()));
            }
            if let Some(parameters) = parameters {
                object.insert(RawValue::PARAMETERS_KEY.to_string(), parameters.clone());
            }
            return Some(RawValue::Object(object));
        }

        match (number, self.is_on) {
            (Some(n), _) => Some(
                n.as_i64()
                    .map_or_else(|| RawValue::Float(n.as_f64().unwrap_or(f64::NAN)), RawValue::Int),
            ),
            (None, Some(is_on)) => Some(RawValue::Bool(is_on)),
            (None, None) => self
                .value
                .as_ref()
                .filter(|v| !v.is_null())
                .map(|v| RawValue::Other(v.clone())),
        }
    }
}

impl CloudDevice {
    /// Returns `false` if the cloud reports the device as disconnected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self
            .status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("disconnected"))
    }

    /// Iterates over all control panel functions across sections.
    pub fn functions(&self) -> impl Iterator<Item = &PultFunction> {
        self.pult
            .iter()
            .flatten()
            .flat_map(|section| section.functions.iter())
    }

    /// Flattens the document into a snapshot.
    ///
    /// The first occurrence of a function wins when it appears in several
    /// sections. When the panel lacks the power function, the summary
    /// `state.isOn` is used instead.
    #[must_use]
    pub fn to_snapshot(&self) -> DeviceStateSnapshot {
        let mut values = std::collections::BTreeMap::new();

        for function in self.functions() {
            let Some(raw) = function.state.to_raw() else {
                continue;
            };
            if values.contains_key(&function.id) {
                tracing::debug!(
                    function = %function.id,
                    "Function listed in several panel sections, keeping the first"
                );
                continue;
            }
            values.insert(function.id, raw);
        }

        if !values.contains_key(&FunctionId::POWER)
            && let Some(is_on) = self.state.as_ref().and_then(|s| s.is_on)
        {
            values.insert(FunctionId::POWER, RawValue::Bool(is_on));
        }

        DeviceStateSnapshot::new(values)
    }
}

/// Parses a device document, with or without the `{done, data}` envelope.
///
/// # Errors
///
/// Returns `ParseError::Json` if the payload is not valid JSON or does not
/// match the document shape, and `ParseError::UnexpectedFormat` if it is not
/// an object.
pub fn parse_device_document(payload: &str) -> Result<CloudDevice, ParseError> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Object(mut object) = value else {
        return Err(ParseError::UnexpectedFormat(
            "device document is not an object".to_string(),
        ));
    };

    let document = match object.remove("data") {
        Some(data @ Value::Object(_)) => data,
        Some(_) => return Err(ParseError::MissingField("data".to_string())),
        None => Value::Object(object),
    };

    serde_json::from_value(document).map_err(ParseError::Json)
}
