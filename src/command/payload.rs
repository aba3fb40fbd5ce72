// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire shapes of the cloud control endpoint.
//!
//! A control request carries a single function update:
//!
//! ```json
//! {
//!   "cmdId": 67902906,
//!   "value": {"functionId": 353, "isOn": true, "parameters": null},
//!   "conflictResolveData": null
//! }
//! ```
//!
//! Literal numbers travel in `value` instead of `isOn`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Command, FunctionInstruction};
use crate::types::FunctionId;

/// Lowest command id the cloud expects (8 digits).
const CMD_ID_MIN: u32 = 10_000_000;

/// Number of distinct 8-digit command ids.
const CMD_ID_SPAN: u128 = 90_000_000;

/// Generates a random 8-digit command id.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn generate_cmd_id() -> u32 {
    // always below CMD_ID_SPAN, so the cast is lossless
    CMD_ID_MIN + (Uuid::new_v4().as_u128() % CMD_ID_SPAN) as u32
}

/// Function update inside a control request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlValue {
    /// Target function.
    pub function_id: FunctionId,

    /// On/off state, for switches and activations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_on: Option<bool>,

    /// Literal number, for temperature and fan speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,

    /// Nested payload; sent as `null` when absent.
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
}

impl From<&FunctionInstruction> for ControlValue {
    fn from(instruction: &FunctionInstruction) -> Self {
        let (is_on, value) = match &instruction.command {
            Command::Int(n) => (None, Some(*n)),
            other => (Some(other.is_on()), None),
        };
        Self {
            function_id: instruction.function_id,
            is_on,
            value,
            parameters: instruction.parameters.clone(),
        }
    }
}

/// Body of `POST /devices/{id}/ctrl`.
///
/// # Examples
///
/// ```
/// use daichi_hvac::command::{Command, ControlRequest, FunctionInstruction};
/// use daichi_hvac::types::FunctionId;
///
/// let instruction = FunctionInstruction::new(FunctionId::TEMPERATURE, Command::Int(22));
/// let request = ControlRequest::new(&instruction).with_cmd_id(12345678);
///
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(
///     json,
///     serde_json::json!({
///         "cmdId": 12345678,
///         "value": {"functionId": 351, "value": 22, "parameters": null},
///         "conflictResolveData": null
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    /// Random 8-digit id of the command.
    pub cmd_id: u32,

    /// The function update.
    pub value: ControlValue,

    /// Resolution token from a previous conflict reply.
    #[serde(default)]
    pub conflict_resolve_data: Option<Value>,
}

impl ControlRequest {
    /// Creates a request for one instruction with a fresh command id.
    #[must_use]
    pub fn new(instruction: &FunctionInstruction) -> Self {
        Self {
            cmd_id: generate_cmd_id(),
            value: ControlValue::from(instruction),
            conflict_resolve_data: None,
        }
    }

    /// Sets the command id.
    #[must_use]
    pub fn with_cmd_id(mut self, cmd_id: u32) -> Self {
        self.cmd_id = cmd_id;
        self
    }

    /// Attaches the token that resolves a conflict.
    #[must_use]
    pub fn with_conflict_resolve_data(mut self, data: Value) -> Self {
        self.conflict_resolve_data = Some(data);
        self
    }
}

/// Reply to a control request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlReply {
    /// Whether the device accepted the command.
    #[serde(default)]
    pub done: bool,

    /// Error details when not done.
    #[serde(default)]
    pub errors: Option<Value>,

    /// The device state should be refreshed.
    #[serde(default)]
    pub update_required: bool,
}

/// Body of an HTTP 409 reply to a control request.
///
/// Sent when the command clashes with a running program (e.g. Comfortable
/// Sleep). Resending the request with the token of a `REQUEST` action
/// resolves the conflict.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConflictReply {
    /// Human readable description.
    #[serde(default)]
    pub title: Option<String>,

    /// Ways to resolve the conflict.
    #[serde(default)]
    pub actions: Vec<ConflictAction>,
}

/// One way to resolve a conflict.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictAction {
    /// What the action does (`"REQUEST"` resends the command).
    #[serde(default)]
    pub behaviour: Option<String>,

    /// Token to attach to the resent request.
    #[serde(default)]
    pub conflict_resolve_data: Option<Value>,
}

impl ConflictReply {
    /// Behaviour of the action that resends the command.
    pub const REQUEST_BEHAVIOUR: &'static str = "REQUEST";

    /// Returns the token of the first action that resends the command.
    #[must_use]
    pub fn resolve_data(&self) -> Option<&Value> {
        self.actions
            .iter()
            .filter(|action| action.behaviour.as_deref() == Some(Self::REQUEST_BEHAVIOUR))
            .find_map(|action| action.conflict_resolve_data.as_ref().filter(|d| !d.is_null()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cmd_id_has_eight_digits() {
        for _ in 0..100 {
            let id = generate_cmd_id();
            assert!((10_000_000..=99_999_999).contains(&id));
        }
    }

    #[test]
    fn switch_commands_map_to_is_on() {
        let activate = FunctionInstruction::new(FunctionId::HEAT, Command::Activate);
        let off = FunctionInstruction::new(FunctionId::ECO, Command::Off("eco_off".to_string()));

        let request = ControlRequest::new(&activate).with_cmd_id(10_000_001);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "cmdId": 10_000_001,
                "value": {"functionId": 353, "isOn": true, "parameters": null},
                "conflictResolveData": null
            })
        );
        assert_eq!(ControlValue::from(&off).is_on, Some(false));
    }

    #[test]
    fn parameters_are_nested() {
        let mut params = Map::new();
        params.insert("temp".to_string(), json!(24));
        params.insert("sleepTime".to_string(), json!(300));
        let instruction = FunctionInstruction::new(
            FunctionId::COMFORTABLE_SLEEP,
            Command::On("comfortSleep_on".to_string()),
        )
        .with_parameters(params);

        let value = serde_json::to_value(ControlValue::from(&instruction)).unwrap();
        assert_eq!(
            value,
            json!({
                "functionId": 362,
                "isOn": true,
                "parameters": {"temp": 24, "sleepTime": 300}
            })
        );
    }

    #[test]
    fn conflict_resolution_token() {
        let reply: ConflictReply = serde_json::from_value(json!({
            "title": "Comfortable sleep is running",
            "actions": [
                {"behaviour": "CANCEL", "conflictResolveData": "nope"},
                {"behaviour": "REQUEST", "conflictResolveData": {"token": "abc"}}
            ]
        }))
        .unwrap();
        assert_eq!(reply.resolve_data(), Some(&json!({"token": "abc"})));

        let unresolvable: ConflictReply =
            serde_json::from_value(json!({"title": "Busy", "actions": []})).unwrap();
        assert_eq!(unresolvable.resolve_data(), None);
    }

    #[test]
    fn control_reply_defaults() {
        let reply: ControlReply = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(reply.done);
        assert!(!reply.update_required);
        assert_eq!(reply.errors, None);
    }
}
