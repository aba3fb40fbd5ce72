// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity change requests and the function instructions they encode to.
//!
//! A caller expresses what it wants as an [`EntityChangeRequest`]. The
//! [`Encoder`] turns it into an ordered list of [`FunctionInstruction`]s,
//! and [`ControlRequest`] turns each instruction into the body the cloud
//! expects.
//!
//! # Request Types
//!
//! | Request | Functions touched | Example |
//! |---------|-------------------|---------|
//! | `SetPower` | 350 | Turn the unit on |
//! | `SetMode` | 352-356 (or 350 for off) | Heat |
//! | `SetTemperature` | 351 | 22 °C |
//! | `SetFanMode` | 357 or 358 | Auto, speed 3 |
//! | `SetSwing` | 359-361 | Vertical on |
//! | `SetPreset` | 362-366, 332 | Eco on |
//! | `SetSwingMode` | 359-361 | Both |
//! | `SetPresetMode` | 363, 364, 366 | Turbo |
//!
//! # Examples
//!
//! ```
//! use daichi_hvac::command::{Command, EntityChangeRequest, FunctionInstruction, encode};
//! use daichi_hvac::state::EntityState;
//! use daichi_hvac::types::{FanMode, FunctionId};
//!
//! let current = EntityState::default()
//!     .with_power(true)
//!     .with_fan_mode(FanMode::Auto);
//!
//! let instructions = encode(&current, &EntityChangeRequest::SetFanMode(FanMode::speed(3)?))?;
//! assert_eq!(
//!     instructions,
//!     vec![FunctionInstruction::new(FunctionId::FAN_SPEED, Command::Int(3))]
//! );
//! # Ok::<(), daichi_hvac::Error>(())
//! ```

mod encoder;
mod payload;

pub use encoder::{Encoder, encode};
pub use payload::{
    ConflictAction, ConflictReply, ControlReply, ControlRequest, ControlValue, generate_cmd_id,
};

use std::fmt;

use serde_json::{Map, Value};

use crate::types::{FanMode, FunctionId, HvacMode, Preset, PresetMode, Swing, SwingMode};

/// What to send to one function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Literal on/off value.
    Bool(bool),
    /// Literal number.
    Int(i64),
    /// The function's on-command.
    On(String),
    /// The function's off-command.
    Off(String),
    /// Activation of an applyable function.
    Activate,
}

impl Command {
    /// Returns `true` if the command leaves the function switched on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        match self {
            Self::Bool(on) => *on,
            Self::Int(n) => *n != 0,
            Self::On(_) | Self::Activate => true,
            Self::Off(_) => false,
        }
    }

    /// Returns the command literal of an on/off command.
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::On(cmd) | Self::Off(cmd) => Some(cmd),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(on) => write!(f, "{on}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::On(cmd) | Self::Off(cmd) => f.write_str(cmd),
            Self::Activate => f.write_str("activate"),
        }
    }
}

/// One update addressed to one function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInstruction {
    /// Target function.
    pub function_id: FunctionId,
    /// What to send.
    pub command: Command,
    /// Nested payload, for functions that declare a parameter schema.
    pub parameters: Option<Map<String, Value>>,
}

impl FunctionInstruction {
    /// Creates an instruction without parameters.
    #[must_use]
    pub fn new(function_id: FunctionId, command: Command) -> Self {
        Self {
            function_id,
            command,
            parameters: None,
        }
    }

    /// Attaches a nested payload.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

impl fmt::Display for FunctionInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.function_id, self.command)?;
        if let Some(parameters) = &self.parameters {
            write!(f, " {}", Value::Object(parameters.clone()))?;
        }
        Ok(())
    }
}

/// Partial Comfortable Sleep parameters supplied by a caller.
///
/// Missing fields are filled from the last known device values, then from
/// the configured defaults. Values are checked against the parameter schema
/// during encoding, so out-of-range input is representable here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ComfortSleepRequest {
    /// Temperature to hold, in degrees Celsius.
    pub temp: Option<i64>,
    /// Duration in minutes.
    pub sleep_time: Option<i64>,
}

impl ComfortSleepRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temp(mut self, temp: i64) -> Self {
        self.temp = Some(temp);
        self
    }

    /// Sets the duration in minutes.
    #[must_use]
    pub fn with_sleep_time(mut self, minutes: i64) -> Self {
        self.sleep_time = Some(minutes);
        self
    }
}

/// An entity-level change.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityChangeRequest {
    /// Turn the device on or off.
    SetPower(bool),
    /// Select an operating mode; `Off` powers the device down.
    SetMode(HvacMode),
    /// Set the target temperature in degrees Celsius.
    SetTemperature(f64),
    /// Select automatic or manual fan speed.
    SetFanMode(FanMode),
    /// Switch one swing function.
    SetSwing(Swing, bool),
    /// Switch one preset, with optional Comfortable Sleep parameters.
    SetPreset(Preset, bool, Option<ComfortSleepRequest>),
    /// Select the combined swing state.
    SetSwingMode(SwingMode),
    /// Select the exclusive preset.
    SetPresetMode(PresetMode),
}
