// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity change encoding.
//!
//! An encode either returns the complete instruction set or fails and
//! returns nothing. Instructions come out in the order the device should
//! apply them: a prepended power-on first, then by dependency depth.

use serde_json::{Map, Value};

use super::{ComfortSleepRequest, Command, EntityChangeRequest, FunctionInstruction};
use crate::config::{PowerGating, TranslatorConfig};
use crate::error::{EncodeError, ValueError};
use crate::registry::{FunctionDefinition, Registry};
use crate::snapshot::RawValue;
use crate::state::EntityState;
use crate::types::{
    ComfortSleepParams, FanMode, FunctionId, HvacMode, Preset, PresetMode, Swing, SwingMode,
};
use crate::validation::{validate_in, validate_integer, validate_parameters};

/// Encodes entity change requests against a registry.
///
/// # Examples
///
/// ```
/// use daichi_hvac::command::{Command, EntityChangeRequest, Encoder, FunctionInstruction};
/// use daichi_hvac::config::{PowerGating, TranslatorConfig};
/// use daichi_hvac::error::EncodeError;
/// use daichi_hvac::state::EntityState;
/// use daichi_hvac::types::{FunctionId, HvacMode};
///
/// let off = EntityState::default();
/// let request = EntityChangeRequest::SetMode(HvacMode::Heat);
///
/// // default policy powers the device on first
/// let instructions = Encoder::builtin().encode(&off, &request).unwrap();
/// assert_eq!(
///     instructions,
///     vec![
///         FunctionInstruction::new(FunctionId::POWER, Command::Bool(true)),
///         FunctionInstruction::new(FunctionId::HEAT, Command::Activate),
///     ]
/// );
///
/// let strict = Encoder::builtin()
///     .with_config(TranslatorConfig::default().with_power_gating(PowerGating::Reject));
/// assert_eq!(
///     strict.encode(&off, &request),
///     Err(EncodeError::PoweredOff { function: FunctionId::HEAT })
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'r> {
    registry: &'r Registry,
    config: TranslatorConfig,
}

impl Encoder<'static> {
    /// Creates an encoder over the built-in registry with default policies.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Registry::builtin())
    }
}

impl Default for Encoder<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'r> Encoder<'r> {
    /// Creates an encoder over a registry with default policies.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: TranslatorConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TranslatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Encodes a change against the current entity state.
    ///
    /// `current` should be the freshest known state: the power gating
    /// decision is taken from it.
    ///
    /// # Errors
    ///
    /// - `EncodeError::UnknownFunction` if the request touches a function the
    ///   registry does not define
    /// - `EncodeError::InvalidValue` if a value or parameter fails validation
    /// - `EncodeError::PoweredOff` if the device is off and the policy is
    ///   [`PowerGating::Reject`]
    pub fn encode(
        &self,
        current: &EntityState,
        request: &EntityChangeRequest,
    ) -> Result<Vec<FunctionInstruction>, EncodeError> {
        let mut instructions = self.plan(current, request)?;

        // stable, so same-depth instructions keep their planned order
        instructions.sort_by_key(|instruction| {
            self.registry
                .dependency_depth(instruction.function_id)
                .unwrap_or(0)
        });

        if let Some(function) = self.first_gated(current, request, &instructions)? {
            match self.config.power_gating() {
                PowerGating::PrependPowerOn => {
                    tracing::debug!(function = %function, "Device is off, prepending power on");
                    let power = self.switch(FunctionId::POWER, true)?;
                    instructions.insert(0, power);
                }
                PowerGating::Reject => return Err(EncodeError::PoweredOff { function }),
            }
        }

        tracing::debug!(
            request = ?request,
            instructions = instructions.len(),
            "Encoded entity change"
        );

        Ok(instructions)
    }

    /// Builds the instructions for a request, before gating and ordering.
    fn plan(
        &self,
        current: &EntityState,
        request: &EntityChangeRequest,
    ) -> Result<Vec<FunctionInstruction>, EncodeError> {
        match request {
            EntityChangeRequest::SetPower(on) => Ok(vec![self.switch(FunctionId::POWER, *on)?]),
            EntityChangeRequest::SetMode(HvacMode::Off) => {
                Ok(vec![self.switch(FunctionId::POWER, false)?])
            }
            EntityChangeRequest::SetMode(mode) => {
                let id = mode.function_id().unwrap_or(FunctionId::AUTO);
                Ok(vec![self.activate(id)?])
            }
            EntityChangeRequest::SetTemperature(celsius) => {
                let value = RawValue::from_number(*celsius);
                Ok(vec![self.literal(FunctionId::TEMPERATURE, &value)?])
            }
            EntityChangeRequest::SetFanMode(FanMode::Auto) => {
                Ok(vec![self.switch(FunctionId::FAN_SPEED_AUTO, true)?])
            }
            EntityChangeRequest::SetFanMode(FanMode::Speed(speed)) => {
                let value = RawValue::Int(i64::from(speed.value()));
                Ok(vec![self.literal(FunctionId::FAN_SPEED, &value)?])
            }
            EntityChangeRequest::SetFanMode(FanMode::Unrecognized(raw)) => {
                let definition = self.registry.definition_for(FunctionId::FAN_SPEED)?;
                let (min, max) = definition
                    .range
                    .map_or((i64::MIN, i64::MAX), |range| (range.min, range.max));
                Err(ValueError::OutOfRange {
                    function: FunctionId::FAN_SPEED,
                    min,
                    max,
                    actual: *raw,
                }
                .into())
            }
            EntityChangeRequest::SetSwing(swing, on) => {
                Ok(vec![self.switch(swing.function_id(), *on)?])
            }
            EntityChangeRequest::SetPreset(preset, on, params) => {
                Ok(vec![self.preset(current, *preset, *on, params.as_ref())?])
            }
            EntityChangeRequest::SetSwingMode(mode) => self.swing_mode(*mode),
            EntityChangeRequest::SetPresetMode(mode) => self.preset_mode(*mode),
        }
    }

    /// Returns the first instruction that needs power while the device is off.
    fn first_gated(
        &self,
        current: &EntityState,
        request: &EntityChangeRequest,
        instructions: &[FunctionInstruction],
    ) -> Result<Option<FunctionId>, EncodeError> {
        if current.power || matches!(request, EntityChangeRequest::SetPower(_)) {
            return Ok(None);
        }
        for instruction in instructions {
            let definition = self.registry.definition_for(instruction.function_id)?;
            if !definition.ignore_power_off {
                return Ok(Some(instruction.function_id));
            }
        }
        Ok(None)
    }

    fn definition(&self, id: FunctionId) -> Result<&'r FunctionDefinition, EncodeError> {
        Ok(self.registry.definition_for(id)?)
    }

    /// Switches a toggle on or off, using its command pair when it has one.
    fn switch(&self, id: FunctionId, on: bool) -> Result<FunctionInstruction, EncodeError> {
        let definition = self.definition(id)?;
        validate_in(self.registry, definition, &RawValue::Bool(on))?;

        let command = match definition.command(on) {
            Some(literal) if on => Command::On(literal.to_string()),
            Some(literal) => Command::Off(literal.to_string()),
            None => Command::Bool(on),
        };
        Ok(FunctionInstruction::new(id, command))
    }

    /// Switches a function on; applyable functions get a single activation.
    fn activate(&self, id: FunctionId) -> Result<FunctionInstruction, EncodeError> {
        let definition = self.definition(id)?;
        if !definition.is_applyable() {
            return self.switch(id, true);
        }
        validate_in(self.registry, definition, &RawValue::from(id))?;
        Ok(FunctionInstruction::new(id, Command::Activate))
    }

    /// Writes a literal number.
    fn literal(&self, id: FunctionId, value: &RawValue) -> Result<FunctionInstruction, EncodeError> {
        let definition = self.definition(id)?;
        let value = validate_integer(definition, value)?;
        Ok(FunctionInstruction::new(id, Command::Int(value)))
    }

    fn preset(
        &self,
        current: &EntityState,
        preset: Preset,
        on: bool,
        params: Option<&ComfortSleepRequest>,
    ) -> Result<FunctionInstruction, EncodeError> {
        let id = preset.function_id();
        let definition = self.definition(id)?;

        if definition.parameters.is_none() && params.is_some() {
            return Err(ValueError::UnexpectedParameters(id).into());
        }

        let instruction = self.switch(id, on)?;
        if !on || definition.parameters.is_none() {
            return Ok(instruction);
        }

        let parameters = self.comfort_sleep_parameters(current, params);
        validate_parameters(definition, &parameters)?;
        Ok(instruction.with_parameters(parameters))
    }

    /// Fills missing fields from the last known values, then the defaults.
    fn comfort_sleep_parameters(
        &self,
        current: &EntityState,
        request: Option<&ComfortSleepRequest>,
    ) -> Map<String, Value> {
        let mut parameters = current
            .comfort_sleep
            .unwrap_or_else(|| self.config.comfort_sleep_defaults())
            .to_parameters();

        // requested fields are checked by validate_parameters, not here
        if let Some(temp) = request.and_then(|r| r.temp) {
            parameters.insert(ComfortSleepParams::TEMP_KEY.to_string(), Value::from(temp));
        }
        if let Some(sleep_time) = request.and_then(|r| r.sleep_time) {
            parameters.insert(
                ComfortSleepParams::SLEEP_TIME_KEY.to_string(),
                Value::from(sleep_time),
            );
        }
        parameters
    }

    /// Sends an off for every other swing, then an on for the target.
    ///
    /// The decoded state hides swings while the device is off, so the offs
    /// do not depend on it.
    fn swing_mode(&self, mode: SwingMode) -> Result<Vec<FunctionInstruction>, EncodeError> {
        let target = match mode {
            SwingMode::Off => None,
            SwingMode::Vertical => Some(Swing::Vertical),
            SwingMode::Horizontal => Some(Swing::Horizontal),
            SwingMode::Both => Some(Swing::ThreeD),
        };

        let mut instructions = Vec::new();
        if mode != SwingMode::Both {
            for swing in Swing::ALL {
                if Some(swing) != target {
                    instructions.push(self.switch(swing.function_id(), false)?);
                }
            }
        }
        if let Some(swing) = target {
            instructions.push(self.switch(swing.function_id(), true)?);
        }
        Ok(instructions)
    }

    fn preset_mode(&self, mode: PresetMode) -> Result<Vec<FunctionInstruction>, EncodeError> {
        let target = mode.preset();

        let mut instructions = Vec::new();
        for preset in PresetMode::EXCLUSIVE {
            if Some(preset) != target {
                instructions.push(self.switch(preset.function_id(), false)?);
            }
        }
        if let Some(preset) = target {
            instructions.push(self.switch(preset.function_id(), true)?);
        }
        Ok(instructions)
    }
}

/// Encodes a change with the built-in registry and default policies.
///
/// # Errors
///
/// See [`Encoder::encode`].
pub fn encode(
    current: &EntityState,
    request: &EntityChangeRequest,
) -> Result<Vec<FunctionInstruction>, EncodeError> {
    Encoder::builtin().encode(current, request)
}
