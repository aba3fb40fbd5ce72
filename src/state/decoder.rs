// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot decoding.
//!
//! Decoding is best effort. Unexpected device data degrades into a
//! [`DecodeAnomaly`] on the report instead of an error; the only failure is
//! a snapshot whose power state cannot be read.

use std::fmt;

use super::EntityState;
use crate::error::DecodeError;
use crate::registry::Registry;
use crate::snapshot::{DeviceStateSnapshot, RawValue, ValueKind};
use crate::types::{
    ComfortSleepParams, FanMode, FanSpeed, FunctionId, HvacMode, Preset, Swing, TargetTemperature,
};

/// Something unexpected found while decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeAnomaly {
    /// Several operating modes were active; the lowest id was kept.
    ConflictingModes {
        /// All active mode functions, in ascending order.
        active: Vec<FunctionId>,
        /// The mode that was kept.
        chosen: FunctionId,
    },
    /// The device was on with no active operating mode; `auto` was assumed.
    NoActiveMode,
    /// A value had a kind the function cannot hold; it was ignored.
    UnreadableValue {
        /// The function reporting the value.
        function: FunctionId,
        /// What was found.
        kind: ValueKind,
    },
    /// The target temperature is outside 16-30; it was kept as is.
    TemperatureOutOfRange(f64),
    /// The fan speed is outside 1-5; it was kept as `FanMode::Unrecognized`.
    FanSpeedOutOfRange(i64),
    /// Comfortable Sleep is active but its parameters could not be read.
    MalformedParameters(FunctionId),
}

impl fmt::Display for DecodeAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingModes { active, chosen } => {
                let ids: Vec<String> = active.iter().map(ToString::to_string).collect();
                write!(f, "modes {} active at once, kept {chosen}", ids.join(", "))
            }
            Self::NoActiveMode => f.write_str("no active mode while powered, assumed auto"),
            Self::UnreadableValue { function, kind } => {
                write!(f, "function {function} reported an unreadable {kind}")
            }
            Self::TemperatureOutOfRange(value) => {
                write!(f, "target temperature {value} is out of range")
            }
            Self::FanSpeedOutOfRange(value) => write!(f, "fan speed {value} is out of range"),
            Self::MalformedParameters(function) => {
                write!(f, "function {function} has malformed parameters")
            }
        }
    }
}

/// Side information collected while decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    /// Unexpected data, in the order it was found.
    pub anomalies: Vec<DecodeAnomaly>,
    /// Snapshot ids absent from the registry, in ascending order.
    pub unsupported: Vec<FunctionId>,
}

impl DecodeReport {
    /// Returns `true` if nothing unexpected was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty() && self.unsupported.is_empty()
    }
}

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The normalized state.
    pub state: EntityState,
    /// What was unexpected about the snapshot.
    pub report: DecodeReport,
}

/// Decodes snapshots against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r Registry,
}

impl Decoder<'static> {
    /// Creates a decoder over the built-in registry.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Registry::builtin())
    }
}

impl Default for Decoder<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'r> Decoder<'r> {
    /// Creates a decoder over a registry.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Decodes a snapshot into an entity state.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::IncompleteSnapshot` if the power function is
    /// missing or cannot be read as on/off. The device should then be
    /// treated as unavailable, not as off.
    pub fn decode(&self, snapshot: &DeviceStateSnapshot) -> Result<Decoded, DecodeError> {
        let raw_power = snapshot.get(FunctionId::POWER);
        let power = raw_power
            .and_then(RawValue::as_flag)
            .ok_or(DecodeError::IncompleteSnapshot {
                found: raw_power.map(RawValue::kind),
            })?;

        let mut report = DecodeReport::default();
        let mut state = EntityState {
            power,
            ..EntityState::default()
        };

        state.mode = self.decode_mode(snapshot, power, &mut report);
        state.target_temperature = self.decode_temperature(snapshot, &mut report);
        state.fan_mode = self.decode_fan_mode(snapshot, &mut report);

        for swing in Swing::ALL {
            if self.read_switch(snapshot, swing.function_id(), power, &mut report) {
                state.swing.insert(swing);
            }
        }
        for preset in Preset::ALL {
            if self.read_switch(snapshot, preset.function_id(), power, &mut report) {
                state.presets.insert(preset);
            }
        }

        if state.presets.contains(&Preset::ComfortSleep) {
            state.comfort_sleep = decode_comfort_sleep(snapshot, &mut report);
        }

        report.unsupported = snapshot
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !self.registry.contains(*id))
            .collect();
        if !report.unsupported.is_empty() {
            tracing::debug!(
                unsupported = ?report.unsupported,
                "Snapshot contains functions outside the registry"
            );
        }

        Ok(Decoded { state, report })
    }

    fn decode_mode(
        &self,
        snapshot: &DeviceStateSnapshot,
        power: bool,
        report: &mut DecodeReport,
    ) -> HvacMode {
        if !power {
            return HvacMode::Off;
        }

        let mut active = Vec::new();
        for id in FunctionId::MODES {
            if !self.registry.contains(id) {
                continue;
            }
            if read_flag(snapshot, id, report) == Some(true) {
                active.push(id);
            }
        }

        let Some(&chosen) = active.first() else {
            tracing::warn!("No operating mode active while powered, assuming auto");
            report.anomalies.push(DecodeAnomaly::NoActiveMode);
            return HvacMode::Auto;
        };

        if active.len() > 1 {
            tracing::warn!(
                active = ?active,
                chosen = %chosen,
                "Several operating modes active, keeping the lowest id"
            );
            report
                .anomalies
                .push(DecodeAnomaly::ConflictingModes { active, chosen });
        }
        HvacMode::from_function_id(chosen).unwrap_or(HvacMode::Auto)
    }

    /// Returns the registry range of a function, or `fallback` when the
    /// registry declares none.
    fn range_of(&self, id: FunctionId, fallback: (i64, i64)) -> (i64, i64) {
        self.registry
            .get(id)
            .and_then(|definition| definition.range)
            .map_or(fallback, |range| (range.min, range.max))
    }

    fn decode_temperature(
        &self,
        snapshot: &DeviceStateSnapshot,
        report: &mut DecodeReport,
    ) -> Option<f64> {
        let raw = snapshot.get(FunctionId::TEMPERATURE)?;
        let Some(value) = raw.as_number() else {
            unreadable(FunctionId::TEMPERATURE, raw, report);
            return None;
        };

        let (min, max) = self.range_of(
            FunctionId::TEMPERATURE,
            (
                i64::from(TargetTemperature::MIN),
                i64::from(TargetTemperature::MAX),
            ),
        );
        #[allow(clippy::cast_precision_loss)]
        let in_range = (min as f64..=max as f64).contains(&value);
        if !in_range {
            tracing::warn!(value, min, max, "Target temperature out of range");
            report
                .anomalies
                .push(DecodeAnomaly::TemperatureOutOfRange(value));
        }
        Some(value)
    }

    fn decode_fan_mode(
        &self,
        snapshot: &DeviceStateSnapshot,
        report: &mut DecodeReport,
    ) -> Option<FanMode> {
        if read_flag(snapshot, FunctionId::FAN_SPEED_AUTO, report) == Some(true) {
            return Some(FanMode::Auto);
        }

        let raw = snapshot.get(FunctionId::FAN_SPEED)?;
        let Some(value) = raw.as_integer() else {
            unreadable(FunctionId::FAN_SPEED, raw, report);
            return None;
        };

        let (min, max) = self.range_of(
            FunctionId::FAN_SPEED,
            (i64::from(FanSpeed::MIN), i64::from(FanSpeed::MAX)),
        );
        if !(min..=max).contains(&value) {
            tracing::warn!(value, min, max, "Fan speed out of range");
            report
                .anomalies
                .push(DecodeAnomaly::FanSpeedOutOfRange(value));
            return Some(FanMode::Unrecognized(value));
        }

        // a table may allow speeds the entity type cannot name
        Some(
            u8::try_from(value)
                .ok()
                .and_then(|v| FanSpeed::new(v).ok())
                .map_or(FanMode::Unrecognized(value), FanMode::Speed),
        )
    }

    /// Reads a swing or preset flag, applying power normalization.
    fn read_switch(
        &self,
        snapshot: &DeviceStateSnapshot,
        id: FunctionId,
        power: bool,
        report: &mut DecodeReport,
    ) -> bool {
        let Some(definition) = self.registry.get(id) else {
            return false;
        };
        let on = read_flag(snapshot, id, report).unwrap_or(false);
        on && (power || definition.ignore_power_off)
    }
}

/// Decodes a snapshot with the built-in registry.
///
/// # Errors
///
/// Returns `DecodeError::IncompleteSnapshot` if the power state cannot be
/// established.
///
/// # Examples
///
/// ```
/// use daichi_hvac::snapshot::{DeviceStateSnapshot, RawValue};
/// use daichi_hvac::state::decode;
/// use daichi_hvac::types::{FanMode, FunctionId, HvacMode};
///
/// let snapshot: DeviceStateSnapshot = [
///     (FunctionId::POWER, RawValue::Bool(true)),
///     (FunctionId::HEAT, RawValue::Bool(true)),
///     (FunctionId::TEMPERATURE, RawValue::Int(21)),
///     (FunctionId::FAN_SPEED_AUTO, RawValue::Bool(true)),
/// ]
/// .into_iter()
/// .collect();
///
/// let decoded = decode(&snapshot).unwrap();
/// assert_eq!(decoded.state.mode, HvacMode::Heat);
/// assert_eq!(decoded.state.target_temperature, Some(21.0));
/// assert_eq!(decoded.state.fan_mode, Some(FanMode::Auto));
/// assert!(decoded.report.is_clean());
/// ```
pub fn decode(snapshot: &DeviceStateSnapshot) -> Result<Decoded, DecodeError> {
    Decoder::builtin().decode(snapshot)
}

fn read_flag(
    snapshot: &DeviceStateSnapshot,
    id: FunctionId,
    report: &mut DecodeReport,
) -> Option<bool> {
    let raw = snapshot.get(id)?;
    let flag = raw.as_flag();
    if flag.is_none() {
        unreadable(id, raw, report);
    }
    flag
}

fn unreadable(function: FunctionId, raw: &RawValue, report: &mut DecodeReport) {
    let kind = raw.kind();
    tracing::warn!(function = %function, kind = %kind, "Ignoring unreadable function value");
    report
        .anomalies
        .push(DecodeAnomaly::UnreadableValue { function, kind });
}

fn decode_comfort_sleep(
    snapshot: &DeviceStateSnapshot,
    report: &mut DecodeReport,
) -> Option<ComfortSleepParams> {
    let parameters = snapshot
        .get(FunctionId::COMFORTABLE_SLEEP)
        .and_then(RawValue::as_object)
        .and_then(|object| object.get(RawValue::PARAMETERS_KEY))
        .filter(|value| !value.is_null())?;

    let params = parameters
        .as_object()
        .and_then(ComfortSleepParams::from_parameters);
    if params.is_none() {
        tracing::warn!(parameters = %parameters, "Malformed Comfortable Sleep parameters");
        report
            .anomalies
            .push(DecodeAnomaly::MalformedParameters(FunctionId::COMFORTABLE_SLEEP));
    }
    params
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::types::PresetMode;

    fn snapshot(values: &[(FunctionId, RawValue)]) -> DeviceStateSnapshot {
        values.iter().cloned().collect()
    }

    #[test]
    fn missing_power_is_incomplete() {
        let result = decode(&snapshot(&[(FunctionId::HEAT, RawValue::Bool(true))]));
        assert_eq!(result, Err(DecodeError::IncompleteSnapshot { found: None }));
    }

    #[test]
    fn unreadable_power_is_incomplete() {
        let result = decode(&snapshot(&[(
            FunctionId::POWER,
            RawValue::Other(Value::from("on")),
        )]));
        assert_eq!(
            result,
            Err(DecodeError::IncompleteSnapshot {
                found: Some(ValueKind::Text)
            })
        );
    }

    #[test]
    fn power_off_reads_mode_off() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(false)),
            (FunctionId::COOL, RawValue::Bool(true)),
        ]))
        .unwrap();
        assert_eq!(decoded.state.mode, HvacMode::Off);
        assert!(decoded.report.anomalies.is_empty());
    }

    #[test]
    fn conflicting_modes_keep_lowest_id() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(true)),
            (FunctionId::DRY, RawValue::Bool(true)),
            (FunctionId::HEAT, RawValue::Bool(true)),
        ]))
        .unwrap();
        assert_eq!(decoded.state.mode, HvacMode::Heat);
        assert_eq!(
            decoded.report.anomalies,
            vec![DecodeAnomaly::ConflictingModes {
                active: vec![FunctionId::HEAT, FunctionId::DRY],
                chosen: FunctionId::HEAT,
            }]
        );
    }

    #[test]
    fn ranges_come_from_the_registry() {
        use crate::registry::FunctionDefinition;

        let registry = Registry::new(vec![
            FunctionDefinition::boolean(FunctionId::POWER, "Power").with_ignore_power_off(),
            FunctionDefinition::integer_range(FunctionId::TEMPERATURE, "Temperature", 10, 35),
            FunctionDefinition::integer_range(FunctionId::FAN_SPEED, "Fan speed", 1, 3),
        ])
        .unwrap();
        let decoder = Decoder::new(&registry);

        let decoded = decoder
            .decode(&snapshot(&[
                (FunctionId::POWER, RawValue::Bool(false)),
                (FunctionId::TEMPERATURE, RawValue::Int(12)),
                (FunctionId::FAN_SPEED, RawValue::Int(4)),
            ]))
            .unwrap();

        assert_eq!(decoded.state.target_temperature, Some(12.0));
        assert_eq!(decoded.state.fan_mode, Some(FanMode::Unrecognized(4)));
        assert_eq!(
            decoded.report.anomalies,
            vec![DecodeAnomaly::FanSpeedOutOfRange(4)]
        );
    }

    #[test]
    fn no_active_mode_assumes_auto() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(true)),
            (FunctionId::COOL, RawValue::Bool(false)),
        ]))
        .unwrap();
        assert_eq!(decoded.state.mode, HvacMode::Auto);
        assert_eq!(decoded.report.anomalies, vec![DecodeAnomaly::NoActiveMode]);
    }

    #[test]
    fn temperature_out_of_range_is_preserved() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(false)),
            (FunctionId::TEMPERATURE, RawValue::Int(35)),
        ]))
        .unwrap();
        assert_eq!(decoded.state.target_temperature, Some(35.0));
        assert_eq!(
            decoded.report.anomalies,
            vec![DecodeAnomaly::TemperatureOutOfRange(35.0)]
        );
    }

    #[test]
    fn non_numeric_temperature_is_absent() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(false)),
            (FunctionId::TEMPERATURE, RawValue::Bool(true)),
        ]))
        .unwrap();
        assert_eq!(decoded.state.target_temperature, None);
        assert!(matches!(
            decoded.report.anomalies[..],
            [DecodeAnomaly::UnreadableValue { kind: ValueKind::Boolean, .. }]
        ));
    }

    #[test]
    fn fan_speed_out_of_range_is_unrecognized() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(false)),
            (FunctionId::FAN_SPEED_AUTO, RawValue::Bool(false)),
            (FunctionId::FAN_SPEED, RawValue::Int(7)),
        ]))
        .unwrap();
        assert_eq!(decoded.state.fan_mode, Some(FanMode::Unrecognized(7)));
        assert_eq!(
            decoded.report.anomalies,
            vec![DecodeAnomaly::FanSpeedOutOfRange(7)]
        );
    }

    #[test]
    fn fan_auto_wins_over_speed() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(false)),
            (FunctionId::FAN_SPEED_AUTO, RawValue::Bool(true)),
            (FunctionId::FAN_SPEED, RawValue::Int(9)),
        ]))
        .unwrap();
        assert_eq!(decoded.state.fan_mode, Some(FanMode::Auto));
        assert!(decoded.report.anomalies.is_empty());
    }

    #[test]
    fn power_off_normalizes_dependent_switches() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(false)),
            (FunctionId::VERTICAL_SWING, RawValue::Bool(true)),
            (FunctionId::ECO, RawValue::Bool(true)),
            (FunctionId::SOUND_OFF, RawValue::Bool(true)),
            (FunctionId::HEATING_PLUS_8, RawValue::Bool(true)),
        ]))
        .unwrap();
        assert!(decoded.state.swing.is_empty());
        assert_eq!(
            decoded.state.presets.iter().copied().collect::<Vec<_>>(),
            vec![Preset::SoundOff, Preset::Heat8]
        );
        assert_eq!(decoded.state.preset_mode(), PresetMode::None);
    }

    #[test]
    fn comfort_sleep_parameters() {
        let raw: RawValue =
            serde_json::from_value(json!({"isOn": true, "parameters": {"temp": 25, "sleepTime": 120}}))
                .unwrap();
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(true)),
            (FunctionId::COOL, RawValue::Bool(true)),
            (FunctionId::COMFORTABLE_SLEEP, raw),
        ]))
        .unwrap();
        let params = decoded.state.comfort_sleep.unwrap();
        assert_eq!(params.temp.celsius(), 25);
        assert_eq!(params.sleep_time, 120);
    }

    #[test]
    fn malformed_comfort_sleep_stays_active() {
        let raw: RawValue =
            serde_json::from_value(json!({"isOn": true, "parameters": {"temp": "warm"}})).unwrap();
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(true)),
            (FunctionId::COOL, RawValue::Bool(true)),
            (FunctionId::COMFORTABLE_SLEEP, raw),
        ]))
        .unwrap();
        assert!(decoded.state.is_preset_active(Preset::ComfortSleep));
        assert_eq!(decoded.state.comfort_sleep, None);
        assert_eq!(
            decoded.report.anomalies,
            vec![DecodeAnomaly::MalformedParameters(FunctionId::COMFORTABLE_SLEEP)]
        );
    }

    #[test]
    fn unknown_ids_are_unsupported() {
        let decoded = decode(&snapshot(&[
            (FunctionId::POWER, RawValue::Bool(false)),
            (FunctionId::new(401), RawValue::Int(1)),
            (FunctionId::new(12), RawValue::Bool(true)),
        ]))
        .unwrap();
        assert_eq!(
            decoded.report.unsupported,
            vec![FunctionId::new(12), FunctionId::new(401)]
        );
    }
}
