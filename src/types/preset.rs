// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preset types and the Comfortable Sleep parameter payload.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::ValueError;
use crate::types::{FunctionId, TargetTemperature};

/// One of the additional operating programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Preset {
    /// Energy saving.
    Eco,
    /// Maximum output.
    Turbo,
    /// Sleep program.
    Sleep,
    /// Comfortable sleep program with temperature and duration.
    ComfortSleep,
    /// Silent indoor unit.
    SoundOff,
    /// Frost protection heating at +8 °C.
    Heat8,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 6] = [
        Self::Eco,
        Self::Turbo,
        Self::Sleep,
        Self::ComfortSleep,
        Self::SoundOff,
        Self::Heat8,
    ];

    /// Returns the function id of this preset.
    #[must_use]
    pub const fn function_id(&self) -> FunctionId {
        match self {
            Self::Eco => FunctionId::ECO,
            Self::Turbo => FunctionId::TURBO,
            Self::Sleep => FunctionId::SLEEP,
            Self::ComfortSleep => FunctionId::COMFORTABLE_SLEEP,
            Self::SoundOff => FunctionId::SOUND_OFF,
            Self::Heat8 => FunctionId::HEATING_PLUS_8,
        }
    }

    /// Returns the name of the preset.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eco => "eco",
            Self::Turbo => "turbo",
            Self::Sleep => "sleep",
            Self::ComfortSleep => "comfort_sleep",
            Self::SoundOff => "sound_off",
            Self::Heat8 => "heat8",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValueError::UnknownVariant {
                kind: "preset",
                value: s.to_string(),
            })
    }
}

/// Exclusive preset selector exposed by climate entities.
///
/// Only eco, turbo and sleep are selectable this way; the other presets
/// are switched individually.
///
/// # Examples
///
/// ```
/// use daichi_hvac::types::{Preset, PresetMode};
///
/// assert_eq!(PresetMode::Turbo.preset(), Some(Preset::Turbo));
/// assert_eq!(PresetMode::None.preset(), None);
/// assert_eq!("eco".parse::<PresetMode>().unwrap(), PresetMode::Eco);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresetMode {
    /// No exclusive preset.
    #[default]
    None,
    /// Eco preset.
    Eco,
    /// Turbo preset.
    Turbo,
    /// Sleep preset.
    Sleep,
}

impl PresetMode {
    /// Presets that the selector switches between, in priority order.
    pub const EXCLUSIVE: [Preset; 3] = [Preset::Eco, Preset::Turbo, Preset::Sleep];

    /// Returns the preset selected by this mode.
    #[must_use]
    pub const fn preset(&self) -> Option<Preset> {
        match self {
            Self::None => None,
            Self::Eco => Some(Preset::Eco),
            Self::Turbo => Some(Preset::Turbo),
            Self::Sleep => Some(Preset::Sleep),
        }
    }

    /// Returns the entity-facing name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Eco => "eco",
            Self::Turbo => "turbo",
            Self::Sleep => "sleep",
        }
    }
}

impl fmt::Display for PresetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "eco" => Ok(Self::Eco),
            "turbo" => Ok(Self::Turbo),
            "sleep" => Ok(Self::Sleep),
            _ => Err(ValueError::UnknownVariant {
                kind: "preset mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Parameters of the Comfortable Sleep program.
///
/// # Examples
///
/// ```
/// use daichi_hvac::types::ComfortSleepParams;
///
/// let params = ComfortSleepParams::default();
/// assert_eq!(params.temp.celsius(), 22);
/// assert_eq!(params.sleep_time, 480);
///
/// let map = params.to_parameters();
/// assert_eq!(map["temp"], 22);
/// assert_eq!(map["sleepTime"], 480);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComfortSleepParams {
    /// Temperature held during the program.
    pub temp: TargetTemperature,
    /// Program duration in minutes.
    pub sleep_time: u32,
}

impl ComfortSleepParams {
    /// Payload key of the temperature.
    pub const TEMP_KEY: &'static str = "temp";

    /// Payload key of the duration.
    pub const SLEEP_TIME_KEY: &'static str = "sleepTime";

    /// Temperature used when nothing better is known.
    pub const DEFAULT_TEMP: u8 = 22;

    /// Duration used when nothing better is known (8 hours).
    pub const DEFAULT_SLEEP_TIME: u32 = 480;

    /// Builds the nested payload sent with the Comfortable Sleep function.
    #[must_use]
    pub fn to_parameters(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(Self::TEMP_KEY.to_string(), Value::from(self.temp.celsius()));
        map.insert(Self::SLEEP_TIME_KEY.to_string(), Value::from(self.sleep_time));
        map
    }

    /// Reads the parameters back from a nested payload.
    ///
    /// Returns `None` if a key is missing or a value does not fit.
    #[must_use]
    pub fn from_parameters(map: &Map<String, Value>) -> Option<Self> {
        let temp = map.get(Self::TEMP_KEY)?.as_u64()?;
        let sleep_time = map.get(Self::SLEEP_TIME_KEY)?.as_u64()?;
        Some(Self {
            temp: TargetTemperature::new(u8::try_from(temp).ok()?).ok()?,
            sleep_time: u32::try_from(sleep_time).ok()?,
        })
    }
}

impl Default for ComfortSleepParams {
    fn default() -> Self {
        Self {
            temp: TargetTemperature(Self::DEFAULT_TEMP),
            sleep_time: Self::DEFAULT_SLEEP_TIME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_function_ids() {
        let ids: Vec<u32> = Preset::ALL.iter().map(|p| p.function_id().value()).collect();
        assert_eq!(ids, vec![363, 364, 366, 362, 365, 332]);
    }

    #[test]
    fn preset_from_str() {
        assert_eq!("SOUND_OFF".parse::<Preset>().unwrap(), Preset::SoundOff);
        assert_eq!("heat8".parse::<Preset>().unwrap(), Preset::Heat8);
        assert!("boost".parse::<Preset>().is_err());
    }

    #[test]
    fn preset_mode_covers_exclusive_presets() {
        let modes = [PresetMode::Eco, PresetMode::Turbo, PresetMode::Sleep];
        for (mode, preset) in modes.iter().zip(PresetMode::EXCLUSIVE) {
            assert_eq!(mode.preset(), Some(preset));
        }
    }

    #[test]
    fn comfort_sleep_from_parameters() {
        let json = serde_json::json!({"temp": 24, "sleepTime": 360});
        let params = ComfortSleepParams::from_parameters(json.as_object().unwrap()).unwrap();
        assert_eq!(params.temp.celsius(), 24);
        assert_eq!(params.sleep_time, 360);
    }

    #[test]
    fn comfort_sleep_rejects_malformed_parameters() {
        let missing = serde_json::json!({"temp": 24});
        assert!(ComfortSleepParams::from_parameters(missing.as_object().unwrap()).is_none());

        let wrong_type = serde_json::json!({"temp": "warm", "sleepTime": 360});
        assert!(ComfortSleepParams::from_parameters(wrong_type.as_object().unwrap()).is_none());

        let out_of_range = serde_json::json!({"temp": 40, "sleepTime": 360});
        assert!(ComfortSleepParams::from_parameters(out_of_range.as_object().unwrap()).is_none());
    }
}
