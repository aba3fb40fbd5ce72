// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Function identifiers and the categories derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer key identifying one controllable or readable device feature.
///
/// The cloud service numbers every feature of an air conditioner. The
/// well-known ids used by the built-in function table are available as
/// associated constants.
///
/// # Examples
///
/// ```
/// use daichi_hvac::types::{FunctionCategory, FunctionId};
///
/// assert_eq!(FunctionId::HEAT.value(), 353);
/// assert_eq!(FunctionId::HEAT.category(), FunctionCategory::OperatingMode);
/// assert!(FunctionId::HEAT.category().is_exclusive());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FunctionId(u32);

impl FunctionId {
    /// Device power.
    pub const POWER: Self = Self(350);
    /// Target temperature.
    pub const TEMPERATURE: Self = Self(351);
    /// Cooling mode.
    pub const COOL: Self = Self(352);
    /// Heating mode.
    pub const HEAT: Self = Self(353);
    /// Automatic mode.
    pub const AUTO: Self = Self(354);
    /// Dehumidification mode.
    pub const DRY: Self = Self(355);
    /// Fan-only mode.
    pub const FAN: Self = Self(356);
    /// Automatic fan speed.
    pub const FAN_SPEED_AUTO: Self = Self(357);
    /// Numeric fan speed (1-5).
    pub const FAN_SPEED: Self = Self(358);
    /// Vertical louver swing.
    pub const VERTICAL_SWING: Self = Self(359);
    /// Horizontal louver swing.
    pub const HORIZONTAL_SWING: Self = Self(360);
    /// Combined 3D swing.
    pub const SWING_3D: Self = Self(361);
    /// Comfortable sleep program (carries `temp` and `sleepTime`).
    pub const COMFORTABLE_SLEEP: Self = Self(362);
    /// Eco preset.
    pub const ECO: Self = Self(363);
    /// Turbo preset.
    pub const TURBO: Self = Self(364);
    /// Silent operation.
    pub const SOUND_OFF: Self = Self(365);
    /// Sleep preset.
    pub const SLEEP: Self = Self(366);
    /// Frost protection heating at +8 °C.
    pub const HEATING_PLUS_8: Self = Self(332);

    /// The five operating-mode functions in ascending id order.
    pub const MODES: [Self; 5] = [Self::COOL, Self::HEAT, Self::AUTO, Self::DRY, Self::FAN];

    /// Creates a function id from its raw number.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw number.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns the category this id belongs to.
    ///
    /// Categories are derived from the well-known ids; ids outside that set
    /// fall into [`FunctionCategory::Other`].
    #[must_use]
    pub const fn category(&self) -> FunctionCategory {
        match self.0 {
            350 => FunctionCategory::Power,
            351 => FunctionCategory::Temperature,
            352..=356 => FunctionCategory::OperatingMode,
            357 | 358 => FunctionCategory::FanSpeed,
            359..=361 => FunctionCategory::Swing,
            362..=366 | 332 => FunctionCategory::Preset,
            _ => FunctionCategory::Other,
        }
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FunctionId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Group of functions that share a role on the device.
///
/// Members of an exclusive category cannot be active together: activating
/// one implicitly deactivates its siblings on the device side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCategory {
    /// Device power.
    Power,
    /// Target temperature.
    Temperature,
    /// The five operating modes (352-356).
    OperatingMode,
    /// Automatic and numeric fan speed (357-358).
    FanSpeed,
    /// Louver swing functions (359-361).
    Swing,
    /// Additional operating presets (362-366, 332).
    Preset,
    /// Ids outside the well-known set.
    Other,
}

impl FunctionCategory {
    /// Returns `true` if at most one member can be active at a time.
    #[must_use]
    pub const fn is_exclusive(&self) -> bool {
        matches!(self, Self::OperatingMode | Self::FanSpeed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_ids_are_operating_modes() {
        for id in FunctionId::MODES {
            assert_eq!(id.category(), FunctionCategory::OperatingMode);
        }
    }

    #[test]
    fn heating_plus_8_is_a_preset() {
        assert_eq!(
            FunctionId::HEATING_PLUS_8.category(),
            FunctionCategory::Preset
        );
    }

    #[test]
    fn unknown_ids_fall_into_other() {
        assert_eq!(FunctionId::new(1).category(), FunctionCategory::Other);
        assert_eq!(FunctionId::new(367).category(), FunctionCategory::Other);
    }

    #[test]
    fn exclusivity() {
        assert!(FunctionCategory::OperatingMode.is_exclusive());
        assert!(FunctionCategory::FanSpeed.is_exclusive());
        assert!(!FunctionCategory::Swing.is_exclusive());
        assert!(!FunctionCategory::Preset.is_exclusive());
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&FunctionId::POWER).unwrap();
        assert_eq!(json, "350");
        let id: FunctionId = serde_json::from_str("358").unwrap();
        assert_eq!(id, FunctionId::FAN_SPEED);
    }
}
