// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating mode of a climate entity.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::types::FunctionId;

/// HVAC operating mode as seen by the climate entity.
///
/// `Off` is not a device mode: it is how a powered-off device is presented.
///
/// # Examples
///
/// ```
/// use daichi_hvac::types::{FunctionId, HvacMode};
///
/// assert_eq!(HvacMode::Heat.function_id(), Some(FunctionId::HEAT));
/// assert_eq!(HvacMode::Off.function_id(), None);
/// assert_eq!("fan_only".parse::<HvacMode>().unwrap(), HvacMode::FanOnly);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HvacMode {
    /// Device is powered off.
    #[default]
    Off,
    /// Cooling.
    Cool,
    /// Heating.
    Heat,
    /// Automatic heat/cool.
    Auto,
    /// Dehumidification.
    Dry,
    /// Ventilation only.
    FanOnly,
}

impl HvacMode {
    /// Returns the entity-facing name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Cool => "cool",
            Self::Heat => "heat",
            Self::Auto => "auto",
            Self::Dry => "dry",
            Self::FanOnly => "fan_only",
        }
    }

    /// Returns the applyable function that activates this mode.
    ///
    /// `Off` has none; it is expressed through the power function.
    #[must_use]
    pub const fn function_id(&self) -> Option<FunctionId> {
        match self {
            Self::Off => None,
            Self::Cool => Some(FunctionId::COOL),
            Self::Heat => Some(FunctionId::HEAT),
            Self::Auto => Some(FunctionId::AUTO),
            Self::Dry => Some(FunctionId::DRY),
            Self::FanOnly => Some(FunctionId::FAN),
        }
    }

    /// Returns the mode activated by an operating-mode function.
    #[must_use]
    pub const fn from_function_id(id: FunctionId) -> Option<Self> {
        match id {
            FunctionId::COOL => Some(Self::Cool),
            FunctionId::HEAT => Some(Self::Heat),
            FunctionId::AUTO => Some(Self::Auto),
            FunctionId::DRY => Some(Self::Dry),
            FunctionId::FAN => Some(Self::FanOnly),
            _ => None,
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "cool" => Ok(Self::Cool),
            "heat" => Ok(Self::Heat),
            "auto" => Ok(Self::Auto),
            "dry" => Ok(Self::Dry),
            "fan_only" | "fan" => Ok(Self::FanOnly),
            _ => Err(ValueError::UnknownVariant {
                kind: "hvac mode",
                value: s.to_string(),
            }),
        }
    }
}
