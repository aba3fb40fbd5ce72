// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed types.
//!
//! The device exposes fan speed through two linked functions: an automatic
//! flag (357) and a numeric speed (358). [`FanMode`] folds both into one
//! entity attribute.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::types::FunctionId;

/// Manual fan speed (1-5).
///
/// # Examples
///
/// ```
/// use daichi_hvac::types::FanSpeed;
///
/// let speed = FanSpeed::new(3).unwrap();
/// assert_eq!(speed.value(), 3);
///
/// assert!(FanSpeed::new(0).is_err());
/// assert!(FanSpeed::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FanSpeed(u8);

impl FanSpeed {
    /// Lowest manual speed.
    pub const MIN: u8 = 1;

    /// Highest manual speed.
    pub const MAX: u8 = 5;

    /// Creates a new fan speed.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 5].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                function: FunctionId::FAN_SPEED,
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the speed value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Fan mode of a climate entity.
///
/// `Unrecognized` keeps a numeric speed reported by the device that falls
/// outside 1-5. It is never clamped so that callers can see what the device
/// actually said.
///
/// # Examples
///
/// ```
/// use daichi_hvac::types::{FanMode, FanSpeed};
///
/// assert_eq!("auto".parse::<FanMode>().unwrap(), FanMode::Auto);
/// assert_eq!(
///     "3".parse::<FanMode>().unwrap(),
///     FanMode::Speed(FanSpeed::new(3).unwrap())
/// );
/// assert_eq!(FanMode::Unrecognized(9).to_string(), "9");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanMode {
    /// Automatic fan speed.
    Auto,
    /// Manual speed.
    Speed(FanSpeed),
    /// A numeric speed outside the supported range, as reported.
    Unrecognized(i64),
}

impl FanMode {
    /// Creates a manual fan mode.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 5].
    pub fn speed(value: u8) -> Result<Self, ValueError> {
        FanSpeed::new(value).map(Self::Speed)
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Speed(speed) => write!(f, "{speed}"),
            Self::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

impl FromStr for FanMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let value: u8 = s.parse().map_err(|_| ValueError::UnknownVariant {
            kind: "fan mode",
            value: s.to_string(),
        })?;
        Self::speed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_speed_valid() {
        for v in 1..=5 {
            assert_eq!(FanSpeed::new(v).unwrap().value(), v);
        }
    }

    #[test]
    fn fan_speed_invalid() {
        assert!(matches!(
            FanSpeed::new(0),
            Err(ValueError::OutOfRange { actual: 0, .. })
        ));
        assert!(matches!(
            FanSpeed::new(6),
            Err(ValueError::OutOfRange { actual: 6, .. })
        ));
    }

    #[test]
    fn fan_mode_from_str() {
        assert_eq!("AUTO".parse::<FanMode>().unwrap(), FanMode::Auto);
        assert_eq!(
            "5".parse::<FanMode>().unwrap(),
            FanMode::speed(5).unwrap()
        );
        assert!("6".parse::<FanMode>().is_err());
        assert!(matches!(
            "turbo".parse::<FanMode>(),
            Err(ValueError::UnknownVariant { kind: "fan mode", .. })
        ));
    }
}
