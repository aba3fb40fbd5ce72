// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature type.

use std::fmt;

use crate::error::ValueError;
use crate::types::FunctionId;

/// Target temperature in whole degrees Celsius (16-30).
///
/// # Examples
///
/// ```
/// use daichi_hvac::types::TargetTemperature;
///
/// let t = TargetTemperature::new(22).unwrap();
/// assert_eq!(t.celsius(), 22);
/// assert_eq!(t.to_string(), "22°C");
///
/// assert!(TargetTemperature::new(15).is_err());
/// assert!(TargetTemperature::new(31).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetTemperature(pub(super) u8);

impl TargetTemperature {
    /// Lowest settable temperature.
    pub const MIN: u8 = 16;

    /// Highest settable temperature.
    pub const MAX: u8 = 30;

    /// Creates a new target temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [16, 30].
    pub fn new(celsius: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&celsius) {
            return Err(ValueError::OutOfRange {
                function: FunctionId::TEMPERATURE,
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
                actual: i64::from(celsius),
            });
        }
        Ok(Self(celsius))
    }

    /// Returns the temperature in degrees Celsius.
    #[must_use]
    pub const fn celsius(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{00b0}C", self.0)
    }
}

impl TryFrom<u8> for TargetTemperature {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(TargetTemperature::new(16).is_ok());
        assert!(TargetTemperature::new(30).is_ok());
        assert!(TargetTemperature::new(15).is_err());
        assert!(TargetTemperature::new(31).is_err());
    }

    #[test]
    fn error_names_temperature_function() {
        let err = TargetTemperature::new(40).unwrap_err();
        assert!(matches!(
            err,
            ValueError::OutOfRange { function, actual: 40, .. } if function == FunctionId::TEMPERATURE
        ));
    }
}
