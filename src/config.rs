// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation policies.

use crate::types::ComfortSleepParams;

/// What the encoder does with a request that needs power while the device
/// is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerGating {
    /// Power the device on first, in the same instruction set.
    #[default]
    PrependPowerOn,
    /// Refuse the request with `EncodeError::PoweredOff`.
    Reject,
}

/// Configuration of the encoder.
///
/// # Examples
///
/// ```
/// use daichi_hvac::config::{PowerGating, TranslatorConfig};
/// use daichi_hvac::types::{ComfortSleepParams, TargetTemperature};
///
/// let config = TranslatorConfig::default()
///     .with_power_gating(PowerGating::Reject)
///     .with_comfort_sleep_defaults(ComfortSleepParams {
///         temp: TargetTemperature::new(24).unwrap(),
///         sleep_time: 360,
///     });
///
/// assert_eq!(config.power_gating(), PowerGating::Reject);
/// assert_eq!(config.comfort_sleep_defaults().sleep_time, 360);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranslatorConfig {
    power_gating: PowerGating,
    comfort_sleep_defaults: ComfortSleepParams,
}

impl TranslatorConfig {
    /// Creates a configuration with the default policies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the power gating policy.
    #[must_use]
    pub fn with_power_gating(mut self, policy: PowerGating) -> Self {
        self.power_gating = policy;
        self
    }

    /// Sets the Comfortable Sleep parameters used when nothing is known.
    #[must_use]
    pub fn with_comfort_sleep_defaults(mut self, defaults: ComfortSleepParams) -> Self {
        self.comfort_sleep_defaults = defaults;
        self
    }

    /// Returns the power gating policy.
    #[must_use]
    pub fn power_gating(&self) -> PowerGating {
        self.power_gating
    }

    /// Returns the Comfortable Sleep fallback parameters.
    #[must_use]
    pub fn comfort_sleep_defaults(&self) -> ComfortSleepParams {
        self.comfort_sleep_defaults
    }
}
