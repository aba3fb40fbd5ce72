// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized climate entity state.

use std::collections::BTreeSet;

use crate::types::{ComfortSleepParams, FanMode, HvacMode, Preset, PresetMode, Swing, SwingMode};

/// State of a climate entity as seen by the host platform.
///
/// Produced by the decoder from a device snapshot, and read by the encoder
/// to decide how to apply a change.
///
/// # Examples
///
/// ```
/// use daichi_hvac::state::EntityState;
/// use daichi_hvac::types::{HvacMode, Preset, PresetMode, Swing, SwingMode};
///
/// let state = EntityState::default()
///     .with_mode(HvacMode::Cool)
///     .with_swing(Swing::Vertical)
///     .with_swing(Swing::Horizontal)
///     .with_preset(Preset::Turbo);
///
/// assert!(state.power);
/// assert_eq!(state.swing_mode(), SwingMode::Both);
/// assert_eq!(state.preset_mode(), PresetMode::Turbo);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityState {
    /// Whether the device is on.
    pub power: bool,

    /// Operating mode; `Off` whenever the device is off.
    pub mode: HvacMode,

    /// Target temperature in degrees Celsius, as reported.
    pub target_temperature: Option<f64>,

    /// Fan mode, if reported.
    pub fan_mode: Option<FanMode>,

    /// Active swing functions.
    pub swing: BTreeSet<Swing>,

    /// Active presets.
    pub presets: BTreeSet<Preset>,

    /// Comfortable Sleep parameters, when the program is active and they
    /// could be read.
    pub comfort_sleep: Option<ComfortSleepParams>,
}

impl EntityState {
    /// Returns `true` if the swing function is active.
    #[must_use]
    pub fn is_swing_active(&self, swing: Swing) -> bool {
        self.swing.contains(&swing)
    }

    /// Returns `true` if the preset is active.
    #[must_use]
    pub fn is_preset_active(&self, preset: Preset) -> bool {
        self.presets.contains(&preset)
    }

    /// Returns the combined swing state.
    ///
    /// 3D swing, or vertical and horizontal together, read as `Both`.
    #[must_use]
    pub fn swing_mode(&self) -> SwingMode {
        let vertical = self.is_swing_active(Swing::Vertical);
        let horizontal = self.is_swing_active(Swing::Horizontal);

        if self.is_swing_active(Swing::ThreeD) || (vertical && horizontal) {
            SwingMode::Both
        } else if vertical {
            SwingMode::Vertical
        } else if horizontal {
            SwingMode::Horizontal
        } else {
            SwingMode::Off
        }
    }

    /// Returns the first active exclusive preset, in eco/turbo/sleep order.
    #[must_use]
    pub fn preset_mode(&self) -> PresetMode {
        match PresetMode::EXCLUSIVE
            .into_iter()
            .find(|preset| self.is_preset_active(*preset))
        {
            Some(Preset::Eco) => PresetMode::Eco,
            Some(Preset::Turbo) => PresetMode::Turbo,
            Some(Preset::Sleep) => PresetMode::Sleep,
            _ => PresetMode::None,
        }
    }

    /// Sets the power flag. Switching off also sets the mode to `Off`.
    #[must_use]
    pub fn with_power(mut self, power: bool) -> Self {
        self.power = power;
        if !power {
            self.mode = HvacMode::Off;
        }
        self
    }

    /// Sets the operating mode. Any mode other than `Off` implies power.
    #[must_use]
    pub fn with_mode(mut self, mode: HvacMode) -> Self {
        self.mode = mode;
        self.power = mode != HvacMode::Off;
        self
    }

    /// Sets the target temperature.
    #[must_use]
    pub fn with_target_temperature(mut self, celsius: f64) -> Self {
        self.target_temperature = Some(celsius);
        self
    }

    /// Sets the fan mode.
    #[must_use]
    pub fn with_fan_mode(mut self, fan_mode: FanMode) -> Self {
        self.fan_mode = Some(fan_mode);
        self
    }

    /// Marks a swing function active.
    #[must_use]
    pub fn with_swing(mut self, swing: Swing) -> Self {
        self.swing.insert(swing);
        self
    }

    /// Marks a preset active.
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.presets.insert(preset);
        self
    }

    /// Marks Comfortable Sleep active with known parameters.
    #[must_use]
    pub fn with_comfort_sleep(mut self, params: ComfortSleepParams) -> Self {
        self.presets.insert(Preset::ComfortSleep);
        self.comfort_sleep = Some(params);
        self
    }
}
