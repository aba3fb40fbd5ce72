// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for climate entity control.
//!
//! Constrained types check their range at construction time, so a value that
//! exists is a value the device accepts.
//!
//! # Types
//!
//! - [`FunctionId`] - Numbered device feature, with well-known constants
//! - [`FunctionCategory`] - Role of a function, derived from its id
//! - [`HvacMode`] - Off/Cool/Heat/Auto/Dry/FanOnly
//! - [`FanSpeed`] - Manual fan speed (1-5)
//! - [`FanMode`] - Auto, manual speed, or an unrecognized reported speed
//! - [`TargetTemperature`] - Whole degrees Celsius (16-30)
//! - [`Swing`] / [`SwingMode`] - Individual swing functions and the combined selector
//! - [`Preset`] / [`PresetMode`] - Individual presets and the exclusive selector
//! - [`ComfortSleepParams`] - Nested payload of the Comfortable Sleep program

mod fan;
mod function_id;
mod mode;
mod preset;
mod swing;
mod temperature;

pub use fan::{FanMode, FanSpeed};
pub use function_id::{FunctionCategory, FunctionId};
pub use mode::HvacMode;
pub use preset::{ComfortSleepParams, Preset, PresetMode};
pub use swing::{Swing, SwingMode};
pub use temperature::TargetTemperature;
