// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity state and snapshot decoding.
//!
//! The [`EntityState`] struct is the normalized view of a climate device,
//! while [`decode`] derives it from a raw [`DeviceStateSnapshot`].
//!
//! # Examples
//!
//! ```
//! use daichi_hvac::snapshot::{DeviceStateSnapshot, RawValue};
//! use daichi_hvac::state::decode;
//! use daichi_hvac::types::{FunctionId, HvacMode, SwingMode};
//!
//! let snapshot: DeviceStateSnapshot = [
//!     (FunctionId::POWER, RawValue::Bool(true)),
//!     (FunctionId::COOL, RawValue::Bool(true)),
//!     (FunctionId::SWING_3D, RawValue::Bool(true)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let state = decode(&snapshot)?.state;
//! assert_eq!(state.mode, HvacMode::Cool);
//! assert_eq!(state.swing_mode(), SwingMode::Both);
//! # Ok::<(), daichi_hvac::Error>(())
//! ```
//!
//! [`DeviceStateSnapshot`]: crate::snapshot::DeviceStateSnapshot

mod decoder;
mod entity;

pub use decoder::{DecodeAnomaly, DecodeReport, Decoded, Decoder, decode};
pub use entity::EntityState;
