// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `daichi_hvac` - Function ID translation for Daichi climate devices.
//!
//! The Daichi cloud models every controllable feature of an air conditioner
//! as a numbered function (350 is power, 353 is heat mode, 358 is fan speed,
//! and so on), each with its own activation rules. This library translates
//! between those functions and a climate entity view.
//!
//! # Supported Features
//!
//! - **Decoding**: Raw function snapshot to power, mode, temperature, fan,
//!   swing and presets, with a report of anything unexpected
//! - **Encoding**: Entity changes to ordered, validated function instructions,
//!   including implicit power-on and Comfortable Sleep parameters
//! - **Registry**: Built-in function table, or a versioned table loaded from JSON
//! - **Cloud transport**: Device documents and control requests over HTTP,
//!   with conflict auto-resolution (feature `http`)
//!
//! # Quick Start
//!
//! ## Decode a snapshot
//!
//! ```
//! use daichi_hvac::snapshot::parse_device_document;
//! use daichi_hvac::state::decode;
//! use daichi_hvac::types::{FanMode, HvacMode};
//!
//! let document = r#"{"done": true, "data": {"id": 42, "pult": [
//!     {"title": "Main", "functions": [
//!         {"id": 350, "state": {"isOn": true}},
//!         {"id": 353, "state": {"isOn": true}},
//!         {"id": 351, "state": {"value": 21}},
//!         {"id": 357, "state": {"isOn": true}}
//!     ]}
//! ]}}"#;
//!
//! let snapshot = parse_device_document(document)?.to_snapshot();
//! let state = decode(&snapshot)?.state;
//!
//! assert_eq!(state.mode, HvacMode::Heat);
//! assert_eq!(state.target_temperature, Some(21.0));
//! assert_eq!(state.fan_mode, Some(FanMode::Auto));
//! # Ok::<(), daichi_hvac::Error>(())
//! ```
//!
//! ## Encode a change
//!
//! ```
//! use daichi_hvac::command::{Command, EntityChangeRequest, FunctionInstruction, encode};
//! use daichi_hvac::state::EntityState;
//! use daichi_hvac::types::{FunctionId, Preset};
//!
//! let off = EntityState::default();
//! let instructions = encode(&off, &EntityChangeRequest::SetPreset(Preset::Eco, true, None))?;
//!
//! assert_eq!(
//!     instructions,
//!     vec![
//!         FunctionInstruction::new(FunctionId::POWER, Command::Bool(true)),
//!         FunctionInstruction::new(FunctionId::ECO, Command::On("eco_on".to_string())),
//!     ]
//! );
//! # Ok::<(), daichi_hvac::Error>(())
//! ```
//!
//! ## Talk to the cloud
//!
//! ```no_run
//! use daichi_hvac::command::{EntityChangeRequest, Encoder};
//! use daichi_hvac::protocol::{CloudConfig, Protocol};
//! use daichi_hvac::state::decode;
//! use daichi_hvac::types::{FanMode, FanSpeed};
//!
//! #[tokio::main]
//! async fn main() -> daichi_hvac::Result<()> {
//!     let client = CloudConfig::new("access-token").into_client()?;
//!
//!     let current = decode(&client.fetch_snapshot(42).await?)?.state;
//!     let request = EntityChangeRequest::SetFanMode(FanMode::Speed(FanSpeed::new(3)?));
//!     client.apply_change(42, &Encoder::builtin(), &current, &request).await?;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod types;
pub mod validation;

pub use command::{
    Command, ComfortSleepRequest, EntityChangeRequest, Encoder, FunctionInstruction, encode,
};
pub use config::{PowerGating, TranslatorConfig};
pub use error::{
    DecodeError, EncodeError, Error, ParseError, ProtocolError, RegistryError, Result,
    UnknownFunction, ValueError,
};
#[cfg(feature = "http")]
pub use protocol::{CloudConfig, HttpClient};
pub use protocol::Protocol;
pub use registry::{FunctionDefinition, Registry};
pub use snapshot::{DeviceStateSnapshot, RawValue};
pub use state::{DecodeReport, Decoded, Decoder, EntityState, decode};
pub use types::{
    ComfortSleepParams, FanMode, FanSpeed, FunctionCategory, FunctionId, HvacMode, Preset,
    PresetMode, Swing, SwingMode, TargetTemperature,
};
