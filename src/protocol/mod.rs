// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the Daichi cloud.
//!
//! The translation engine never talks to the network itself. This module
//! provides the [`Protocol`] seam the engine's output is handed to, and an
//! HTTP implementation of it.
//!
//! # Protocols
//!
//! - [`HttpClient`]: bearer-token client for the cloud REST API (feature `http`)

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{CloudConfig, HttpClient};

use crate::command::{ControlReply, Encoder, EntityChangeRequest, FunctionInstruction};
use crate::error::ProtocolError;
use crate::snapshot::{CloudDevice, DeviceStateSnapshot};
use crate::state::EntityState;

/// Trait for transports that can read and command cloud devices.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Fetches the device document.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the document cannot
    /// be parsed.
    async fn fetch_device(&self, device_id: u64) -> Result<CloudDevice, ProtocolError>;

    /// Sends one instruction to the device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or is refused.
    async fn send_instruction(
        &self,
        device_id: u64,
        instruction: &FunctionInstruction,
    ) -> Result<ControlReply, ProtocolError>;

    /// Fetches the device document and flattens it into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the document cannot be fetched.
    async fn fetch_snapshot(&self, device_id: u64) -> Result<DeviceStateSnapshot, ProtocolError> {
        Ok(self.fetch_device(device_id).await?.to_snapshot())
    }

    /// Sends instructions one after another, in order.
    ///
    /// Stops at the first failure; instructions before it have been sent.
    ///
    /// # Errors
    ///
    /// Returns the error of the first instruction that fails.
    async fn send_instructions(
        &self,
        device_id: u64,
        instructions: &[FunctionInstruction],
    ) -> Result<Vec<ControlReply>, ProtocolError> {
        let mut replies = Vec::with_capacity(instructions.len());
        for instruction in instructions {
            tracing::debug!(device_id, instruction = %instruction, "Sending instruction");
            replies.push(self.send_instruction(device_id, instruction).await?);
        }
        Ok(replies)
    }

    /// Encodes a change and sends the resulting instructions.
    ///
    /// Nothing is sent if encoding fails.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` if the change cannot be encoded, or
    /// `Error::Protocol` if sending fails.
    async fn apply_change(
        &self,
        device_id: u64,
        encoder: &Encoder<'_>,
        current: &EntityState,
        request: &EntityChangeRequest,
    ) -> crate::Result<Vec<ControlReply>> {
        let instructions = encoder.encode(current, request)?;
        Ok(self.send_instructions(device_id, &instructions).await?)
    }
}
