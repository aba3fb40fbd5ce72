// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Daichi cloud REST API.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::command::{ConflictReply, ControlReply, ControlRequest, FunctionInstruction};
use crate::error::{ParseError, ProtocolError};
use crate::protocol::Protocol;
use crate::snapshot::{CloudDevice, parse_device_document};

// ============================================================================
// CloudConfig
// ============================================================================

/// Bearer token, kept out of debug output.
#[derive(Clone, PartialEq, Eq)]
struct Token(String);

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Configuration for the cloud HTTP client.
///
/// Obtaining the token is left to the caller.
///
/// # Examples
///
/// ```
/// use daichi_hvac::protocol::CloudConfig;
/// use std::time::Duration;
///
/// let config = CloudConfig::new("secret-token");
/// assert_eq!(config.base_url(), "https://web.daichicloud.ru/api/v4");
///
/// let config = CloudConfig::new("secret-token")
///     .with_base_url("http://127.0.0.1:8080/api/v4/")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://127.0.0.1:8080/api/v4");
/// assert!(!format!("{config:?}").contains("secret-token"));
/// ```
#[derive(Debug, Clone)]
pub struct CloudConfig {
    base_url: String,
    token: Token,
    timeout: Duration,
}

impl CloudConfig {
    /// Default API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://web.daichicloud.ru/api/v4";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the default API root.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            token: Token(token.into()),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom API root. A trailing slash is dropped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the API root is not an
    /// http(s) URL, or `ProtocolError::Http` if the client cannot be built.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url,
            client,
            token: self.token,
        })
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client for the Daichi cloud.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Examples
///
/// ```no_run
/// use daichi_hvac::command::{EntityChangeRequest, Encoder};
/// use daichi_hvac::protocol::{CloudConfig, Protocol};
/// use daichi_hvac::state::decode;
/// use daichi_hvac::types::HvacMode;
///
/// # async fn example() -> daichi_hvac::Result<()> {
/// let client = CloudConfig::new("token").into_client()?;
///
/// let snapshot = client.fetch_snapshot(42).await?;
/// let current = decode(&snapshot)?.state;
///
/// let request = EntityChangeRequest::SetMode(HvacMode::Heat);
/// client.apply_change(42, &Encoder::builtin(), &current, &request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    token: Token,
}

impl HttpClient {
    /// Creates a client for the default API root.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(token: impl Into<String>) -> Result<Self, ProtocolError> {
        CloudConfig::new(token).into_client()
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn device_url(&self, device_id: u64) -> String {
        format!("{}/devices/{device_id}", self.base_url)
    }

    fn control_url(&self, device_id: u64) -> String {
        format!("{}/devices/{device_id}/ctrl", self.base_url)
    }

    async fn post_control(
        &self,
        device_id: u64,
        request: &ControlRequest,
    ) -> Result<Response, ProtocolError> {
        self.client
            .post(self.control_url(device_id))
            .query(&[("ignoreConflicts", "false")])
            .bearer_auth(&self.token.0)
            .json(request)
            .send()
            .await
            .map_err(ProtocolError::Http)
    }
}

/// Maps error statuses shared by all endpoints.
async fn check_status(response: Response, device_id: u64) -> Result<String, ProtocolError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProtocolError::AuthenticationFailed);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ProtocolError::DeviceNotFound(device_id));
    }

    let body = response.text().await.map_err(ProtocolError::Http)?;
    if !status.is_success() {
        return Err(ProtocolError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn parse_reply(device_id: u64, body: &str) -> Result<ControlReply, ProtocolError> {
    let reply: ControlReply = serde_json::from_str(body).map_err(ParseError::from)?;

    if !reply.done {
        tracing::warn!(
            device_id,
            errors = ?reply.errors,
            "Control command not done"
        );
    }
    if reply.update_required {
        tracing::debug!(device_id, "Device requires a state refresh");
    }
    Ok(reply)
}

impl Protocol for HttpClient {
    async fn fetch_device(&self, device_id: u64) -> Result<CloudDevice, ProtocolError> {
        let url = self.device_url(device_id);
        tracing::debug!(url = %url, "Fetching device document");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token.0)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let body = check_status(response, device_id).await?;
        Ok(parse_device_document(&body)?)
    }

    async fn send_instruction(
        &self,
        device_id: u64,
        instruction: &FunctionInstruction,
    ) -> Result<ControlReply, ProtocolError> {
        let request = ControlRequest::new(instruction);
        tracing::debug!(
            device_id,
            cmd_id = request.cmd_id,
            instruction = %instruction,
            "Sending control request"
        );

        let response = self.post_control(device_id, &request).await?;
        if response.status() != StatusCode::CONFLICT {
            let body = check_status(response, device_id).await?;
            return parse_reply(device_id, &body);
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;
        let conflict: ConflictReply = serde_json::from_str(&body).map_err(ParseError::from)?;
        let title = conflict.title.clone().unwrap_or_default();

        let Some(token) = conflict.resolve_data().cloned() else {
            tracing::warn!(device_id, title = %title, "Conflict cannot be resolved");
            return Err(ProtocolError::Conflict(title));
        };

        tracing::info!(device_id, title = %title, "Resolving conflict");
        let retry = request.with_conflict_resolve_data(token);
        let response = self.post_control(device_id, &retry).await?;
        if response.status() == StatusCode::CONFLICT {
            return Err(ProtocolError::Conflict(title));
        }

        let body = check_status(response, device_id).await?;
        parse_reply(device_id, &body)
    }
}
