// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `daichi_hvac` library.
//!
//! Decoding and encoding fail in different ways and get different error
//! types: [`DecodeError`] is only raised when the power state of a snapshot
//! cannot be established, while [`EncodeError`] aborts a whole instruction
//! set. Both convert into the top-level [`Error`].

use thiserror::Error;

use crate::snapshot::ValueKind;
use crate::types::FunctionId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A function id is not present in the registry.
    #[error(transparent)]
    UnknownFunction(#[from] UnknownFunction),

    /// A device snapshot could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An entity change request could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// A function table failed its load-time checks.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Error occurred during communication with the cloud service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a cloud document.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A function id that the registry does not know about.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown function id {0}")]
pub struct UnknownFunction(pub FunctionId);

/// Errors related to value validation and constraints.
///
/// Every variant names the function it was raised for, and parameter
/// variants also name the offending field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed inclusive range.
    #[error("value {actual} for function {function} is out of range [{min}, {max}]")]
    OutOfRange {
        /// The function being validated.
        function: FunctionId,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// The value has the wrong primitive type.
    #[error("function {function} expects {expected}, got {actual}")]
    WrongType {
        /// The function being validated.
        function: FunctionId,
        /// The expected kind of value.
        expected: ValueKind,
        /// The kind of value that was provided.
        actual: ValueKind,
    },

    /// An activation value does not name a member of the function's category.
    #[error("{value} is not a member of the category of function {function}")]
    NotInCategory {
        /// The function being validated.
        function: FunctionId,
        /// The function id that was named.
        value: i64,
    },

    /// A declared parameter is missing from the payload.
    #[error("function {function} requires parameter `{field}`")]
    MissingParameter {
        /// The function being validated.
        function: FunctionId,
        /// The missing parameter key.
        field: String,
    },

    /// A parameter has the wrong primitive type.
    #[error("parameter `{field}` of function {function} expects {expected}")]
    WrongParameterType {
        /// The function being validated.
        function: FunctionId,
        /// The offending parameter key.
        field: String,
        /// The expected kind of value.
        expected: ValueKind,
    },

    /// A parameter is outside its declared range.
    #[error("parameter `{field}` of function {function}: {actual} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        /// The function being validated.
        function: FunctionId,
        /// The offending parameter key.
        field: String,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// Parameters were supplied for a function that declares none.
    #[error("function {0} does not take parameters")]
    UnexpectedParameters(FunctionId),

    /// A name could not be parsed into one of the known variants.
    #[error("invalid {kind}: {value}")]
    UnknownVariant {
        /// What was being parsed (e.g. "hvac mode").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Errors raised while decoding a device snapshot.
///
/// Decoding is best effort; the only hard failure is a snapshot from which
/// the power state cannot be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The power function is missing or unreadable; the device is unavailable.
    #[error("snapshot does not establish power state (function 350, found {})", describe_kind(.found))]
    IncompleteSnapshot {
        /// The kind of the unreadable power value, `None` when absent.
        found: Option<ValueKind>,
    },
}

#[allow(clippy::ref_option)]
fn describe_kind(kind: &Option<ValueKind>) -> String {
    kind.map_or_else(|| "nothing".to_string(), |k| k.to_string())
}

/// Errors raised while encoding an entity change request.
///
/// An encode either produces the full instruction set or fails with one of
/// these and produces nothing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// The request touches a function absent from the registry.
    #[error(transparent)]
    UnknownFunction(#[from] UnknownFunction),

    /// The requested value failed validation.
    #[error("invalid value: {0}")]
    InvalidValue(#[from] ValueError),

    /// The device is off and the encoder is configured to reject rather
    /// than power it on.
    #[error("function {function} cannot be commanded while the device is off")]
    PoweredOff {
        /// The first function that requires power.
        function: FunctionId,
    },
}

/// Errors raised while loading a function table.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two definitions share an id.
    #[error("duplicate function id {0}")]
    DuplicateId(FunctionId),

    /// A definition links to a function that does not exist.
    #[error("function {function} links to unknown function {linked}")]
    DanglingLink {
        /// The definition holding the link.
        function: FunctionId,
        /// The unresolved target.
        linked: FunctionId,
    },

    /// Following links from a definition leads back to it.
    #[error("dependency cycle through function {0}")]
    DependencyCycle(FunctionId),

    /// An integer-range definition has no range.
    #[error("integer-range function {0} has no range")]
    MissingRange(FunctionId),

    /// A range has its bounds inverted.
    #[error("function {function} has inverted range [{min}, {max}]")]
    InvalidRange {
        /// The offending definition.
        function: FunctionId,
        /// Declared minimum.
        min: i64,
        /// Declared maximum.
        max: i64,
    },

    /// Only one of `onCommand`/`offCommand` is declared.
    #[error("function {0} declares only half of its on/off command pair")]
    IncompleteCommandPair(FunctionId),

    /// The table itself is not valid JSON for the schema.
    #[error("malformed function table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to communication with the cloud service.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an unexpected status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The bearer token was rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device does not exist on the account.
    #[error("device {0} not found")]
    DeviceNotFound(u64),

    /// The service reported a conflict that offers no automatic resolution.
    #[error("conflict cannot be resolved: {0}")]
    Conflict(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The response body could not be parsed.
    #[error("invalid response: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to parsing cloud documents.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the document.
    #[error("missing field in document: {0}")]
    MissingField(String),

    /// Unexpected document format.
    #[error("unexpected document format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            function: FunctionId::TEMPERATURE,
            min: 16,
            max: 30,
            actual: 31,
        };
        assert_eq!(
            err.to_string(),
            "value 31 for function 351 is out of range [16, 30]"
        );
    }

    #[test]
    fn parameter_error_names_field() {
        let err = ValueError::MissingParameter {
            function: FunctionId::COMFORTABLE_SLEEP,
            field: "sleepTime".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "function 362 requires parameter `sleepTime`"
        );
    }

    #[test]
    fn incomplete_snapshot_display() {
        let missing = DecodeError::IncompleteSnapshot { found: None };
        assert_eq!(
            missing.to_string(),
            "snapshot does not establish power state (function 350, found nothing)"
        );

        let garbled = DecodeError::IncompleteSnapshot {
            found: Some(ValueKind::Text),
        };
        assert!(garbled.to_string().ends_with("found text)"));
    }

    #[test]
    fn error_from_encode_error() {
        let encode_err: EncodeError = UnknownFunction(FunctionId::new(999)).into();
        let err: Error = encode_err.into();
        assert!(matches!(
            err,
            Error::Encode(EncodeError::UnknownFunction(UnknownFunction(id))) if id.value() == 999
        ));
    }

    #[test]
    fn registry_error_display() {
        let err = RegistryError::DanglingLink {
            function: FunctionId::FAN_SPEED,
            linked: FunctionId::new(1),
        };
        assert_eq!(err.to_string(), "function 358 links to unknown function 1");
    }
}
