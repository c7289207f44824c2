// ABOUTME: ToolResponse envelope returned by every tool call, and the closed error-code taxonomy
// ABOUTME: Serializes as {success:true,data} or {success:false,error:{code,message}}, never both
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Response Envelope
//!
//! [`ToolResponse`] is an enum, so a value holding both data and an error
//! cannot be constructed. The wire form is:
//!
//! ```json
//! { "success": true, "data": { "...": "..." } }
//! { "success": false, "error": { "code": "UNAUTHORIZED", "message": "..." } }
//! ```
//!
//! Deserialization rejects any other shape, including payloads carrying both
//! `data` and `error` or neither.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::errors::{AppError, ToolError};

const NOT_FOUND_SUFFIX: &str = "_NOT_FOUND";

/// Closed set of failure codes a tool may return
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolErrorCode {
    /// Caller's tier is below the tool's minimum role
    PermissionDenied,
    /// Caller has no active relationship with the target client
    Unauthorized,
    /// A named lookup failed; renders as `<RESOURCE>_NOT_FOUND`
    NotFound(String),
    /// Arguments violated the tool's parameter contract
    InvalidParameters,
    /// Unclassified failure
    ToolError,
}

impl ToolErrorCode {
    /// `<RESOURCE>_NOT_FOUND` for a resource name such as `client`
    #[must_use]
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(resource.trim().to_lowercase().replace([' ', '-'], "_"))
    }
}

impl Display for ToolErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::PermissionDenied => f.write_str("PERMISSION_DENIED"),
            Self::Unauthorized => f.write_str("UNAUTHORIZED"),
            Self::NotFound(resource) => write!(f, "{}{NOT_FOUND_SUFFIX}", resource.to_uppercase()),
            Self::InvalidParameters => f.write_str("INVALID_PARAMETERS"),
            Self::ToolError => f.write_str("TOOL_ERROR"),
        }
    }
}

impl FromStr for ToolErrorCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERMISSION_DENIED" => Ok(Self::PermissionDenied),
            "UNAUTHORIZED" => Ok(Self::Unauthorized),
            "INVALID_PARAMETERS" => Ok(Self::InvalidParameters),
            "TOOL_ERROR" => Ok(Self::ToolError),
            other => other
                .strip_suffix(NOT_FOUND_SUFFIX)
                .filter(|resource| {
                    !resource.is_empty()
                        && resource
                            .chars()
                            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
                })
                .map(Self::not_found)
                .ok_or_else(|| AppError::invalid_input(format!("Unknown tool error code: {other}"))),
        }
    }
}

impl Serialize for ToolErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ToolErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Self>()
            .map_err(|e| D::Error::custom(e.message))
    }
}

/// Failure half of the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolFailure {
    /// Machine-readable code
    pub code: ToolErrorCode,
    /// Human-readable reason
    pub message: String,
}

impl ToolFailure {
    /// Build a failure
    #[must_use]
    pub fn new(code: ToolErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Result of one tool call
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse<T> {
    /// `{ "success": true, "data": T }`
    Success(T),
    /// `{ "success": false, "error": { "code", "message" } }`
    Failure(ToolFailure),
}

impl<T> ToolResponse<T> {
    /// Wrap a successful payload
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self::Success(data)
    }

    /// Unclassified failure (`TOOL_ERROR`)
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::error_with_code(ToolErrorCode::ToolError, message)
    }

    /// Failure with an explicit code
    #[must_use]
    pub fn error_with_code(code: ToolErrorCode, message: impl Into<String>) -> Self {
        Self::Failure(ToolFailure::new(code, message))
    }

    /// Tenant authorization failure (`UNAUTHORIZED`)
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::error_with_code(ToolErrorCode::Unauthorized, message)
    }

    /// Named lookup failure (`<RESOURCE>_NOT_FOUND`)
    #[must_use]
    pub fn not_found(resource: &str, message: impl Into<String>) -> Self {
        Self::error_with_code(ToolErrorCode::not_found(resource), message)
    }

    /// Argument rejected by business rules (`INVALID_PARAMETERS`)
    #[must_use]
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::error_with_code(ToolErrorCode::InvalidParameters, message)
    }

    /// Unclassified failure carrying the original error message
    #[must_use]
    pub fn from_app_error(error: &AppError) -> Self {
        Self::error(error.message.clone())
    }

    /// Whether this is the success shape
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Success payload, if any
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Failure details, if any
    #[must_use]
    pub const fn failure(&self) -> Option<&ToolFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Failure code, if any
    #[must_use]
    pub const fn error_code(&self) -> Option<&ToolErrorCode> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(&failure.code),
        }
    }

    /// Convert into a plain `Result`
    ///
    /// # Errors
    ///
    /// Returns the failure half of the envelope
    pub fn into_result(self) -> Result<T, ToolFailure> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(failure) => Err(failure),
        }
    }

    /// Transform the success payload
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ToolResponse<U> {
        match self {
            Self::Success(data) => ToolResponse::Success(f(data)),
            Self::Failure(failure) => ToolResponse::Failure(failure),
        }
    }
}

impl<T: Serialize> ToolResponse<T> {
    /// Serialize the payload to JSON; a payload that cannot be serialized
    /// becomes a `TOOL_ERROR`
    #[must_use]
    pub fn into_json(self) -> ToolResponse<Value> {
        match self {
            Self::Success(data) => match serde_json::to_value(data) {
                Ok(value) => ToolResponse::Success(value),
                Err(e) => ToolResponse::error(format!("Failed to serialize tool result: {e}")),
            },
            Self::Failure(failure) => ToolResponse::Failure(failure),
        }
    }
}

impl<T> From<ToolFailure> for ToolResponse<T> {
    fn from(failure: ToolFailure) -> Self {
        Self::Failure(failure)
    }
}

impl<T> From<ToolError> for ToolResponse<T> {
    fn from(error: ToolError) -> Self {
        let code = match &error {
            ToolError::NotFound { .. } => ToolErrorCode::not_found("tool"),
            ToolError::MissingParameter { .. } | ToolError::InvalidParameter { .. } => {
                ToolErrorCode::InvalidParameters
            }
            ToolError::AlreadyRegistered { .. } => ToolErrorCode::ToolError,
        };
        Self::error_with_code(code, error.to_string())
    }
}

impl<T: Serialize> Serialize for ToolResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ToolResponse", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(failure) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", failure)?;
            }
        }
        state.end()
    }
}

/// Wire shape before the exclusivity check
#[derive(Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "T: Deserialize<'de>"))]
struct RawToolResponse<T> {
    success: bool,
    #[serde(default, deserialize_with = "deserialize_present")]
    data: Option<T>,
    #[serde(default)]
    error: Option<ToolFailure>,
}

/// Distinguish `"data": null` (present) from a missing `data` key
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ToolResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawToolResponse::<T>::deserialize(deserializer)?;
        match (raw.success, raw.data, raw.error) {
            (true, Some(data), None) => Ok(Self::Success(data)),
            (false, None, Some(failure)) => Ok(Self::Failure(failure)),
            (success, data, error) => Err(D::Error::custom(format!(
                "tool response must carry exactly one of data or error matching success \
                 (success={success}, data={}, error={})",
                data.is_some(),
                error.is_some()
            ))),
        }
    }
}
