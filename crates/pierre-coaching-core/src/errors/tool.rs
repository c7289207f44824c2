// ABOUTME: Framework-level errors for tool registration, dispatch, and parameter contracts
// ABOUTME: Provides structured errors that integrate with the main AppError system
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Error Types
//!
//! Errors raised by the tool framework itself rather than by business logic:
//! unknown tools, parameter contract violations and duplicate registrations.

use thiserror::Error;

use super::{AppError, ErrorCode};

/// Errors specific to tool operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// Tool was not found in the registry or bound tool set
    #[error("Tool '{tool_name}' not found")]
    NotFound {
        /// Name of the requested tool
        tool_name: String,
    },
    /// Required parameter is missing
    #[error("Missing required parameter '{parameter}' for tool '{tool_name}'")]
    MissingParameter {
        /// Name of the tool
        tool_name: String,
        /// Name of the missing parameter
        parameter: String,
    },
    /// Tool parameter validation failed
    #[error("Invalid parameter '{parameter}' for tool '{tool_name}': {reason}")]
    InvalidParameter {
        /// Name of the tool
        tool_name: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Reason the parameter is invalid
        reason: String,
    },
    /// Tool is already registered
    #[error("Tool '{tool_name}' is already registered")]
    AlreadyRegistered {
        /// Name of the already-registered tool
        tool_name: String,
    },
}

impl ToolError {
    /// Create a "not found" error
    #[must_use]
    pub fn not_found(tool_name: impl Into<String>) -> Self {
        Self::NotFound {
            tool_name: tool_name.into(),
        }
    }

    /// Create a "missing parameter" error
    #[must_use]
    pub fn missing_parameter(tool_name: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            tool_name: tool_name.into(),
            parameter: parameter.into(),
        }
    }

    /// Create an "invalid parameter" error
    #[must_use]
    pub fn invalid_parameter(
        tool_name: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            tool_name: tool_name.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create an "already registered" error
    #[must_use]
    pub fn already_registered(tool_name: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            tool_name: tool_name.into(),
        }
    }

    /// Whether this error is a parameter contract violation
    #[must_use]
    pub const fn is_contract_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::InvalidParameter { .. }
        )
    }

    /// Get the tool name associated with this error
    #[must_use]
    pub fn tool_name(&self) -> &str {
        match self {
            Self::NotFound { tool_name }
            | Self::MissingParameter { tool_name, .. }
            | Self::InvalidParameter { tool_name, .. }
            | Self::AlreadyRegistered { tool_name } => tool_name,
        }
    }
}

impl From<ToolError> for AppError {
    fn from(error: ToolError) -> Self {
        let code = match &error {
            ToolError::NotFound { .. } => ErrorCode::ResourceNotFound,
            ToolError::MissingParameter { .. } => ErrorCode::MissingRequiredField,
            ToolError::InvalidParameter { .. } => ErrorCode::InvalidInput,
            ToolError::AlreadyRegistered { .. } => ErrorCode::ResourceAlreadyExists,
        };
        Self::new(code, error.to_string())
    }
}
