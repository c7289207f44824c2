// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses DATABASE_URL, ENVIRONMENT and the tool audit/timeout variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite:./data/pierre_coaching.db` |
//! | `ENVIRONMENT` | `development` |
//! | `TOOL_AUDIT_LOG` | `true` |
//! | `TOOL_AUDIT_ARGUMENTS` | `false` |
//! | `TOOL_CALL_TIMEOUT_SECS` | `30` |
//!
//! Unset variables take their default. A set but unparsable value is a
//! `CONFIG_INVALID` error, never a silent fallback.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::env_defaults;
use crate::errors::{AppError, AppResult};

/// Environment type for deployment-specific behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (default)
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development, // Default fallback (including "development" | "dev")
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(&self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
            Self::Testing => f.write_str("testing"),
        }
    }
}

/// Settings applied to every collected tool set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSettings {
    /// Wrap bound tools in the audit decorator
    pub audit_log: bool,
    /// Include raw arguments in audit log lines (may contain client PII)
    pub audit_arguments: bool,
    /// Host-side deadline for a single tool call
    pub call_timeout: Duration,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            audit_log: env_defaults::TOOL_AUDIT_LOG,
            audit_arguments: env_defaults::TOOL_AUDIT_ARGUMENTS,
            call_timeout: Duration::from_secs(env_defaults::TOOL_CALL_TIMEOUT_SECS),
        }
    }
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `SQLite` URL of the coaching store
    pub database_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Tool collection and call settings
    pub tools: ToolSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: env_defaults::DATABASE_URL.to_owned(),
            environment: Environment::default(),
            tools: ToolSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `CONFIG_INVALID` error if a variable is set to an unparsable value
    pub fn from_env() -> AppResult<Self> {
        debug!("Loading configuration from environment variables");

        let database_url = env_var_or("DATABASE_URL", env_defaults::DATABASE_URL);
        if database_url.trim().is_empty() {
            return Err(AppError::config("DATABASE_URL must not be empty"));
        }

        let config = Self {
            database_url,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            tools: ToolSettings {
                audit_log: env_bool("TOOL_AUDIT_LOG", env_defaults::TOOL_AUDIT_LOG)?,
                audit_arguments: env_bool(
                    "TOOL_AUDIT_ARGUMENTS",
                    env_defaults::TOOL_AUDIT_ARGUMENTS,
                )?,
                call_timeout: Duration::from_secs(env_timeout_secs(
                    "TOOL_CALL_TIMEOUT_SECS",
                    env_defaults::TOOL_CALL_TIMEOUT_SECS,
                )?),
            },
        };

        info!(
            environment = %config.environment,
            audit_log = config.tools.audit_log,
            audit_arguments = config.tools.audit_arguments,
            call_timeout_secs = config.tools.call_timeout.as_secs(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_bool(key: &str, default: bool) -> AppResult<bool> {
    env::var(key).map_or(Ok(default), |raw| {
        parse_bool(&raw).ok_or_else(|| {
            AppError::config(format!(
                "Invalid {key} value '{raw}': expected true/false, 1/0, yes/no or on/off"
            ))
        })
    })
}

fn env_timeout_secs(key: &str, default: u64) -> AppResult<u64> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::config(format!(
            "Invalid {key} value '{raw}': expected a positive number of seconds"
        ))),
    }
}

/// Parse a boolean flag value
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
