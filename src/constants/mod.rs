// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Re-exports core tool constants and adds service names and environment defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Tool identifiers, categories, and limits live in `pierre-coaching-core` so
//! the domain crate and this crate agree on them. Runtime-only constants
//! (service names, environment defaults) are defined here.

pub use pierre_coaching_core::constants::{limits, tools};
pub use pierre_coaching_core::constants::tools::*;

/// Service names for structured logging
pub mod service_names {
    /// The coaching tool runtime
    pub const PIERRE_COACH_TOOLS: &str = "pierre-coach-tools";
}

/// Defaults applied when an environment variable is unset
pub mod env_defaults {
    /// Coaching store location
    pub const DATABASE_URL: &str = "sqlite:./data/pierre_coaching.db";
    /// Host-side deadline for one tool call, in seconds
    pub const TOOL_CALL_TIMEOUT_SECS: u64 = 30;
    /// Wrap bound tools in the audit decorator
    pub const TOOL_AUDIT_LOG: bool = true;
    /// Include raw arguments in audit logs
    pub const TOOL_AUDIT_ARGUMENTS: bool = false;
}
