// ABOUTME: Defines the ToolHandler, ToolFactory and CallableTool traits and ToolCapabilities flags
// ABOUTME: Handlers hold business logic; factories bind them to a context; callables are what agents invoke
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Traits and Capabilities
//!
//! Three layers, each with one job:
//!
//! - [`ToolHandler`]: business logic plus static metadata (name, description,
//!   parameter contract, minimum role). Written once per tool.
//! - [`ToolFactory`]: object-safe view of a handler held by the registry.
//!   [`ToolFactory::bind`] takes a [`ToolContext`] and returns a callable tool.
//!   Binding performs no I/O.
//! - [`CallableTool`]: a tool bound to one caller. [`CallableTool::call`] runs
//!   contract validation, the permission gate, then business logic, and
//!   always returns a [`ToolResponse`].

use std::sync::Arc;

use async_trait::async_trait;
use bitflags::bitflags;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use pierre_coaching_core::permissions::UserRole;

use super::context::ToolContext;
use super::contract::ParameterContract;
use super::response::ToolResponse;
use super::schema::{JsonSchema, ToolSchema};
use crate::errors::AppResult;

bitflags! {
    /// Capabilities that tools declare for filtering, discovery and audit logs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ToolCapabilities: u8 {
        /// Tool reads stored data
        const READS_DATA = 0b0000_0001;
        /// Tool writes/modifies stored data
        const WRITES_DATA = 0b0000_0010;
        /// Tool touches data owned by a client other than the caller
        const TENANT_SCOPED = 0b0000_0100;
        /// Tool requires admin privileges
        const ADMIN_ONLY = 0b0000_1000;
        /// Tool reads or sends coach messages
        const MESSAGING = 0b0001_0000;
    }
}

impl ToolCapabilities {
    /// Check if tool is admin-only
    #[must_use]
    pub const fn is_admin_only(self) -> bool {
        self.contains(Self::ADMIN_ONLY)
    }

    /// Check if tool reads data
    #[must_use]
    pub const fn reads_data(self) -> bool {
        self.contains(Self::READS_DATA)
    }

    /// Check if tool writes data
    #[must_use]
    pub const fn writes_data(self) -> bool {
        self.contains(Self::WRITES_DATA)
    }

    /// Check if tool needs a tenant authorization check
    #[must_use]
    pub const fn is_tenant_scoped(self) -> bool {
        self.contains(Self::TENANT_SCOPED)
    }

    /// Get a description of all enabled capabilities for logging
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<&str> = [
            (Self::READS_DATA, "reads_data"),
            (Self::WRITES_DATA, "writes_data"),
            (Self::TENANT_SCOPED, "tenant_scoped"),
            (Self::ADMIN_ONLY, "admin_only"),
            (Self::MESSAGING, "messaging"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, label)| label)
        .collect();

        if parts.is_empty() {
            "none".to_owned()
        } else {
            parts.join(", ")
        }
    }
}

/// Business logic and metadata for one tool.
///
/// `execute` receives arguments that already passed the parameter contract
/// and the permission gate. It returns expected outcomes (unauthorized,
/// not found, success) as a [`ToolResponse`]; an `Err` is reserved for
/// unexpected failures and is converted to `TOOL_ERROR` by the caller.
///
/// # Example
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use pierre_coaching::errors::AppResult;
/// use pierre_coaching::permissions::UserRole;
/// use pierre_coaching::tools::{
///     ParameterContract, ToolCapabilities, ToolContext, ToolHandler, ToolResponse,
/// };
/// use serde::Deserialize;
///
/// struct WhoAmI;
///
/// #[derive(Deserialize)]
/// struct NoParams {}
///
/// #[async_trait]
/// impl ToolHandler for WhoAmI {
///     type Params = NoParams;
///     type Output = String;
///
///     fn name(&self) -> &'static str {
///         "who_am_i"
///     }
///
///     fn description(&self) -> &'static str {
///         "Return the caller's role"
///     }
///
///     fn parameters(&self) -> ParameterContract {
///         ParameterContract::new()
///     }
///
///     fn minimum_role(&self) -> Option<UserRole> {
///         None
///     }
///
///     fn capabilities(&self) -> ToolCapabilities {
///         ToolCapabilities::empty()
///     }
///
///     async fn execute(&self, _params: NoParams, context: &ToolContext) -> AppResult<ToolResponse<String>> {
///         Ok(ToolResponse::success(context.caller_role().to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait ToolHandler: Send + Sync + 'static {
    /// Typed arguments, deserialized from the validated argument object
    type Params: DeserializeOwned + Send;
    /// Success payload
    type Output: Serialize + Send;

    /// Unique identifier used by the agent to invoke the tool
    fn name(&self) -> &'static str;

    /// Description for LLM consumption
    fn description(&self) -> &'static str;

    /// Accepted parameters
    fn parameters(&self) -> ParameterContract;

    /// Lowest role allowed to call the tool; `None` admits every caller
    fn minimum_role(&self) -> Option<UserRole>;

    /// Capability flags for filtering and audit logs
    fn capabilities(&self) -> ToolCapabilities;

    /// Run the business logic
    ///
    /// # Errors
    ///
    /// Returns `AppError` for unexpected failures such as store errors
    async fn execute(
        &self,
        params: Self::Params,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<Self::Output>>;
}

/// Object-safe tool factory held by the registry
pub trait ToolFactory: Send + Sync {
    /// Tool name
    fn name(&self) -> &'static str;

    /// Tool description
    fn description(&self) -> &'static str;

    /// JSON Schema rendered from the parameter contract
    fn input_schema(&self) -> JsonSchema;

    /// Lowest role allowed to call the tool
    fn minimum_role(&self) -> Option<UserRole>;

    /// Capability flags
    fn capabilities(&self) -> ToolCapabilities;

    /// Bind the tool to one request's context
    fn bind(&self, context: Arc<ToolContext>) -> Box<dyn CallableTool>;

    /// Catalog entry
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            input_schema: self.input_schema(),
        }
    }
}

/// A tool bound to one caller, ready for the agent runtime to invoke
#[async_trait]
pub trait CallableTool: Send + Sync {
    /// Tool name
    fn name(&self) -> &'static str;

    /// Tool description
    fn description(&self) -> &'static str;

    /// JSON Schema for the arguments
    fn input_schema(&self) -> JsonSchema;

    /// Capability flags
    fn capabilities(&self) -> ToolCapabilities;

    /// Context this tool is bound to
    fn context(&self) -> &ToolContext;

    /// Invoke the tool with raw JSON arguments
    ///
    /// Never fails: every outcome, including contract violations, permission
    /// denials and business-logic errors, comes back as an envelope.
    /// Dropping the returned future cancels the call.
    async fn call(&self, args: Value) -> ToolResponse<Value>;

    /// Catalog entry
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            input_schema: self.input_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_capabilities() {
        let caps = ToolCapabilities::READS_DATA | ToolCapabilities::TENANT_SCOPED;
        assert_eq!(caps.describe(), "reads_data, tenant_scoped");
        assert!(caps.is_tenant_scoped());
        assert!(!caps.writes_data());
        assert_eq!(ToolCapabilities::empty().describe(), "none");
    }
}
