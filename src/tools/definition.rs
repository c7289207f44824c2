// ABOUTME: ToolDefinition turns a ToolHandler into a factory; BoundTool is its per-request product
// ABOUTME: BoundTool::call runs contract validation, the permission gate, then guarded business logic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Definitions and Bound Tools
//!
//! Call pipeline of a [`BoundTool`]:
//!
//! 1. Validate raw arguments against the parameter contract and deserialize
//!    them into the handler's `Params`. Failure: `INVALID_PARAMETERS`.
//! 2. Permission gate on the caller's role. Failure: `PERMISSION_DENIED`.
//! 3. Business logic. An `AppError` or a panic becomes `TOOL_ERROR` with
//!    the original message.
//!
//! Steps 1 and 2 are synchronous and perform no I/O, so a rejected call
//! never reaches the store.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use serde_json::Value;
use tracing::{debug, error, warn};

use pierre_coaching_core::permissions::UserRole;

use super::context::ToolContext;
use super::contract::ParameterContract;
use super::gate::check_permission;
use super::response::ToolResponse;
use super::schema::JsonSchema;
use super::traits::{CallableTool, ToolCapabilities, ToolFactory, ToolHandler};

/// Factory for one tool: a handler plus its rendered parameter contract
pub struct ToolDefinition<H: ToolHandler> {
    handler: Arc<H>,
    contract: Arc<ParameterContract>,
}

impl<H: ToolHandler> ToolDefinition<H> {
    /// Wrap a handler
    #[must_use]
    pub fn new(handler: H) -> Self {
        let contract = Arc::new(handler.parameters());
        Self {
            handler: Arc::new(handler),
            contract,
        }
    }

    /// Wrap a handler for registry storage
    #[must_use]
    pub fn shared(handler: H) -> Arc<dyn ToolFactory> {
        Arc::new(Self::new(handler))
    }

    /// Parameter contract
    #[must_use]
    pub fn contract(&self) -> &ParameterContract {
        &self.contract
    }
}

impl<H: ToolHandler> ToolFactory for ToolDefinition<H> {
    fn name(&self) -> &'static str {
        self.handler.name()
    }

    fn description(&self) -> &'static str {
        self.handler.description()
    }

    fn input_schema(&self) -> JsonSchema {
        self.contract.to_schema()
    }

    fn minimum_role(&self) -> Option<UserRole> {
        self.handler.minimum_role()
    }

    fn capabilities(&self) -> ToolCapabilities {
        self.handler.capabilities()
    }

    fn bind(&self, context: Arc<ToolContext>) -> Box<dyn CallableTool> {
        Box::new(BoundTool {
            handler: Arc::clone(&self.handler),
            contract: Arc::clone(&self.contract),
            context,
        })
    }
}

impl<H: ToolHandler> fmt::Debug for ToolDefinition<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.handler.name())
            .field("minimum_role", &self.handler.minimum_role())
            .finish_non_exhaustive()
    }
}

/// A handler bound to one request's context
pub struct BoundTool<H: ToolHandler> {
    handler: Arc<H>,
    contract: Arc<ParameterContract>,
    context: Arc<ToolContext>,
}

impl<H: ToolHandler> BoundTool<H> {
    /// Contract validation then the permission gate; no I/O, never suspends
    fn prepare(&self, args: Value) -> Result<H::Params, ToolResponse<Value>> {
        let tool = self.handler.name();

        let params = self.contract.parse::<H::Params>(tool, args).map_err(|e| {
            debug!(tool, error = %e, "Tool arguments rejected");
            ToolResponse::<Value>::from(e)
        })?;

        check_permission(self.handler.minimum_role(), self.context.caller_role()).map_err(
            |denied| {
                warn!(
                    tool,
                    caller_id = %self.context.caller_id(),
                    required_role = %denied.required,
                    caller_role = %denied.actual,
                    "Tool call denied by permission gate"
                );
                ToolResponse::<Value>::from(denied)
            },
        )?;

        Ok(params)
    }
}

#[async_trait]
impl<H: ToolHandler> CallableTool for BoundTool<H> {
    fn name(&self) -> &'static str {
        self.handler.name()
    }

    fn description(&self) -> &'static str {
        self.handler.description()
    }

    fn input_schema(&self) -> JsonSchema {
        self.contract.to_schema()
    }

    fn capabilities(&self) -> ToolCapabilities {
        self.handler.capabilities()
    }

    fn context(&self) -> &ToolContext {
        &self.context
    }

    async fn call(&self, args: Value) -> ToolResponse<Value> {
        let params = match self.prepare(args) {
            Ok(params) => params,
            Err(rejected) => return rejected,
        };

        let tool = self.handler.name();
        let outcome = AssertUnwindSafe(self.handler.execute(params, &self.context))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(response)) => response.into_json(),
            Ok(Err(e)) => {
                error!(
                    tool,
                    caller_id = %self.context.caller_id(),
                    error_code = %e.code,
                    error = %e.message,
                    "Tool business logic failed"
                );
                ToolResponse::from_app_error(&e)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(
                    tool,
                    caller_id = %self.context.caller_id(),
                    panic = %message,
                    "Tool business logic panicked"
                );
                ToolResponse::error(format!("Tool '{tool}' failed unexpectedly: {message}"))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
