// ABOUTME: Audit decorator for bound tools that logs every invocation with caller identity
// ABOUTME: Records outcome code and duration; argument logging is opt-in because arguments carry client PII
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Audited Tool Decorator
//!
//! Wraps a [`CallableTool`] with audit logging. Each call produces a start
//! event and a completion event carrying the envelope outcome (`success` or
//! the error code) and the elapsed time, inside a span tagged with the tool
//! name, caller id, caller role and request id.
//!
//! The decorator never changes the envelope it forwards.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::tools::context::ToolContext;
use crate::tools::response::ToolResponse;
use crate::tools::schema::JsonSchema;
use crate::tools::traits::{CallableTool, ToolCapabilities};

/// Audit decorator for bound tools
pub struct AuditedTool {
    /// The wrapped tool
    inner: Box<dyn CallableTool>,
    /// Whether to log arguments (may contain client PII)
    log_arguments: bool,
}

impl AuditedTool {
    /// Wrap a tool without argument logging
    #[must_use]
    pub fn new(inner: Box<dyn CallableTool>) -> Self {
        Self {
            inner,
            log_arguments: false,
        }
    }

    /// Wrap a tool and also log its raw arguments
    ///
    /// # Warning
    ///
    /// Arguments may contain client names, notes and message bodies.
    #[must_use]
    pub fn with_argument_logging(inner: Box<dyn CallableTool>) -> Self {
        Self {
            inner,
            log_arguments: true,
        }
    }

    /// Check if argument logging is enabled
    #[must_use]
    pub const fn logs_arguments(&self) -> bool {
        self.log_arguments
    }
}

#[async_trait]
impl CallableTool for AuditedTool {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn description(&self) -> &'static str {
        self.inner.description()
    }

    fn input_schema(&self) -> JsonSchema {
        self.inner.input_schema()
    }

    fn capabilities(&self) -> ToolCapabilities {
        self.inner.capabilities()
    }

    fn context(&self) -> &ToolContext {
        self.inner.context()
    }

    #[instrument(
        skip_all,
        fields(
            tool = %self.name(),
            caller_id = %self.context().caller_id(),
            role = %self.context().caller_role(),
            request_id = ?self.context().request_id(),
        )
    )]
    async fn call(&self, args: Value) -> ToolResponse<Value> {
        let start = Instant::now();
        let tool_name = self.name();
        let capabilities = self.capabilities().describe();

        if self.log_arguments {
            info!(
                tool = %tool_name,
                capabilities = %capabilities,
                arguments = %args,
                "Tool call started"
            );
        } else {
            info!(tool = %tool_name, capabilities = %capabilities, "Tool call started");
        }

        let response = self.inner.call(args).await;
        let duration = start.elapsed();

        match response.error_code() {
            None => {
                info!(
                    tool = %tool_name,
                    duration_ms = %duration.as_millis(),
                    outcome = "success",
                    "Tool call completed"
                );
            }
            Some(code) => {
                warn!(
                    tool = %tool_name,
                    duration_ms = %duration.as_millis(),
                    outcome = %code,
                    "Tool call returned an error envelope"
                );
            }
        }

        response
    }
}
