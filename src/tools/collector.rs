// ABOUTME: Tool collector binding every registered factory to one request's ToolContext
// ABOUTME: Produces the BoundToolSet handed to the agent runtime for a single request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Collector
//!
//! `collect` is synchronous and performs no I/O: it applies one context to
//! every factory and returns one bound tool per factory key. Each call
//! builds new bound tools, so two requests never share a bound tool or a
//! cached authorization result.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::context::ToolContext;
use super::decorators::AuditedTool;
use super::registry::ToolRegistry;
use super::response::ToolResponse;
use super::schema::ToolSchema;
use super::traits::{CallableTool, ToolFactory};
use crate::config::ToolSettings;
use crate::errors::ToolError;

/// Binds factories to a request context
#[derive(Debug, Clone, Copy)]
pub struct ToolCollector {
    audit: bool,
    log_arguments: bool,
}

impl ToolCollector {
    /// Collector without audit wrapping
    #[must_use]
    pub const fn new() -> Self {
        Self {
            audit: false,
            log_arguments: false,
        }
    }

    /// Collector configured from tool settings
    #[must_use]
    pub const fn from_settings(settings: &ToolSettings) -> Self {
        Self {
            audit: settings.audit_log,
            log_arguments: settings.audit_arguments,
        }
    }

    /// Enable audit wrapping, optionally with argument logging
    #[must_use]
    pub const fn with_audit(mut self, log_arguments: bool) -> Self {
        self.audit = true;
        self.log_arguments = log_arguments;
        self
    }

    /// Bind every registered tool to `context`
    #[must_use]
    pub fn collect(&self, context: &Arc<ToolContext>, registry: &ToolRegistry) -> BoundToolSet {
        self.collect_factories(context, registry.factories())
    }

    /// Bind every factory to `context`, keyed exactly as `factories` is keyed
    #[must_use]
    pub fn collect_factories(
        &self,
        context: &Arc<ToolContext>,
        factories: &HashMap<String, Arc<dyn ToolFactory>>,
    ) -> BoundToolSet {
        let tools: HashMap<String, Box<dyn CallableTool>> = factories
            .iter()
            .map(|(name, factory)| (name.clone(), self.bind(factory.as_ref(), context)))
            .collect();

        debug!(
            caller_id = %context.caller_id(),
            role = %context.caller_role(),
            tool_count = tools.len(),
            "Collected bound tools"
        );

        BoundToolSet { tools }
    }

    fn bind(&self, factory: &dyn ToolFactory, context: &Arc<ToolContext>) -> Box<dyn CallableTool> {
        let bound = factory.bind(Arc::clone(context));
        match (self.audit, self.log_arguments) {
            (false, _) => bound,
            (true, false) => Box::new(AuditedTool::new(bound)),
            (true, true) => Box::new(AuditedTool::with_argument_logging(bound)),
        }
    }
}

impl Default for ToolCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Bound tools for one request, keyed by name
pub struct BoundToolSet {
    tools: HashMap<String, Box<dyn CallableTool>>,
}

impl BoundToolSet {
    /// Number of bound tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get a bound tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn CallableTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Whether a tool is bound under `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Catalog entries of every bound tool, sorted by name
    #[must_use]
    pub fn catalog(&self) -> Vec<ToolSchema> {
        let catalog: BTreeMap<&str, ToolSchema> = self
            .tools
            .iter()
            .map(|(name, tool)| (name.as_str(), tool.schema()))
            .collect();
        catalog.into_values().collect()
    }

    /// Invoke a bound tool by name
    ///
    /// An unknown name yields a `TOOL_NOT_FOUND` envelope.
    pub async fn call(&self, name: &str, args: Value) -> ToolResponse<Value> {
        match self.tools.get(name) {
            Some(tool) => tool.call(args).await,
            None => {
                debug!(tool = name, "Call for unknown tool");
                ToolResponse::from(ToolError::not_found(name))
            }
        }
    }
}

impl fmt::Debug for BoundToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundToolSet")
            .field("tools", &self.names())
            .finish()
    }
}
