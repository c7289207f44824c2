// ABOUTME: Central registry of tool factories with categories, role-aware catalogs and feature gating
// ABOUTME: Built once at startup and read immutably while collecting per-request tool sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Registry
//!
//! Central registry for coaching tools, providing:
//! - Factory registration and lookup by name
//! - Category grouping
//! - Role-aware catalog generation
//! - Feature-flag-based registration of the built-in tools
//!
//! The registry holds factories, never bound tools. Binding to a caller
//! happens per request in [`ToolCollector`](super::collector::ToolCollector).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use pierre_coaching_core::permissions::UserRole;

use super::schema::ToolSchema;
use super::traits::{ToolCapabilities, ToolFactory};
use crate::errors::ToolError;

/// Central registry of tool factories
///
/// # Example
///
/// ```
/// use pierre_coaching::permissions::UserRole;
/// use pierre_coaching::tools::ToolRegistry;
///
/// let registry = ToolRegistry::with_builtin_tools();
/// let client_tools = registry.schemas_for_role(UserRole::Client);
/// assert!(client_tools.len() <= registry.len());
/// ```
pub struct ToolRegistry {
    /// Registered factories by tool name
    tools: HashMap<String, Arc<dyn ToolFactory>>,
    /// Tool names grouped by category
    categories: HashMap<String, Vec<String>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Create a registry with every built-in tool enabled by features
    #[must_use]
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_tools();
        registry
    }

    /// Register a tool factory
    ///
    /// # Returns
    ///
    /// `true` if the tool was registered, `false` if a tool with the same name exists
    pub fn register(&mut self, tool: Arc<dyn ToolFactory>) -> bool {
        let name = tool.name().to_owned();

        if self.tools.contains_key(&name) {
            warn!("Tool '{}' is already registered, skipping", name);
            return false;
        }

        debug!(
            "Registering tool '{}' (minimum role: {}) with capabilities: {}",
            name,
            tool.minimum_role().map_or("any", |role| role.as_str()),
            tool.capabilities().describe()
        );
        self.tools.insert(name, tool);
        true
    }

    /// Register a tool factory, failing on a duplicate name
    ///
    /// # Errors
    ///
    /// Returns `ToolError::AlreadyRegistered` if the name is taken
    pub fn try_register(&mut self, tool: Arc<dyn ToolFactory>) -> Result<(), ToolError> {
        let name = tool.name();
        if self.register(tool) {
            Ok(())
        } else {
            Err(ToolError::already_registered(name))
        }
    }

    /// Register a tool factory and categorize it
    pub fn register_with_category(&mut self, tool: Arc<dyn ToolFactory>, category: &str) {
        let name = tool.name().to_owned();
        if self.register(tool) {
            self.categories
                .entry(category.to_owned())
                .or_default()
                .push(name);
        }
    }

    /// Get a factory by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolFactory>> {
        self.tools.get(name)
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All tool names, sorted
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Tool names in a specific category, in registration order
    #[must_use]
    pub fn tools_in_category(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// All categories, sorted
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Factories keyed by tool name, as consumed by the collector
    #[must_use]
    pub const fn factories(&self) -> &HashMap<String, Arc<dyn ToolFactory>> {
        &self.tools
    }

    /// Catalog of tools a role may call, sorted by name
    ///
    /// A tool is visible when it has no minimum role or the role satisfies it.
    #[must_use]
    pub fn schemas_for_role(&self, role: UserRole) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .filter(|tool| tool.minimum_role().is_none_or(|required| role.satisfies(required)))
            .map(|tool| tool.schema())
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Catalog of every registered tool, sorted by name
    #[must_use]
    pub fn all_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|tool| tool.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Filter factories by capabilities
    #[must_use]
    pub fn filter_by_capabilities(&self, required: ToolCapabilities) -> Vec<&Arc<dyn ToolFactory>> {
        self.tools
            .values()
            .filter(|tool| tool.capabilities().contains(required))
            .collect()
    }

    /// Register all built-in tools based on feature flags
    pub fn register_builtin_tools(&mut self) {
        info!("Registering built-in tools...");

        #[cfg(feature = "tools-clients")]
        self.register_category(
            pierre_coaching_core::constants::tools::categories::CLIENTS,
            super::implementations::clients::create_client_tools(),
        );

        #[cfg(feature = "tools-relationships")]
        self.register_category(
            pierre_coaching_core::constants::tools::categories::RELATIONSHIPS,
            super::implementations::relationships::create_relationship_tools(),
        );

        #[cfg(feature = "tools-workouts")]
        self.register_category(
            pierre_coaching_core::constants::tools::categories::WORKOUTS,
            super::implementations::workouts::create_workout_tools(),
        );

        #[cfg(feature = "tools-messaging")]
        self.register_category(
            pierre_coaching_core::constants::tools::categories::MESSAGING,
            super::implementations::messaging::create_messaging_tools(),
        );

        #[cfg(feature = "tools-admin")]
        self.register_category(
            pierre_coaching_core::constants::tools::categories::ADMIN,
            super::implementations::admin::create_admin_tools(),
        );

        info!("Registered {} built-in tools", self.len());
    }

    #[allow(dead_code)]
    fn register_category(&mut self, category: &str, tools: Vec<Arc<dyn ToolFactory>>) {
        debug!(
            "Registering {} tools (registry has {} tools)",
            category,
            self.tools.len()
        );

        for tool in tools {
            self.register_with_category(tool, category);
        }

        info!(
            "Registered {} tools (registry now has {} tools)",
            category,
            self.tools.len()
        );
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("categories", &self.categories.keys().collect::<Vec<_>>())
            .finish()
    }
}
