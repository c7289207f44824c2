// ABOUTME: Tool-execution framework: definitions, permission gate, context injection and collection
// ABOUTME: Re-exports the types an agent host needs to register, bind and invoke coaching tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Execution Framework
//!
//! A tool is written once as a [`ToolHandler`], wrapped in a
//! [`ToolDefinition`] and registered in the [`ToolRegistry`]. Per request,
//! the [`ToolCollector`] binds every registered factory to that request's
//! [`ToolContext`], producing a [`BoundToolSet`] for the agent runtime.
//! Every call returns a [`ToolResponse`] envelope.

/// Tool collection per request
pub mod collector;
/// Per-request caller identity
pub mod context;
/// Declarative parameter contracts
pub mod contract;
/// Cross-cutting wrappers for bound tools
pub mod decorators;
/// Handler-to-factory adapter and the bound call pipeline
pub mod definition;
/// Role-hierarchy permission gate
pub mod gate;
/// Built-in coaching tools
pub mod implementations;
/// Factory registry
pub mod registry;
/// Response envelope and error codes
pub mod response;
/// JSON Schema types for the tool catalog
pub mod schema;
/// Tool traits and capability flags
pub mod traits;

pub use collector::{BoundToolSet, ToolCollector};
pub use context::ToolContext;
pub use contract::{ParameterContract, ParameterKind, ParameterSpec};
pub use definition::{BoundTool, ToolDefinition};
pub use gate::{check_permission, PermissionDenied};
pub use registry::ToolRegistry;
pub use response::{ToolErrorCode, ToolFailure, ToolResponse};
pub use schema::{JsonSchema, PropertySchema, ToolSchema};
pub use traits::{CallableTool, ToolCapabilities, ToolFactory, ToolHandler};
