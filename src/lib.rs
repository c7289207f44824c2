// ABOUTME: Main library entry point for the Pierre coaching tool-execution framework
// ABOUTME: Role-gated, tenant-authorized tools that an LLM agent can call on behalf of coaches and clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coaching
//!
//! Tool-execution framework for a fitness-coaching backend. Each tool is a
//! declarative definition (name, description, parameter contract, minimum
//! role, business logic) that becomes a callable unit bound to one caller.
//!
//! ## Features
//!
//! - **Permission gate**: role hierarchy `client < coach < admin`, checked
//!   before any store access
//! - **Tenant authorization**: coaches reach a client's data only through an
//!   active coach-client relationship
//! - **Uniform envelope**: every call returns `{success, data}` or
//!   `{success, error: {code, message}}`
//! - **Relationship lifecycle**: `pending -> active -> inactive|terminated`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pierre_coaching::database::Database;
//! use pierre_coaching::errors::AppResult;
//! use pierre_coaching::permissions::UserRole;
//! use pierre_coaching::tools::{ToolCollector, ToolContext, ToolRegistry};
//! use serde_json::json;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let database = Arc::new(Database::new("sqlite::memory:").await?);
//!
//!     let registry = ToolRegistry::with_builtin_tools();
//!     let context = Arc::new(ToolContext::new(database, Uuid::new_v4(), UserRole::Coach));
//!     let tools = ToolCollector::new().collect(&context, &registry);
//!
//!     let response = tools.call("list_clients", json!({})).await;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```

/// Environment-based configuration
pub mod config;

/// Application constants
pub mod constants;

/// SQLite store behind the tool context
pub mod database;

/// Error types
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Coach-client tenant authorization
pub mod tenant;

/// Tool-execution framework and built-in tools
pub mod tools;

pub use pierre_coaching_core::{models, permissions};
