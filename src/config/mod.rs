// ABOUTME: Configuration management module for the coaching tool runtime
// ABOUTME: All settings come from environment variables; there are no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: [`ServerConfig`] loaded from environment variables, with
//!   the deployment [`Environment`] and per-call [`ToolSettings`]

/// Environment and server configuration
pub mod environment;

pub use environment::{Environment, ServerConfig, ToolSettings};
