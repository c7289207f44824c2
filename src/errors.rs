// ABOUTME: Error types re-exported from the core crate for use across the server
// ABOUTME: AppError carries unclassified failures; ToolError carries framework-level failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! The error types are defined in `pierre-coaching-core` so domain models
//! can return them without depending on this crate. Tool-facing failures are
//! converted into a `ToolResponse` envelope in [`crate::tools::response`].

pub use pierre_coaching_core::errors::{AppError, AppResult, ErrorCode, ToolError};
