// ABOUTME: Core types for the Pierre coaching tool framework
// ABOUTME: Foundation crate with error handling, role hierarchy, and coaching domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coaching Core
//!
//! Foundation crate shared by the coaching tool server. It holds the pieces
//! that never perform I/O and change rarely:
//!
//! - **errors**: `AppError`, `ErrorCode` and the framework-level `ToolError`
//! - **permissions**: the `UserRole` hierarchy used by the permission gate
//! - **models**: coach-client relationships, client summaries, workouts, messages
//! - **constants**: tool identifiers and tool categories

/// Unified error handling with standard error codes
pub mod errors;

/// Role hierarchy used for tier-based permission checks
pub mod permissions;

/// Coaching domain models (relationships, clients, workouts, messages)
pub mod models;

/// Tool identifiers and categories
pub mod constants;
