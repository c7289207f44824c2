// ABOUTME: Decorators for bound tools providing cross-cutting concerns
// ABOUTME: Currently the audit-logging wrapper applied by the collector
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Decorators
//!
//! Wrappers implementing [`CallableTool`](super::traits::CallableTool) around
//! another callable tool, adding behavior without touching business logic:
//!
//! - `AuditedTool` - Logs every invocation with caller identity, outcome and timing

mod audited;

pub use audited::AuditedTool;
