// ABOUTME: Coach-client tenant isolation for tenant-scoped tools
// ABOUTME: A coach may only touch a client's data through an active relationship
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tenant Authorization
//!
//! The permission gate checks the caller's *tier*. This module checks the
//! caller's *relationship to one specific client*. Tenant-scoped tools call
//! [`CoachAuthorization::is_authorized`] as their first data-dependent step
//! and return `UNAUTHORIZED` when it fails. Results are never cached; each
//! call queries the store.

/// Relationship lookups, access checks, and lifecycle transitions
pub mod authorization;

pub use authorization::CoachAuthorization;
