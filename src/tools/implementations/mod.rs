// ABOUTME: Module containing the coaching tool implementations organized by category
// ABOUTME: Each submodule corresponds to a tool category with feature flag support
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Implementations
//!
//! - `clients` - Coach roster and client profiles
//! - `relationships` - Coach-client relationship lifecycle
//! - `workouts` - Workout logging and coach review
//! - `messaging` - Coach-to-client messages
//! - `admin` - Admin-only relationship oversight
//!
//! Each category is conditionally compiled based on feature flags.

// Client tools: list_clients, get_client_profile
#[cfg(feature = "tools-clients")]
pub mod clients;

// Relationship tools: assign_client, accept_coach_invitation, end_coaching_relationship
#[cfg(feature = "tools-relationships")]
pub mod relationships;

// Workout tools: log_workout, get_client_workouts
#[cfg(feature = "tools-workouts")]
pub mod workouts;

// Messaging tools: send_client_message, get_client_messages
#[cfg(feature = "tools-messaging")]
pub mod messaging;

// Admin tools: admin_list_relationships
#[cfg(feature = "tools-admin")]
pub mod admin;

/// First data-dependent step of every tenant-scoped tool
///
/// Returns `Some(failure)` with code `UNAUTHORIZED` when the caller has no
/// active relationship with `client_id`; the tool must return it before
/// touching any client-owned row.
///
/// # Errors
///
/// Returns an error if the relationship lookup fails
#[cfg(any(
    feature = "tools-clients",
    feature = "tools-workouts",
    feature = "tools-messaging"
))]
pub(crate) async fn tenant_guard(
    context: &crate::tools::context::ToolContext,
    client_id: uuid::Uuid,
) -> crate::errors::AppResult<Option<crate::tools::response::ToolFailure>> {
    if context
        .tenant()
        .is_authorized(context.caller_id(), client_id)
        .await?
    {
        return Ok(None);
    }

    Ok(Some(crate::tools::response::ToolFailure::new(
        crate::tools::ToolErrorCode::Unauthorized,
        format!("You do not have an active coaching relationship with client {client_id}"),
    )))
}
