// ABOUTME: Tool identifier constants to eliminate hardcoded tool names
// ABOUTME: Provides centralized tool name constants organized by functional groups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Tool identifier constants

// Client roster tools

/// List the calling coach's clients
pub const LIST_CLIENTS: &str = "list_clients";
/// Read one client's profile
pub const GET_CLIENT_PROFILE: &str = "get_client_profile";

// Relationship lifecycle tools

/// Coach invites a client (creates a pending relationship)
pub const ASSIGN_CLIENT: &str = "assign_client";
/// Client accepts a pending invitation
pub const ACCEPT_COACH_INVITATION: &str = "accept_coach_invitation";
/// Either party ends an active relationship
pub const END_COACHING_RELATIONSHIP: &str = "end_coaching_relationship";

// Workout tools

/// Client records a workout
pub const LOG_WORKOUT: &str = "log_workout";
/// Coach reads a client's workouts
pub const GET_CLIENT_WORKOUTS: &str = "get_client_workouts";

// Messaging tools

/// Coach sends a client a message
pub const SEND_CLIENT_MESSAGE: &str = "send_client_message";
/// Coach reads message history with a client
pub const GET_CLIENT_MESSAGES: &str = "get_client_messages";

// Admin tools

/// Admin lists relationships across all coaches
pub const ADMIN_LIST_RELATIONSHIPS: &str = "admin_list_relationships";

/// Tool categories used for registry grouping
pub mod categories {
    #![allow(missing_docs)]
    pub const CLIENTS: &str = "clients";
    pub const RELATIONSHIPS: &str = "relationships";
    pub const WORKOUTS: &str = "workouts";
    pub const MESSAGING: &str = "messaging";
    pub const ADMIN: &str = "admin";
}
