// ABOUTME: User account and client summary models for the coaching store
// ABOUTME: ClientSummary joins minimal client identity with relationship state for listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::UserRole;

use super::RelationshipStatus;

/// A registered user (client, coach, or admin)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User identifier
    pub id: Uuid,
    /// Unique login email
    pub email: String,
    /// Name shown to coaches and clients
    pub display_name: String,
    /// Privilege tier
    pub role: UserRole,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id
    #[must_use]
    pub fn new(email: impl Into<String>, display_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            display_name: display_name.into(),
            role,
            created_at: Utc::now(),
        }
    }
}

/// Minimal client identity returned when a coach lists clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSummary {
    /// Client user id
    pub client_id: Uuid,
    /// Client display name
    pub display_name: String,
    /// Client email
    pub email: String,
    /// Relationship row id
    pub relationship_id: Uuid,
    /// Relationship status with the listing coach
    pub status: RelationshipStatus,
    /// When the coach assigned the client
    pub assigned_at: DateTime<Utc>,
    /// When the client accepted, if ever
    pub accepted_at: Option<DateTime<Utc>>,
}
