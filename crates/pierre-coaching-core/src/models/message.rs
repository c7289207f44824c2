// ABOUTME: Coach-to-client message model
// ABOUTME: Messages optionally carry an idempotency key so retried sends are de-duplicated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message sent by a coach to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoachMessage {
    /// Message identifier
    pub id: Uuid,
    /// Sending coach
    pub coach_id: Uuid,
    /// Receiving client
    pub client_id: Uuid,
    /// Message text
    pub body: String,
    /// Caller-supplied de-duplication key, unique per coach and client
    pub idempotency_key: Option<String>,
    /// Send time
    pub created_at: DateTime<Utc>,
}

impl CoachMessage {
    /// Create a new message with a fresh id
    #[must_use]
    pub fn new(
        coach_id: Uuid,
        client_id: Uuid,
        body: impl Into<String>,
        idempotency_key: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            coach_id,
            client_id,
            body: body.into(),
            idempotency_key,
            created_at: Utc::now(),
        }
    }
}
