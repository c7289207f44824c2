// ABOUTME: Defines ToolContext, the immutable per-request identity bundle injected into every bound tool
// ABOUTME: Carries the store handle, caller id and caller role established by authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Context
//!
//! A `ToolContext` is built once per inbound request from values the
//! authentication layer has already established. The collector shares it
//! (behind an `Arc`) with every tool it binds for that request. Fields are
//! private and there are no setters, so nothing downstream can change the
//! caller's identity mid-request. Business logic reads identity only from
//! here; there is no ambient or global caller state.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use pierre_coaching_core::permissions::UserRole;

use crate::database::Database;
use crate::tenant::CoachAuthorization;

/// Per-request caller identity and store handle
pub struct ToolContext {
    database: Arc<Database>,
    caller_id: Uuid,
    caller_role: UserRole,
    request_id: Option<String>,
}

impl ToolContext {
    /// Create a context for one request
    ///
    /// # Arguments
    ///
    /// * `database` - Shared store handle
    /// * `caller_id` - Authenticated user id
    /// * `caller_role` - Authenticated user's role
    #[must_use]
    pub const fn new(database: Arc<Database>, caller_id: Uuid, caller_role: UserRole) -> Self {
        Self {
            database,
            caller_id,
            caller_role,
            request_id: None,
        }
    }

    /// Attach a request id for log correlation
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Store handle
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Authenticated caller
    #[must_use]
    pub const fn caller_id(&self) -> Uuid {
        self.caller_id
    }

    /// Caller's role
    #[must_use]
    pub const fn caller_role(&self) -> UserRole {
        self.caller_role
    }

    /// Request id, if the host supplied one
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Tenant authorization service over this context's store
    #[must_use]
    pub fn tenant(&self) -> CoachAuthorization<'_> {
        CoachAuthorization::new(&self.database)
    }
}

impl fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolContext")
            .field("caller_id", &self.caller_id)
            .field("caller_role", &self.caller_role)
            .field("request_id", &self.request_id)
            .finish_non_exhaustive()
    }
}
