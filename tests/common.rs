// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory store, user and relationship seeding, and bound tool helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `pierre_coaching`

use std::sync::{Arc, Once};

use anyhow::Result;
use uuid::Uuid;

use pierre_coaching::database::Database;
use pierre_coaching::models::{CoachClientRelationship, RelationshipStatus, User};
use pierre_coaching::permissions::UserRole;
use pierre_coaching::tenant::CoachAuthorization;
use pierre_coaching::tools::{BoundToolSet, ToolCollector, ToolContext, ToolRegistry};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory store with all tables created
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    Ok(Arc::new(Database::new("sqlite::memory:").await?))
}

/// Insert a user with a unique email
pub async fn create_user(database: &Database, role: UserRole) -> Result<User> {
    let id = Uuid::new_v4();
    let user = User::new(
        format!("{role}_{id}@example.com"),
        format!("Test {role} {}", &id.to_string()[..8]),
        role,
    );
    database.create_user(&user).await?;
    Ok(user)
}

/// Create a relationship and walk it through the lifecycle to `status`
pub async fn link(
    database: &Database,
    coach_id: Uuid,
    client_id: Uuid,
    status: RelationshipStatus,
) -> Result<CoachClientRelationship> {
    let tenant = CoachAuthorization::new(database);
    let mut relationship = tenant.assign(coach_id, client_id).await?;
    if status == RelationshipStatus::Pending {
        return Ok(relationship);
    }

    relationship = tenant
        .transition(&relationship, RelationshipStatus::Active)
        .await?;
    if status != RelationshipStatus::Active {
        relationship = tenant.transition(&relationship, status).await?;
    }
    Ok(relationship)
}

/// Context for `user`
pub fn context_for(database: &Arc<Database>, user: &User) -> Arc<ToolContext> {
    Arc::new(ToolContext::new(Arc::clone(database), user.id, user.role))
}

/// Every built-in tool bound to `user`, without audit wrapping
pub fn bound_tools(database: &Arc<Database>, user: &User) -> BoundToolSet {
    let registry = ToolRegistry::with_builtin_tools();
    ToolCollector::new().collect(&context_for(database, user), &registry)
}
