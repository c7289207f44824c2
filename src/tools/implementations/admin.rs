// ABOUTME: Admin-only tools for relationship oversight across every coach
// ABOUTME: Implements admin_list_relationships with an optional status filter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Admin Tools
//!
//! - `AdminListRelationshipsTool` - Every relationship row, newest first
//!
//! All tools require the admin role; the permission gate rejects coaches
//! and clients before any query runs.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pierre_coaching_core::constants::limits::{DEFAULT_CLIENT_PAGE_SIZE, MAX_PAGE_SIZE};
use pierre_coaching_core::constants::tools::ADMIN_LIST_RELATIONSHIPS;
use pierre_coaching_core::models::{CoachClientRelationship, RelationshipFilter};
use pierre_coaching_core::permissions::UserRole;

use crate::errors::AppResult;
use crate::tools::context::ToolContext;
use crate::tools::contract::{ParameterContract, ParameterKind, ParameterSpec};
use crate::tools::definition::ToolDefinition;
use crate::tools::response::ToolResponse;
use crate::tools::traits::{ToolCapabilities, ToolFactory, ToolHandler};

/// Tool listing relationships across all coaches (admin only)
pub struct AdminListRelationshipsTool;

/// Arguments of `admin_list_relationships`
#[derive(Debug, Deserialize)]
pub struct AdminListRelationshipsParams {
    /// `all`, `active`, or a specific status
    pub status: String,
    /// Page size
    pub limit: u32,
}

/// Result of `admin_list_relationships`
#[derive(Debug, Serialize)]
pub struct RelationshipList {
    /// Filter that was applied
    pub status: String,
    /// Matching relationships
    pub relationships: Vec<CoachClientRelationship>,
    /// Number of relationships returned
    pub count: usize,
}

#[async_trait]
impl ToolHandler for AdminListRelationshipsTool {
    type Params = AdminListRelationshipsParams;
    type Output = RelationshipList;

    fn name(&self) -> &'static str {
        ADMIN_LIST_RELATIONSHIPS
    }

    fn description(&self) -> &'static str {
        "List coach-client relationships across all coaches (admin only)"
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new()
            .param(
                ParameterSpec::optional(
                    "status",
                    "Relationship status filter",
                    ParameterKind::one_of(&RelationshipFilter::TAGS),
                )
                .with_default("all"),
            )
            .param(
                ParameterSpec::optional(
                    "limit",
                    "Maximum number of relationships to return",
                    ParameterKind::integer_range(1, MAX_PAGE_SIZE),
                )
                .with_default(DEFAULT_CLIENT_PAGE_SIZE),
            )
    }

    fn minimum_role(&self) -> Option<UserRole> {
        Some(UserRole::Admin)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::ADMIN_ONLY
    }

    async fn execute(
        &self,
        params: AdminListRelationshipsParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<RelationshipList>> {
        let filter: RelationshipFilter = params.status.parse()?;
        let relationships = context
            .database()
            .list_relationships(filter, params.limit)
            .await?;

        Ok(ToolResponse::success(RelationshipList {
            status: params.status,
            count: relationships.len(),
            relationships,
        }))
    }
}

/// Create all admin tools for registration
#[must_use]
pub fn create_admin_tools() -> Vec<Arc<dyn ToolFactory>> {
    vec![ToolDefinition::shared(AdminListRelationshipsTool)]
}
