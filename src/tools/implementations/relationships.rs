// ABOUTME: Relationship lifecycle tools: assign_client, accept_coach_invitation, end_coaching_relationship
// ABOUTME: Drives the pending -> active -> inactive|terminated state machine through compare-and-set updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Relationship Tools
//!
//! - `AssignClientTool` - A coach invites a client (new `pending` row)
//! - `AcceptCoachInvitationTool` - The client accepts (`pending` to `active`)
//! - `EndCoachingRelationshipTool` - Either party ends it (`inactive` or `terminated`)
//!
//! A terminated row is never reopened; re-engagement goes through a new
//! assignment.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use pierre_coaching_core::constants::tools::{
    ACCEPT_COACH_INVITATION, ASSIGN_CLIENT, END_COACHING_RELATIONSHIP,
};
use pierre_coaching_core::models::{CoachClientRelationship, RelationshipStatus};
use pierre_coaching_core::permissions::UserRole;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::tools::context::ToolContext;
use crate::tools::contract::{ParameterContract, ParameterKind, ParameterSpec};
use crate::tools::definition::ToolDefinition;
use crate::tools::response::ToolResponse;
use crate::tools::traits::{ToolCapabilities, ToolFactory, ToolHandler};

/// Outcomes accepted by `end_coaching_relationship`
const END_OUTCOMES: [&str; 2] = ["terminated", "inactive"];

/// Expected lifecycle conflicts come back as `TOOL_ERROR` data; anything else propagates
fn lifecycle_outcome(
    result: AppResult<CoachClientRelationship>,
) -> AppResult<ToolResponse<CoachClientRelationship>> {
    match result {
        Ok(relationship) => Ok(ToolResponse::success(relationship)),
        Err(AppError {
            code: ErrorCode::InvalidStateTransition | ErrorCode::ResourceAlreadyExists,
            message,
            ..
        }) => Ok(ToolResponse::error(message)),
        Err(e) => Err(e),
    }
}

// ============================================================================
// AssignClientTool - Coach invites a client
// ============================================================================

/// Tool creating a pending relationship
pub struct AssignClientTool;

/// Arguments of `assign_client`
#[derive(Debug, Deserialize)]
pub struct AssignClientParams {
    /// Client to invite
    pub client_id: Uuid,
}

#[async_trait]
impl ToolHandler for AssignClientTool {
    type Params = AssignClientParams;
    type Output = CoachClientRelationship;

    fn name(&self) -> &'static str {
        ASSIGN_CLIENT
    }

    fn description(&self) -> &'static str {
        "Invite a client to a coaching relationship. The relationship stays pending \
         until the client accepts."
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new().param(ParameterSpec::required(
            "client_id",
            "Client user id",
            ParameterKind::Uuid,
        ))
    }

    fn minimum_role(&self) -> Option<UserRole> {
        Some(UserRole::Coach)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::WRITES_DATA
    }

    async fn execute(
        &self,
        params: AssignClientParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<CoachClientRelationship>> {
        let coach_id = context.caller_id();
        if params.client_id == coach_id {
            return Ok(ToolResponse::error("A coach cannot assign themselves as a client"));
        }

        let is_client = context
            .database()
            .get_user(params.client_id)
            .await?
            .is_some_and(|user| user.role == UserRole::Client);
        if !is_client {
            return Ok(ToolResponse::not_found(
                "client",
                format!("Client {} not found", params.client_id),
            ));
        }

        lifecycle_outcome(context.tenant().assign(coach_id, params.client_id).await)
    }
}

// ============================================================================
// AcceptCoachInvitationTool - Client accepts a pending invitation
// ============================================================================

/// Tool activating a pending relationship
pub struct AcceptCoachInvitationTool;

/// Arguments of `accept_coach_invitation`
#[derive(Debug, Deserialize)]
pub struct AcceptCoachInvitationParams {
    /// Coach whose invitation is accepted
    pub coach_id: Uuid,
}

#[async_trait]
impl ToolHandler for AcceptCoachInvitationTool {
    type Params = AcceptCoachInvitationParams;
    type Output = CoachClientRelationship;

    fn name(&self) -> &'static str {
        ACCEPT_COACH_INVITATION
    }

    fn description(&self) -> &'static str {
        "Accept a pending coaching invitation, giving the coach access to your data."
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new().param(ParameterSpec::required(
            "coach_id",
            "Coach user id",
            ParameterKind::Uuid,
        ))
    }

    fn minimum_role(&self) -> Option<UserRole> {
        Some(UserRole::Client)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::WRITES_DATA
    }

    async fn execute(
        &self,
        params: AcceptCoachInvitationParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<CoachClientRelationship>> {
        let pending = context
            .database()
            .get_relationship_with_status(
                params.coach_id,
                context.caller_id(),
                RelationshipStatus::Pending,
            )
            .await?;

        let Some(pending) = pending else {
            return Ok(ToolResponse::not_found(
                "relationship",
                format!("No pending invitation from coach {}", params.coach_id),
            ));
        };

        lifecycle_outcome(
            context
                .tenant()
                .transition(&pending, RelationshipStatus::Active)
                .await,
        )
    }
}

// ============================================================================
// EndCoachingRelationshipTool - Either party ends the relationship
// ============================================================================

/// Tool ending an active relationship
pub struct EndCoachingRelationshipTool;

/// Arguments of `end_coaching_relationship`
#[derive(Debug, Deserialize)]
pub struct EndCoachingRelationshipParams {
    /// The other party (the coach when a client calls, and vice versa)
    pub counterpart_id: Uuid,
    /// `terminated` or `inactive`
    pub outcome: RelationshipStatus,
}

#[async_trait]
impl ToolHandler for EndCoachingRelationshipTool {
    type Params = EndCoachingRelationshipParams;
    type Output = CoachClientRelationship;

    fn name(&self) -> &'static str {
        END_COACHING_RELATIONSHIP
    }

    fn description(&self) -> &'static str {
        "End a coaching relationship. 'terminated' is permanent; 'inactive' pauses it. \
         Either the coach or the client may call this."
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new()
            .param(ParameterSpec::required(
                "counterpart_id",
                "User id of the other party",
                ParameterKind::Uuid,
            ))
            .param(
                ParameterSpec::optional(
                    "outcome",
                    "Resulting status",
                    ParameterKind::one_of(&END_OUTCOMES),
                )
                .with_default("terminated"),
            )
    }

    fn minimum_role(&self) -> Option<UserRole> {
        Some(UserRole::Client)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::WRITES_DATA
    }

    async fn execute(
        &self,
        params: EndCoachingRelationshipParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<CoachClientRelationship>> {
        let current = context
            .database()
            .get_current_relationship_between(context.caller_id(), params.counterpart_id)
            .await?;

        let Some(current) = current else {
            return Ok(ToolResponse::not_found(
                "relationship",
                format!(
                    "No open coaching relationship with user {}",
                    params.counterpart_id
                ),
            ));
        };

        lifecycle_outcome(context.tenant().transition(&current, params.outcome).await)
    }
}

// ============================================================================
// Module exports
// ============================================================================

/// Create all relationship tools for registration
#[must_use]
pub fn create_relationship_tools() -> Vec<Arc<dyn ToolFactory>> {
    vec![
        ToolDefinition::shared(AssignClientTool),
        ToolDefinition::shared(AcceptCoachInvitationTool),
        ToolDefinition::shared(EndCoachingRelationshipTool),
    ]
}
