// ABOUTME: Coach roster tools: list_clients and get_client_profile
// ABOUTME: Roster reads are scoped to the calling coach; profile reads require an active relationship
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Client Tools
//!
//! - `ListClientsTool` - The calling coach's clients, filtered by relationship status
//! - `GetClientProfileTool` - One client's profile, gated by tenant authorization

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pierre_coaching_core::constants::limits::{DEFAULT_CLIENT_PAGE_SIZE, MAX_PAGE_SIZE};
use pierre_coaching_core::constants::tools::{GET_CLIENT_PROFILE, LIST_CLIENTS};
use pierre_coaching_core::models::{ClientSummary, RelationshipFilter, User};
use pierre_coaching_core::permissions::UserRole;

use super::tenant_guard;
use crate::errors::AppResult;
use crate::tools::context::ToolContext;
use crate::tools::contract::{ParameterContract, ParameterKind, ParameterSpec};
use crate::tools::definition::ToolDefinition;
use crate::tools::response::ToolResponse;
use crate::tools::traits::{ToolCapabilities, ToolFactory, ToolHandler};

// ============================================================================
// ListClientsTool - The calling coach's roster
// ============================================================================

/// Tool listing the calling coach's clients
pub struct ListClientsTool;

/// Arguments of `list_clients`
#[derive(Debug, Deserialize)]
pub struct ListClientsParams {
    /// `active`, `all`, or a specific status
    pub status: String,
    /// Page size
    pub limit: u32,
}

/// Result of `list_clients`
#[derive(Debug, Serialize)]
pub struct ClientList {
    /// Filter that was applied
    pub status: String,
    /// Matching clients, ordered by display name
    pub clients: Vec<ClientSummary>,
    /// Number of clients returned
    pub count: usize,
}

#[async_trait]
impl ToolHandler for ListClientsTool {
    type Params = ListClientsParams;
    type Output = ClientList;

    fn name(&self) -> &'static str {
        LIST_CLIENTS
    }

    fn description(&self) -> &'static str {
        "List your coaching clients. Defaults to active relationships; pass status 'all' \
         or a specific status (pending, inactive, terminated) to see others."
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new()
            .param(
                ParameterSpec::optional(
                    "status",
                    "Relationship status filter",
                    ParameterKind::one_of(&RelationshipFilter::TAGS),
                )
                .with_default("active"),
            )
            .param(
                ParameterSpec::optional(
                    "limit",
                    "Maximum number of clients to return",
                    ParameterKind::integer_range(1, MAX_PAGE_SIZE),
                )
                .with_default(DEFAULT_CLIENT_PAGE_SIZE),
            )
    }

    fn minimum_role(&self) -> Option<UserRole> {
        Some(UserRole::Coach)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
    }

    async fn execute(
        &self,
        params: ListClientsParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<ClientList>> {
        let filter: RelationshipFilter = params.status.parse()?;
        let clients = context
            .tenant()
            .list_clients(context.caller_id(), filter, params.limit)
            .await?;

        Ok(ToolResponse::success(ClientList {
            status: params.status,
            count: clients.len(),
            clients,
        }))
    }
}

// ============================================================================
// GetClientProfileTool - One client's profile
// ============================================================================

/// Tool reading a client's profile
pub struct GetClientProfileTool;

/// Arguments of `get_client_profile`
#[derive(Debug, Deserialize)]
pub struct GetClientProfileParams {
    /// Client whose profile is requested
    pub client_id: Uuid,
}

#[async_trait]
impl ToolHandler for GetClientProfileTool {
    type Params = GetClientProfileParams;
    type Output = User;

    fn name(&self) -> &'static str {
        GET_CLIENT_PROFILE
    }

    fn description(&self) -> &'static str {
        "Get a client's profile. Requires an active coaching relationship with the client."
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
        ToolCapabilities::READS_DATA | ToolCapabilities::TENANT_SCOPED
    }

    async fn execute(
        &self,
        params: GetClientProfileParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<User>> {
        if let Some(denied) = tenant_guard(context, params.client_id).await? {
            return Ok(denied.into());
        }

        Ok(match context.database().get_user(params.client_id).await? {
            Some(user) => ToolResponse::success(user),
            None => ToolResponse::not_found(
                "client",
                format!("Client {} not found", params.client_id),
            ),
        })
    }
}

// ============================================================================
// Module exports
// ============================================================================

/// Create all client tools for registration
#[must_use]
pub fn create_client_tools() -> Vec<Arc<dyn ToolFactory>> {
    vec![
        ToolDefinition::shared(ListClientsTool),
        ToolDefinition::shared(GetClientProfileTool),
    ]
}
