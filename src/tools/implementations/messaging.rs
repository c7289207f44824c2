// ABOUTME: Messaging tools: send_client_message with optional idempotency key, get_client_messages
// ABOUTME: Both are tenant-scoped; a repeated idempotency key returns the original message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Messaging Tools
//!
//! - `SendClientMessageTool` - Coach sends a message to an active client
//! - `GetClientMessagesTool` - Coach reads message history with a client
//!
//! Agents may retry a send after a timeout. Passing the same
//! `idempotency_key` to the same client makes the retry return the stored
//! message with `duplicate: true` instead of sending twice.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pierre_coaching_core::constants::limits::{
    DEFAULT_HISTORY_PAGE_SIZE, MAX_IDEMPOTENCY_KEY_LENGTH, MAX_MESSAGE_LENGTH, MAX_PAGE_SIZE,
};
use pierre_coaching_core::constants::tools::{GET_CLIENT_MESSAGES, SEND_CLIENT_MESSAGE};
use pierre_coaching_core::models::CoachMessage;
use pierre_coaching_core::permissions::UserRole;

use super::tenant_guard;
use crate::errors::AppResult;
use crate::tools::context::ToolContext;
use crate::tools::contract::{ParameterContract, ParameterKind, ParameterSpec};
use crate::tools::definition::ToolDefinition;
use crate::tools::response::ToolResponse;
use crate::tools::traits::{ToolCapabilities, ToolFactory, ToolHandler};

// ============================================================================
// SendClientMessageTool - Coach sends a message
// ============================================================================

/// Tool sending a message to a client
pub struct SendClientMessageTool;

/// Arguments of `send_client_message`
#[derive(Debug, Deserialize)]
pub struct SendClientMessageParams {
    /// Recipient
    pub client_id: Uuid,
    /// Message text
    pub body: String,
    /// De-duplication key for retried sends
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Result of `send_client_message`
#[derive(Debug, Serialize)]
pub struct SentMessage {
    /// Stored message
    pub message: CoachMessage,
    /// Whether an earlier send with the same key was returned instead
    pub duplicate: bool,
}

#[async_trait]
impl ToolHandler for SendClientMessageTool {
    type Params = SendClientMessageParams;
    type Output = SentMessage;

    fn name(&self) -> &'static str {
        SEND_CLIENT_MESSAGE
    }

    fn description(&self) -> &'static str {
        "Send a message to a client with an active coaching relationship. Pass an \
         idempotency_key when retrying so the client receives the message only once."
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new()
            .param(ParameterSpec::required(
                "client_id",
                "Client user id",
                ParameterKind::Uuid,
            ))
            .param(ParameterSpec::required(
                "body",
                "Message text",
                ParameterKind::string_max(MAX_MESSAGE_LENGTH),
            ))
            .param(ParameterSpec::optional(
                "idempotency_key",
                "Caller-chosen key identifying this send to this client across retries",
                ParameterKind::string_max(MAX_IDEMPOTENCY_KEY_LENGTH),
            ))
    }

    fn minimum_role(&self) -> Option<UserRole> {
        Some(UserRole::Coach)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::WRITES_DATA
            | ToolCapabilities::TENANT_SCOPED
            | ToolCapabilities::MESSAGING
    }

    async fn execute(
        &self,
        params: SendClientMessageParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<SentMessage>> {
        if let Some(denied) = tenant_guard(context, params.client_id).await? {
            return Ok(denied.into());
        }

        let idempotency_key = params
            .idempotency_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());
        let message = CoachMessage::new(
            context.caller_id(),
            params.client_id,
            params.body,
            idempotency_key,
        );

        let inserted = context.database().insert_message(&message).await?;
        let duplicate = inserted.is_duplicate();
        Ok(ToolResponse::success(SentMessage {
            message: inserted.into_message(),
            duplicate,
        }))
    }
}

// ============================================================================
// GetClientMessagesTool - Message history with a client
// ============================================================================

/// Tool reading message history with a client
pub struct GetClientMessagesTool;

/// Arguments of `get_client_messages`
#[derive(Debug, Deserialize)]
pub struct GetClientMessagesParams {
    /// Client whose history is requested
    pub client_id: Uuid,
    /// Page size
    pub limit: u32,
}

/// Result of `get_client_messages`
#[derive(Debug, Serialize)]
pub struct MessageHistory {
    /// Client the messages were sent to
    pub client_id: Uuid,
    /// Most recent first
    pub messages: Vec<CoachMessage>,
    /// Number of messages returned
    pub count: usize,
}

#[async_trait]
impl ToolHandler for GetClientMessagesTool {
    type Params = GetClientMessagesParams;
    type Output = MessageHistory;

    fn name(&self) -> &'static str {
        GET_CLIENT_MESSAGES
    }

    fn description(&self) -> &'static str {
        "Get the messages you sent to a client, most recent first. Requires an active \
         coaching relationship."
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new()
            .param(ParameterSpec::required(
                "client_id",
                "Client user id",
                ParameterKind::Uuid,
            ))
            .param(
                ParameterSpec::optional(
                    "limit",
                    "Maximum number of messages to return",
                    ParameterKind::integer_range(1, MAX_PAGE_SIZE),
                )
                .with_default(DEFAULT_HISTORY_PAGE_SIZE),
            )
    }

    fn minimum_role(&self) -> Option<UserRole> {
        Some(UserRole::Coach)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
            | ToolCapabilities::TENANT_SCOPED
            | ToolCapabilities::MESSAGING
    }

    async fn execute(
        &self,
        params: GetClientMessagesParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<MessageHistory>> {
        if let Some(denied) = tenant_guard(context, params.client_id).await? {
            return Ok(denied.into());
        }

        let messages = context
            .database()
            .list_messages(context.caller_id(), params.client_id, params.limit)
            .await?;

        Ok(ToolResponse::success(MessageHistory {
            client_id: params.client_id,
            count: messages.len(),
            messages,
        }))
    }
}

// ============================================================================
// Module exports
// ============================================================================

/// Create all messaging tools for registration
#[must_use]
pub fn create_messaging_tools() -> Vec<Arc<dyn ToolFactory>> {
    vec![
        ToolDefinition::shared(SendClientMessageTool),
        ToolDefinition::shared(GetClientMessagesTool),
    ]
}
