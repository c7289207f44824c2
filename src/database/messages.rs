// ABOUTME: Coach message database operations with idempotent sends
// ABOUTME: A repeated idempotency key for the same coach and client returns the stored message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use pierre_coaching_core::models::CoachMessage;

use super::{
    format_timestamp, get_optional_string, get_string, get_timestamp, get_uuid,
    is_unique_violation, Database,
};
use crate::errors::{AppError, AppResult};

/// Outcome of storing a coach message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageInsert {
    /// The message was stored
    Inserted(CoachMessage),
    /// A message to the same client with the same idempotency key already existed; it is returned unchanged
    Duplicate(CoachMessage),
}

impl MessageInsert {
    /// The stored message, new or pre-existing
    #[must_use]
    pub const fn message(&self) -> &CoachMessage {
        match self {
            Self::Inserted(message) | Self::Duplicate(message) => message,
        }
    }

    /// Take the stored message
    #[must_use]
    pub fn into_message(self) -> CoachMessage {
        match self {
            Self::Inserted(message) | Self::Duplicate(message) => message,
        }
    }

    /// Whether the send was a replay of an earlier one
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

impl Database {
    pub(super) async fn migrate_messages(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS coach_messages (
                id TEXT PRIMARY KEY,
                coach_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                client_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                body TEXT NOT NULL,
                idempotency_key TEXT,
                created_at TEXT NOT NULL,
                UNIQUE (coach_id, client_id, idempotency_key)
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_messages_pair ON coach_messages(coach_id, client_id, created_at DESC)",
        )
        .await
    }

    /// Store a message, honoring its idempotency key
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or insert fails
    pub async fn insert_message(&self, message: &CoachMessage) -> AppResult<MessageInsert> {
        if let Some(key) = message.idempotency_key.as_deref() {
            if let Some(existing) = self
                .get_message_by_key(message.coach_id, message.client_id, key)
                .await?
            {
                return Ok(MessageInsert::Duplicate(existing));
            }
        }

        let result = sqlx::query(
            r"
            INSERT INTO coach_messages (id, coach_id, client_id, body, idempotency_key, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(message.id.to_string())
        .bind(message.coach_id.to_string())
        .bind(message.client_id.to_string())
        .bind(&message.body)
        .bind(message.idempotency_key.as_deref())
        .bind(format_timestamp(&message.created_at))
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(MessageInsert::Inserted(message.clone())),
            // Lost a race with a concurrent send carrying the same key
            Err(e) if is_unique_violation(&e) => {
                let key = message.idempotency_key.as_deref().unwrap_or_default();
                self.get_message_by_key(message.coach_id, message.client_id, key)
                    .await?
                    .map(MessageInsert::Duplicate)
                    .ok_or_else(|| {
                        AppError::database(format!("Failed to store message: {e}"))
                    })
            }
            Err(e) => Err(AppError::database(format!("Failed to store message: {e}"))),
        }
    }

    /// Look up a coach's message to one client by idempotency key
    ///
    /// Keys are scoped to the coach-client pair, so a key reused for another
    /// client never matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed
    pub async fn get_message_by_key(
        &self,
        coach_id: Uuid,
        client_id: Uuid,
        idempotency_key: &str,
    ) -> AppResult<Option<CoachMessage>> {
        let row = sqlx::query(
            r"
            SELECT id, coach_id, client_id, body, idempotency_key, created_at
            FROM coach_messages
            WHERE coach_id = $1 AND client_id = $2 AND idempotency_key = $3
            ",
        )
        .bind(coach_id.to_string())
        .bind(client_id.to_string())
        .bind(idempotency_key)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get message: {e}")))?;

        row.map(|r| Self::row_to_message(&r)).transpose()
    }

    /// Messages from a coach to a client, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed
    pub async fn list_messages(
        &self,
        coach_id: Uuid,
        client_id: Uuid,
        limit: u32,
    ) -> AppResult<Vec<CoachMessage>> {
        let rows = sqlx::query(
            r"
            SELECT id, coach_id, client_id, body, idempotency_key, created_at
            FROM coach_messages
            WHERE coach_id = $1 AND client_id = $2
            ORDER BY created_at DESC, rowid DESC
            LIMIT $3
            ",
        )
        .bind(coach_id.to_string())
        .bind(client_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list messages: {e}")))?;

        rows.iter().map(Self::row_to_message).collect()
    }

    fn row_to_message(row: &SqliteRow) -> AppResult<CoachMessage> {
        Ok(CoachMessage {
            id: get_uuid(row, "id")?,
            coach_id: get_uuid(row, "coach_id")?,
            client_id: get_uuid(row, "client_id")?,
            body: get_string(row, "body")?,
            idempotency_key: get_optional_string(row, "idempotency_key")?,
            created_at: get_timestamp(row, "created_at")?,
        })
    }
}
