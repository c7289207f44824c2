// ABOUTME: Coach-client relationship database operations
// ABOUTME: Lookup, listing with client identity, and compare-and-set status transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use pierre_coaching_core::models::{
    ClientSummary, CoachClientRelationship, RelationshipFilter, RelationshipStatus,
};

use super::{
    format_timestamp, get_optional_timestamp, get_string, get_timestamp, get_uuid,
    is_unique_violation, Database,
};
use crate::errors::{AppError, AppResult};

const RELATIONSHIP_COLUMNS: &str =
    "id, coach_id, client_id, status, assigned_at, accepted_at, terminated_at, updated_at";

impl Database {
    /// Create the relationship table and its indexes
    pub(super) async fn migrate_relationships(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS coach_client_relationships (
                id TEXT PRIMARY KEY,
                coach_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                client_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'active', 'inactive', 'terminated')),
                assigned_at TEXT NOT NULL,
                accepted_at TEXT,
                terminated_at TEXT,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_relationships_coach ON coach_client_relationships(coach_id, status)",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_relationships_client ON coach_client_relationships(client_id, status)",
        )
        .await?;

        // At most one open (pending or active) relationship per coach/client pair
        self.execute_ddl(
            r"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_relationships_open_pair
            ON coach_client_relationships(coach_id, client_id)
            WHERE status IN ('pending', 'active')
            ",
        )
        .await
    }

    /// Insert a new relationship row
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if an open relationship already links
    /// the pair, or a database error if the insert fails
    pub async fn create_relationship(&self, relationship: &CoachClientRelationship) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO coach_client_relationships
                (id, coach_id, client_id, status, assigned_at, accepted_at, terminated_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(relationship.id.to_string())
        .bind(relationship.coach_id.to_string())
        .bind(relationship.client_id.to_string())
        .bind(relationship.status.as_str())
        .bind(format_timestamp(&relationship.assigned_at))
        .bind(relationship.accepted_at.as_ref().map(format_timestamp))
        .bind(relationship.terminated_at.as_ref().map(format_timestamp))
        .bind(format_timestamp(&relationship.updated_at))
        .execute(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!(
                    "Coach {} already has an open relationship with client {}",
                    relationship.coach_id, relationship.client_id
                ))
            } else {
                AppError::database(format!("Failed to create relationship: {e}"))
            }
        })?;

        Ok(())
    }

    /// Get the most recent relationship row for a coach/client pair, any status
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed
    pub async fn get_latest_relationship(
        &self,
        coach_id: Uuid,
        client_id: Uuid,
    ) -> AppResult<Option<CoachClientRelationship>> {
        let query = format!(
            r"
            SELECT {RELATIONSHIP_COLUMNS}
            FROM coach_client_relationships
            WHERE coach_id = $1 AND client_id = $2
            ORDER BY assigned_at DESC, rowid DESC
            LIMIT 1
            "
        );
        let row = sqlx::query(&query)
            .bind(coach_id.to_string())
            .bind(client_id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get relationship: {e}")))?;

        row.map(|r| Self::row_to_relationship(&r)).transpose()
    }

    /// Get the relationship for a pair in a specific status
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed
    pub async fn get_relationship_with_status(
        &self,
        coach_id: Uuid,
        client_id: Uuid,
        status: RelationshipStatus,
    ) -> AppResult<Option<CoachClientRelationship>> {
        let query = format!(
            r"
            SELECT {RELATIONSHIP_COLUMNS}
            FROM coach_client_relationships
            WHERE coach_id = $1 AND client_id = $2 AND status = $3
            ORDER BY assigned_at DESC, rowid DESC
            LIMIT 1
            "
        );
        let row = sqlx::query(&query)
            .bind(coach_id.to_string())
            .bind(client_id.to_string())
            .bind(status.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get relationship: {e}")))?;

        row.map(|r| Self::row_to_relationship(&r)).transpose()
    }

    /// Get the newest non-terminated relationship between two users, in
    /// either direction
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed
    pub async fn get_current_relationship_between(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> AppResult<Option<CoachClientRelationship>> {
        let query = format!(
            r"
            SELECT {RELATIONSHIP_COLUMNS}
            FROM coach_client_relationships
            WHERE ((coach_id = $1 AND client_id = $2) OR (coach_id = $2 AND client_id = $1))
              AND status != 'terminated'
            ORDER BY assigned_at DESC, rowid DESC
            LIMIT 1
            "
        );
        let row = sqlx::query(&query)
            .bind(user_a.to_string())
            .bind(user_b.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get relationship: {e}")))?;

        row.map(|r| Self::row_to_relationship(&r)).transpose()
    }

    /// Whether an active relationship links the coach to the client
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn has_active_relationship(&self, coach_id: Uuid, client_id: Uuid) -> AppResult<bool> {
        let exists: i64 = sqlx::query_scalar(
            r"
            SELECT EXISTS(
                SELECT 1 FROM coach_client_relationships
                WHERE coach_id = $1 AND client_id = $2 AND status = 'active'
            )
            ",
        )
        .bind(coach_id.to_string())
        .bind(client_id.to_string())
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to check relationship: {e}")))?;

        Ok(exists != 0)
    }

    /// Persist a status transition only if the row is still in `expected`
    ///
    /// Returns `false` when another writer changed the row first, which
    /// keeps concurrent transitions from both applying.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_relationship_status(
        &self,
        relationship: &CoachClientRelationship,
        expected: RelationshipStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE coach_client_relationships
            SET status = $1, accepted_at = $2, terminated_at = $3, updated_at = $4
            WHERE id = $5 AND status = $6
            ",
        )
        .bind(relationship.status.as_str())
        .bind(relationship.accepted_at.as_ref().map(format_timestamp))
        .bind(relationship.terminated_at.as_ref().map(format_timestamp))
        .bind(format_timestamp(&relationship.updated_at))
        .bind(relationship.id.to_string())
        .bind(expected.as_str())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update relationship: {e}")))?;

        Ok(result.rows_affected() == 1)
    }

    /// List a coach's clients joined with minimal client identity
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed
    pub async fn list_client_summaries(
        &self,
        coach_id: Uuid,
        filter: RelationshipFilter,
        limit: u32,
    ) -> AppResult<Vec<ClientSummary>> {
        let rows = sqlx::query(
            r"
            SELECT r.id AS relationship_id, r.client_id, r.status, r.assigned_at, r.accepted_at,
                   u.display_name, u.email
            FROM coach_client_relationships r
            JOIN users u ON u.id = r.client_id
            WHERE r.coach_id = $1 AND ($2 IS NULL OR r.status = $2)
            ORDER BY u.display_name ASC, r.assigned_at DESC
            LIMIT $3
            ",
        )
        .bind(coach_id.to_string())
        .bind(filter.status().map(|s| s.as_str()))
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list clients: {e}")))?;

        rows.iter().map(Self::row_to_client_summary).collect()
    }

    /// List relationships across all coaches (admin view)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed
    pub async fn list_relationships(
        &self,
        filter: RelationshipFilter,
        limit: u32,
    ) -> AppResult<Vec<CoachClientRelationship>> {
        let query = format!(
            r"
            SELECT {RELATIONSHIP_COLUMNS}
            FROM coach_client_relationships
            WHERE ($1 IS NULL OR status = $1)
            ORDER BY assigned_at DESC, rowid DESC
            LIMIT $2
            "
        );
        let rows = sqlx::query(&query)
            .bind(filter.status().map(|s| s.as_str()))
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to list relationships: {e}")))?;

        rows.iter().map(Self::row_to_relationship).collect()
    }

    fn row_to_relationship(row: &SqliteRow) -> AppResult<CoachClientRelationship> {
        Ok(CoachClientRelationship {
            id: get_uuid(row, "id")?,
            coach_id: get_uuid(row, "coach_id")?,
            client_id: get_uuid(row, "client_id")?,
            status: get_string(row, "status")?.parse()?,
            assigned_at: get_timestamp(row, "assigned_at")?,
            accepted_at: get_optional_timestamp(row, "accepted_at")?,
            terminated_at: get_optional_timestamp(row, "terminated_at")?,
            updated_at: get_timestamp(row, "updated_at")?,
        })
    }

    fn row_to_client_summary(row: &SqliteRow) -> AppResult<ClientSummary> {
        Ok(ClientSummary {
            client_id: get_uuid(row, "client_id")?,
            display_name: get_string(row, "display_name")?,
            email: get_string(row, "email")?,
            relationship_id: get_uuid(row, "relationship_id")?,
            status: get_string(row, "status")?.parse()?,
            assigned_at: get_timestamp(row, "assigned_at")?,
            accepted_at: get_optional_timestamp(row, "accepted_at")?,
        })
    }
}
