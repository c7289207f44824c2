// ABOUTME: User account database operations
// ABOUTME: Creates users and looks them up by id or email
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;

use pierre_coaching_core::models::User;

use super::{
    format_timestamp, get_string, get_timestamp, get_uuid, is_unique_violation, Database,
};
use crate::errors::{AppError, AppResult};

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                display_name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'client' CHECK (role IN ('client', 'coach', 'admin')),
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl("CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)")
            .await
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email is taken, or a database
    /// error if the insert fails
    pub async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, display_name, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .bind(format_timestamp(&user.created_at))
        .execute(self.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("User with email {} already exists", user.email))
            } else {
                AppError::database(format!("Failed to create user: {e}"))
            }
        })?;

        Ok(())
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed
    pub async fn get_user(&self, user_id: uuid::Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, email, display_name, role, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, email, display_name, role, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        Ok(User {
            id: get_uuid(row, "id")?,
            email: get_string(row, "email")?,
            display_name: get_string(row, "display_name")?,
            role: get_string(row, "role")?.parse()?,
            created_at: get_timestamp(row, "created_at")?,
        })
    }
}
