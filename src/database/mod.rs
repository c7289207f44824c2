// ABOUTME: SQLite-backed coaching store shared by every tool call of a request
// ABOUTME: Owns the connection pool, schema migrations, and row parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Coaching Database
//!
//! `Database` is the store handle carried inside every `ToolContext`. It wraps
//! a `SqlitePool`, so it is `Send + Sync` and can serve many concurrent tool
//! calls without locking at the framework layer. Operations are grouped by
//! entity in the submodules, each adding an `impl Database` block.

mod messages;
mod relationships;
mod users;
mod workouts;

pub use messages::MessageInsert;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Connection cap for file-backed databases
const MAX_FILE_CONNECTIONS: u32 = 8;

/// How long to wait for a free connection before failing a query
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Coaching data store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database at `database_url` and run migrations
    ///
    /// In-memory URLs (`sqlite::memory:`) are pinned to a single connection
    /// that never idles out, so every caller sees the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or a
    /// migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL '{database_url}': {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_FILE_CONNECTIONS)
        };

        let pool = pool_options
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let database = Self { pool };
        database.migrate().await?;
        info!(in_memory, "Coaching database ready");
        Ok(database)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run all schema migrations (idempotent)
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_relationships().await?;
        self.migrate_workouts().await?;
        self.migrate_messages().await?;
        debug!("Database migrations complete");
        Ok(())
    }

    /// Execute a single DDL statement
    async fn execute_ddl(&self, statement: &str) -> AppResult<()> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        Ok(())
    }
}

/// Read a UUID stored as TEXT
fn get_uuid(row: &SqliteRow, column: &str) -> AppResult<Uuid> {
    let raw: String = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Missing column {column}: {e}")))?;
    Uuid::parse_str(&raw)
        .map_err(|e| AppError::database(format!("Invalid UUID in column {column}: {e}")))
}

/// Read an RFC 3339 timestamp stored as TEXT
fn get_timestamp(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Missing column {column}: {e}")))?;
    parse_timestamp(column, &raw)
}

/// Read a nullable RFC 3339 timestamp stored as TEXT
fn get_optional_timestamp(row: &SqliteRow, column: &str) -> AppResult<Option<DateTime<Utc>>> {
    let raw: Option<String> = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Missing column {column}: {e}")))?;
    raw.map(|value| parse_timestamp(column, &value)).transpose()
}

/// Fixed-width RFC 3339 so TEXT ordering matches chronological ordering
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp in column {column}: {e}")))
}

/// Read a TEXT column
fn get_string(row: &SqliteRow, column: &str) -> AppResult<String> {
    row.try_get(column)
        .map_err(|e| AppError::database(format!("Missing column {column}: {e}")))
}

/// Read a nullable TEXT column
fn get_optional_string(row: &SqliteRow, column: &str) -> AppResult<Option<String>> {
    row.try_get(column)
        .map_err(|e| AppError::database(format!("Missing column {column}: {e}")))
}

/// Whether a sqlx error is a UNIQUE constraint violation
fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation())
}
