// ABOUTME: Workout log database operations
// ABOUTME: Clients record workouts here; coaches read them through tenant-scoped tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use pierre_coaching_core::models::Workout;

use super::{
    format_timestamp, get_optional_string, get_string, get_timestamp, get_uuid, Database,
};
use crate::errors::{AppError, AppResult};

impl Database {
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        self.execute_ddl(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                workout_type TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
                notes TEXT,
                completed_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_ddl(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user ON workouts(user_id, completed_at DESC)",
        )
        .await
    }

    /// Store a logged workout
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_workout(&self, workout: &Workout) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO workouts
                (id, user_id, title, workout_type, duration_minutes, notes, completed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(&workout.title)
        .bind(workout.workout_type.as_str())
        .bind(i64::from(workout.duration_minutes))
        .bind(workout.notes.as_deref())
        .bind(format_timestamp(&workout.completed_at))
        .bind(format_timestamp(&workout.created_at))
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create workout: {e}")))?;

        Ok(())
    }

    /// Most recent workouts for a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed
    pub async fn list_workouts(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<Workout>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, title, workout_type, duration_minutes, notes, completed_at, created_at
            FROM workouts
            WHERE user_id = $1
            ORDER BY completed_at DESC, rowid DESC
            LIMIT $2
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
        let duration: i64 = row
            .try_get("duration_minutes")
            .map_err(|e| AppError::database(format!("Missing column duration_minutes: {e}")))?;
        let duration_minutes = u32::try_from(duration).map_err(|_| {
            AppError::database(format!("Invalid workout duration in database: {duration}"))
        })?;

        Ok(Workout {
            id: get_uuid(row, "id")?,
            user_id: get_uuid(row, "user_id")?,
            title: get_string(row, "title")?,
            workout_type: get_string(row, "workout_type")?.parse()?,
            duration_minutes,
            notes: get_optional_string(row, "notes")?,
            completed_at: get_timestamp(row, "completed_at")?,
            created_at: get_timestamp(row, "created_at")?,
        })
    }
}
