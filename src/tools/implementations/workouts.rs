// ABOUTME: Workout tools: clients log their own workouts, coaches read an active client's history
// ABOUTME: log_workout writes only the caller's rows; get_client_workouts is tenant-scoped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Tools
//!
//! - `LogWorkoutTool` - Record a completed workout for the caller
//! - `GetClientWorkoutsTool` - A client's recent workouts, gated by tenant authorization

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pierre_coaching_core::constants::limits::{
    DEFAULT_HISTORY_PAGE_SIZE, MAX_PAGE_SIZE, MAX_WORKOUT_MINUTES, MAX_WORKOUT_NOTES_LENGTH,
    MAX_WORKOUT_TITLE_LENGTH,
};
use pierre_coaching_core::constants::tools::{GET_CLIENT_WORKOUTS, LOG_WORKOUT};
use pierre_coaching_core::models::{Workout, WorkoutType};
use pierre_coaching_core::permissions::UserRole;

use super::tenant_guard;
use crate::errors::AppResult;
use crate::tools::context::ToolContext;
use crate::tools::contract::{ParameterContract, ParameterKind, ParameterSpec};
use crate::tools::definition::ToolDefinition;
use crate::tools::response::ToolResponse;
use crate::tools::traits::{ToolCapabilities, ToolFactory, ToolHandler};

// ============================================================================
// LogWorkoutTool - Record a workout for the caller
// ============================================================================

/// Tool recording a completed workout
pub struct LogWorkoutTool;

/// Arguments of `log_workout`
#[derive(Debug, Deserialize)]
pub struct LogWorkoutParams {
    /// Short title
    pub title: String,
    /// Sport category
    pub workout_type: WorkoutType,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Completion time; now when omitted
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl ToolHandler for LogWorkoutTool {
    type Params = LogWorkoutParams;
    type Output = Workout;

    fn name(&self) -> &'static str {
        LOG_WORKOUT
    }

    fn description(&self) -> &'static str {
        "Log a completed workout. Your active coaches can review it."
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new()
            .param(ParameterSpec::required(
                "title",
                "Short workout title",
                ParameterKind::string_max(MAX_WORKOUT_TITLE_LENGTH),
            ))
            .param(
                ParameterSpec::optional(
                    "workout_type",
                    "Sport category",
                    ParameterKind::one_of(&WorkoutType::TAGS),
                )
                .with_default("other"),
            )
            .param(ParameterSpec::required(
                "duration_minutes",
                "Duration in minutes",
                ParameterKind::integer_range(1, MAX_WORKOUT_MINUTES),
            ))
            .param(ParameterSpec::optional(
                "notes",
                "How the session went",
                ParameterKind::string_max(MAX_WORKOUT_NOTES_LENGTH),
            ))
            .param(ParameterSpec::optional(
                "completed_at",
                "When the workout finished (RFC 3339); defaults to now",
                ParameterKind::Timestamp,
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
        params: LogWorkoutParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<Workout>> {
        let now = Utc::now();
        let completed_at = params.completed_at.unwrap_or(now);
        if completed_at > now {
            return Ok(ToolResponse::invalid_parameters(format!(
                "completed_at {} is in the future",
                completed_at.to_rfc3339()
            )));
        }

        let workout = Workout {
            id: Uuid::new_v4(),
            user_id: context.caller_id(),
            title: params.title.trim().to_owned(),
            workout_type: params.workout_type,
            duration_minutes: params.duration_minutes,
            notes: params.notes.filter(|notes| !notes.trim().is_empty()),
            completed_at,
            created_at: now,
        };
        context.database().create_workout(&workout).await?;

        Ok(ToolResponse::success(workout))
    }
}

// ============================================================================
// GetClientWorkoutsTool - A client's recent workouts
// ============================================================================

/// Tool reading a client's workout history
pub struct GetClientWorkoutsTool;

/// Arguments of `get_client_workouts`
#[derive(Debug, Deserialize)]
pub struct GetClientWorkoutsParams {
    /// Client whose workouts are requested
    pub client_id: Uuid,
    /// Page size
    pub limit: u32,
}

/// Result of `get_client_workouts`
#[derive(Debug, Serialize)]
pub struct WorkoutHistory {
    /// Client the workouts belong to
    pub client_id: Uuid,
    /// Most recent first
    pub workouts: Vec<Workout>,
    /// Number of workouts returned
    pub count: usize,
}

#[async_trait]
impl ToolHandler for GetClientWorkoutsTool {
    type Params = GetClientWorkoutsParams;
    type Output = WorkoutHistory;

    fn name(&self) -> &'static str {
        GET_CLIENT_WORKOUTS
    }

    fn description(&self) -> &'static str {
        "Get a client's most recent workouts. Requires an active coaching relationship."
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
                    "Maximum number of workouts to return",
                    ParameterKind::integer_range(1, MAX_PAGE_SIZE),
                )
                .with_default(DEFAULT_HISTORY_PAGE_SIZE),
            )
    }

    fn minimum_role(&self) -> Option<UserRole> {
        Some(UserRole::Coach)
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA | ToolCapabilities::TENANT_SCOPED
    }

    async fn execute(
        &self,
        params: GetClientWorkoutsParams,
        context: &ToolContext,
    ) -> AppResult<ToolResponse<WorkoutHistory>> {
        if let Some(denied) = tenant_guard(context, params.client_id).await? {
            return Ok(denied.into());
        }

        let workouts = context
            .database()
            .list_workouts(params.client_id, params.limit)
            .await?;

        Ok(ToolResponse::success(WorkoutHistory {
            client_id: params.client_id,
            count: workouts.len(),
            workouts,
        }))
    }
}

// ============================================================================
// Module exports
// ============================================================================

/// Create all workout tools for registration
#[must_use]
pub fn create_workout_tools() -> Vec<Arc<dyn ToolFactory>> {
    vec![
        ToolDefinition::shared(LogWorkoutTool),
        ToolDefinition::shared(GetClientWorkoutsTool),
    ]
}
