// ABOUTME: Workout log model recorded by clients and read by their coaches
// ABOUTME: WorkoutType is a closed set of sport categories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Category of a logged workout
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    /// Running session
    Run,
    /// Cycling session
    Ride,
    /// Swimming session
    Swim,
    /// Strength training
    Strength,
    /// Stretching, yoga, mobility work
    Mobility,
    /// Anything else
    #[default]
    Other,
}

impl WorkoutType {
    /// Tags accepted by the workout tools
    pub const TAGS: [&'static str; 6] = ["run", "ride", "swim", "strength", "mobility", "other"];

    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Ride => "ride",
            Self::Swim => "swim",
            Self::Strength => "strength",
            Self::Mobility => "mobility",
            Self::Other => "other",
        }
    }
}

impl Display for WorkoutType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "run" => Ok(Self::Run),
            "ride" => Ok(Self::Ride),
            "swim" => Ok(Self::Swim),
            "strength" => Ok(Self::Strength),
            "mobility" => Ok(Self::Mobility),
            "other" => Ok(Self::Other),
            _ => Err(AppError::invalid_input(format!("Invalid workout type: {s}"))),
        }
    }
}

/// A completed workout logged by a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    /// Workout identifier
    pub id: Uuid,
    /// Owning client
    pub user_id: Uuid,
    /// Short title
    pub title: String,
    /// Sport category
    pub workout_type: WorkoutType,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the workout was done
    pub completed_at: DateTime<Utc>,
    /// When the log entry was created
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for tag in WorkoutType::TAGS {
            let parsed: WorkoutType = tag.parse().unwrap();
            assert_eq!(parsed.as_str(), tag);
        }
        assert!("yoga".parse::<WorkoutType>().is_err());
    }
}
