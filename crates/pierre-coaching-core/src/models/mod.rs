// ABOUTME: Coaching domain models shared by the store and the tools
// ABOUTME: Relationships, users, workouts, and coach messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod message;
mod relationship;
mod user;
mod workout;

pub use message::CoachMessage;
pub use relationship::{CoachClientRelationship, RelationshipFilter, RelationshipStatus};
pub use user::{ClientSummary, User};
pub use workout::{Workout, WorkoutType};
