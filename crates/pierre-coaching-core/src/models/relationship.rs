// ABOUTME: Coach-client relationship model and its lifecycle state machine
// ABOUTME: Only an active relationship grants a coach access to a client's data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Lifecycle status of a coach-client relationship
///
/// ```text
/// pending ──accept──▶ active ──end──▶ inactive ──end──▶ terminated
///                        └─────────────end────────────────▲
/// ```
///
/// Nothing ever re-enters `active` except from `pending`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    /// Coach assigned the client, awaiting client acceptance
    #[default]
    Pending,
    /// Client accepted; the coach may access client data
    Active,
    /// Relationship paused or lapsed; no access
    Inactive,
    /// Relationship ended for good; no access
    Terminated,
}

impl RelationshipStatus {
    /// Every status, in lifecycle order
    pub const ALL: [Self; 4] = [Self::Pending, Self::Active, Self::Inactive, Self::Terminated];

    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Terminated => "terminated",
        }
    }

    /// Whether this status grants the coach access to client data
    #[must_use]
    pub const fn grants_access(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the relationship still counts as open (blocks a second assignment)
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active)
                | (Self::Active, Self::Inactive | Self::Terminated)
                | (Self::Inactive, Self::Terminated)
        )
    }
}

impl Display for RelationshipStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "terminated" => Ok(Self::Terminated),
            _ => Err(AppError::invalid_input(format!(
                "Invalid relationship status: {s}"
            ))),
        }
    }
}

/// Filter applied when listing a coach's clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationshipFilter {
    /// Every relationship regardless of status
    All,
    /// Only relationships in the given status
    Status(RelationshipStatus),
    /// Only active relationships
    #[default]
    Active,
}

impl RelationshipFilter {
    /// Tags accepted by [`RelationshipFilter::from_str`]
    pub const TAGS: [&'static str; 5] = ["active", "all", "pending", "inactive", "terminated"];

    /// The single status this filter selects, if any
    #[must_use]
    pub const fn status(&self) -> Option<RelationshipStatus> {
        match self {
            Self::All => None,
            Self::Status(status) => Some(*status),
            Self::Active => Some(RelationshipStatus::Active),
        }
    }

    /// Whether a relationship in `status` passes this filter
    #[must_use]
    pub fn matches(&self, status: RelationshipStatus) -> bool {
        self.status().is_none_or(|wanted| wanted == status)
    }
}

impl FromStr for RelationshipFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            other => other.parse().map(Self::Status),
        }
    }
}

/// Link between a coach and a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoachClientRelationship {
    /// Row identifier
    pub id: Uuid,
    /// Coach user id
    pub coach_id: Uuid,
    /// Client user id
    pub client_id: Uuid,
    /// Current lifecycle status
    pub status: RelationshipStatus,
    /// When the coach assigned the client
    pub assigned_at: DateTime<Utc>,
    /// When the client accepted
    pub accepted_at: Option<DateTime<Utc>>,
    /// When the relationship ended (inactive or terminated)
    pub terminated_at: Option<DateTime<Utc>>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

impl CoachClientRelationship {
    /// Create a new pending relationship for a coach assigning a client
    #[must_use]
    pub fn new_pending(coach_id: Uuid, client_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            coach_id,
            client_id,
            status: RelationshipStatus::Pending,
            assigned_at: now,
            accepted_at: None,
            terminated_at: None,
            updated_at: now,
        }
    }

    /// Whether this relationship currently grants data access
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.grants_access()
    }

    /// Whether `user_id` is the coach or the client of this relationship
    #[must_use]
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.coach_id == user_id || self.client_id == user_id
    }

    /// Move to `next`, stamping the matching timestamp
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the lifecycle forbids the move
    pub fn transition_to(&mut self, next: RelationshipStatus) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::invalid_transition(format!(
                "Relationship {} cannot move from {} to {next}",
                self.id, self.status
            )));
        }

        let now = Utc::now();
        match next {
            RelationshipStatus::Active => self.accepted_at = Some(now),
            RelationshipStatus::Inactive | RelationshipStatus::Terminated => {
                self.terminated_at.get_or_insert(now);
            }
            RelationshipStatus::Pending => {}
        }
        debug!(
            relationship_id = %self.id,
            from = %self.status,
            to = %next,
            "Relationship status transition"
        );
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_grants_access() {
        for status in RelationshipStatus::ALL {
            assert_eq!(status.grants_access(), status == RelationshipStatus::Active);
        }
    }

    #[test]
    fn test_allowed_transitions() {
        use RelationshipStatus::{Active, Inactive, Pending, Terminated};

        let allowed = [
            (Pending, Active),
            (Active, Inactive),
            (Active, Terminated),
            (Inactive, Terminated),
        ];
        for from in RelationshipStatus::ALL {
            for to in RelationshipStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_terminated_never_returns_to_active() {
        let mut relationship = CoachClientRelationship::new_pending(Uuid::new_v4(), Uuid::new_v4());
        relationship.transition_to(RelationshipStatus::Active).unwrap();
        relationship
            .transition_to(RelationshipStatus::Terminated)
            .unwrap();

        let error = relationship
            .transition_to(RelationshipStatus::Active)
            .unwrap_err();
        assert_eq!(error.code, crate::errors::ErrorCode::InvalidStateTransition);
        assert_eq!(relationship.status, RelationshipStatus::Terminated);
        assert!(relationship.status.is_terminal());
    }

    #[test]
    fn test_transition_stamps_timestamps() {
        let mut relationship = CoachClientRelationship::new_pending(Uuid::new_v4(), Uuid::new_v4());
        assert!(relationship.accepted_at.is_none());

        relationship.transition_to(RelationshipStatus::Active).unwrap();
        assert!(relationship.accepted_at.is_some());
        assert!(relationship.terminated_at.is_none());

        relationship.transition_to(RelationshipStatus::Inactive).unwrap();
        let ended = relationship.terminated_at;
        assert!(ended.is_some());

        relationship
            .transition_to(RelationshipStatus::Terminated)
            .unwrap();
        assert_eq!(relationship.terminated_at, ended);
    }

    #[test]
    fn test_pending_cannot_skip_to_terminated() {
        let mut relationship = CoachClientRelationship::new_pending(Uuid::new_v4(), Uuid::new_v4());
        assert!(relationship
            .transition_to(RelationshipStatus::Terminated)
            .is_err());
        assert_eq!(relationship.status, RelationshipStatus::Pending);
    }

    #[test]
    fn test_filter_parsing_and_matching() {
        let filter: RelationshipFilter = "all".parse().unwrap();
        assert!(RelationshipStatus::ALL.iter().all(|s| filter.matches(*s)));

        let filter: RelationshipFilter = "active".parse().unwrap();
        assert_eq!(filter, RelationshipFilter::Active);
        assert!(filter.matches(RelationshipStatus::Active));
        assert!(!filter.matches(RelationshipStatus::Pending));

        let filter: RelationshipFilter = "terminated".parse().unwrap();
        assert_eq!(
            filter,
            RelationshipFilter::Status(RelationshipStatus::Terminated)
        );
        assert!("archived".parse::<RelationshipFilter>().is_err());
    }
}
