// ABOUTME: Coach authorization service backed by the relationship store
// ABOUTME: verify_relationship, is_authorized, list_clients, and compare-and-set lifecycle moves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{debug, info, warn};
use uuid::Uuid;

use pierre_coaching_core::models::{
    ClientSummary, CoachClientRelationship, RelationshipFilter, RelationshipStatus,
};

use crate::database::Database;
use crate::errors::{AppError, AppResult};

/// Tenant authorization checks for one store handle
///
/// Holds only a borrowed store handle, so building one per call is free.
#[derive(Clone, Copy)]
pub struct CoachAuthorization<'a> {
    database: &'a Database,
}

impl<'a> CoachAuthorization<'a> {
    /// Create an authorization service over `database`
    #[must_use]
    pub const fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Latest relationship row for the pair, whatever its status
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails
    pub async fn verify_relationship(
        &self,
        coach_id: Uuid,
        client_id: Uuid,
    ) -> AppResult<Option<CoachClientRelationship>> {
        self.database
            .get_latest_relationship(coach_id, client_id)
            .await
    }

    /// Whether an active relationship links the coach to the client
    ///
    /// `pending`, `inactive`, `terminated` and missing rows all return `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails
    pub async fn is_authorized(&self, coach_id: Uuid, client_id: Uuid) -> AppResult<bool> {
        let authorized = self
            .database
            .has_active_relationship(coach_id, client_id)
            .await?;
        if !authorized {
            warn!(
                coach_id = %coach_id,
                client_id = %client_id,
                "Tenant authorization denied: no active relationship"
            );
        }
        Ok(authorized)
    }

    /// A coach's clients matching `filter`, with minimal client identity
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails
    pub async fn list_clients(
        &self,
        coach_id: Uuid,
        filter: RelationshipFilter,
        limit: u32,
    ) -> AppResult<Vec<ClientSummary>> {
        let clients = self
            .database
            .list_client_summaries(coach_id, filter, limit)
            .await?;
        debug!(coach_id = %coach_id, count = clients.len(), ?filter, "Listed clients");
        Ok(clients)
    }

    /// Create a pending relationship for a coach inviting a client
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if a pending or active relationship
    /// already links the pair, or a store error
    pub async fn assign(&self, coach_id: Uuid, client_id: Uuid) -> AppResult<CoachClientRelationship> {
        let relationship = CoachClientRelationship::new_pending(coach_id, client_id);
        self.database.create_relationship(&relationship).await?;
        info!(
            relationship_id = %relationship.id,
            coach_id = %coach_id,
            client_id = %client_id,
            "Coach assigned client"
        );
        Ok(relationship)
    }

    /// Apply a lifecycle transition and persist it with compare-and-set
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the lifecycle forbids the move or
    /// another writer changed the row first, or a store error
    pub async fn transition(
        &self,
        relationship: &CoachClientRelationship,
        next: RelationshipStatus,
    ) -> AppResult<CoachClientRelationship> {
        let expected = relationship.status;
        let mut updated = relationship.clone();
        updated.transition_to(next)?;

        if !self
            .database
            .update_relationship_status(&updated, expected)
            .await?
        {
            return Err(AppError::invalid_transition(format!(
                "Relationship {} changed concurrently; expected status {expected}",
                relationship.id
            )));
        }

        info!(
            relationship_id = %updated.id,
            from = %expected,
            to = %next,
            "Relationship status changed"
        );
        Ok(updated)
    }
}
