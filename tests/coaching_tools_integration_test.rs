// ABOUTME: End-to-end tests for the built-in coaching tools through the bound tool set
// ABOUTME: Exercises roster listing, relationship lifecycle, workouts, messaging and admin oversight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashSet;

use anyhow::Result;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use pierre_coaching::models::RelationshipStatus;
use pierre_coaching::permissions::UserRole;
use pierre_coaching::tools::ToolErrorCode;

mod common;

fn ids(items: &Value, field: &str) -> HashSet<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].as_str().unwrap().to_owned())
        .collect()
}

// ============================================================================
// Clients
// ============================================================================

#[tokio::test]
async fn test_list_clients_defaults_to_active() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let active = common::create_user(&database, UserRole::Client).await?;
    let pending = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, active.id, RelationshipStatus::Active).await?;
    common::link(&database, coach.id, pending.id, RelationshipStatus::Pending).await?;

    let tools = common::bound_tools(&database, &coach);

    let default = tools.call("list_clients", json!({})).await;
    let data = default.data().unwrap();
    assert_eq!(data["status"], "active");
    assert_eq!(data["count"], 1);
    assert_eq!(data["clients"][0]["client_id"], json!(active.id));
    assert_eq!(data["clients"][0]["display_name"], json!(active.display_name));

    let everyone = tools.call("list_clients", json!({ "status": "all" })).await;
    let data = everyone.data().unwrap();
    assert_eq!(data["count"], 2);
    assert_eq!(
        ids(&data["clients"], "client_id"),
        HashSet::from([active.id.to_string(), pending.id.to_string()])
    );

    let only_pending = tools
        .call("list_clients", json!({ "status": "pending", "limit": 5 }))
        .await;
    assert_eq!(only_pending.data().unwrap()["clients"][0]["status"], "pending");
    Ok(())
}

#[tokio::test]
async fn test_list_clients_rejects_unknown_status_and_bad_limit() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let tools = common::bound_tools(&database, &coach);

    for args in [
        json!({ "status": "archived" }),
        json!({ "limit": 0 }),
        json!({ "limit": 1000 }),
        json!({ "limit": "ten" }),
        json!([1, 2, 3]),
    ] {
        let response = tools.call("list_clients", args.clone()).await;
        assert_eq!(
            response.error_code(),
            Some(&ToolErrorCode::InvalidParameters),
            "{args}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_coach_cannot_see_another_coachs_roster() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let rival = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, client.id, RelationshipStatus::Active).await?;

    let rival_view = common::bound_tools(&database, &rival)
        .call("list_clients", json!({ "status": "all" }))
        .await;
    assert_eq!(rival_view.data().unwrap()["count"], 0);
    Ok(())
}

// ============================================================================
// Relationship lifecycle
// ============================================================================

#[tokio::test]
async fn test_invitation_flow_from_assignment_to_termination() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    let coach_tools = common::bound_tools(&database, &coach);
    let client_tools = common::bound_tools(&database, &client);

    let assigned = coach_tools
        .call("assign_client", json!({ "client_id": client.id }))
        .await;
    assert_eq!(assigned.data().unwrap()["status"], "pending");

    let before_accept = coach_tools
        .call("get_client_profile", json!({ "client_id": client.id }))
        .await;
    assert_eq!(before_accept.error_code(), Some(&ToolErrorCode::Unauthorized));

    let accepted = client_tools
        .call("accept_coach_invitation", json!({ "coach_id": coach.id }))
        .await;
    let accepted = accepted.data().unwrap();
    assert_eq!(accepted["status"], "active");
    assert!(!accepted["accepted_at"].is_null());

    let accepted_again = client_tools
        .call("accept_coach_invitation", json!({ "coach_id": coach.id }))
        .await;
    assert_eq!(
        accepted_again.error_code().unwrap().to_string(),
        "RELATIONSHIP_NOT_FOUND"
    );

    let profile = coach_tools
        .call("get_client_profile", json!({ "client_id": client.id }))
        .await;
    assert!(profile.is_success());

    let paused = client_tools
        .call(
            "end_coaching_relationship",
            json!({ "counterpart_id": coach.id, "outcome": "inactive" }),
        )
        .await;
    assert_eq!(paused.data().unwrap()["status"], "inactive");

    let after_pause = coach_tools
        .call("get_client_profile", json!({ "client_id": client.id }))
        .await;
    assert_eq!(after_pause.error_code(), Some(&ToolErrorCode::Unauthorized));

    let ended = coach_tools
        .call("end_coaching_relationship", json!({ "counterpart_id": client.id }))
        .await;
    assert_eq!(ended.data().unwrap()["status"], "terminated");

    let nothing_left = coach_tools
        .call("end_coaching_relationship", json!({ "counterpart_id": client.id }))
        .await;
    assert_eq!(
        nothing_left.error_code(),
        Some(&ToolErrorCode::not_found("relationship"))
    );
    Ok(())
}

#[tokio::test]
async fn test_ending_a_pending_invitation_is_rejected() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, client.id, RelationshipStatus::Pending).await?;

    let response = common::bound_tools(&database, &client)
        .call("end_coaching_relationship", json!({ "counterpart_id": coach.id }))
        .await;

    assert_eq!(response.error_code(), Some(&ToolErrorCode::ToolError));
    assert!(response.failure().unwrap().message.contains("pending"));
    Ok(())
}

#[tokio::test]
async fn test_end_relationship_rejects_pending_as_outcome() -> Result<()> {
    let database = common::create_test_database().await?;
    let client = common::create_user(&database, UserRole::Client).await?;

    let response = common::bound_tools(&database, &client)
        .call(
            "end_coaching_relationship",
            json!({ "counterpart_id": uuid::Uuid::new_v4(), "outcome": "pending" }),
        )
        .await;

    assert_eq!(response.error_code(), Some(&ToolErrorCode::InvalidParameters));
    Ok(())
}

#[tokio::test]
async fn test_assign_client_requires_a_client_account() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let other_coach = common::create_user(&database, UserRole::Coach).await?;
    let tools = common::bound_tools(&database, &coach);

    let missing = tools
        .call("assign_client", json!({ "client_id": uuid::Uuid::new_v4() }))
        .await;
    assert_eq!(missing.error_code().unwrap().to_string(), "CLIENT_NOT_FOUND");

    let not_a_client = tools
        .call("assign_client", json!({ "client_id": other_coach.id }))
        .await;
    assert_eq!(not_a_client.error_code(), Some(&ToolErrorCode::not_found("client")));

    let itself = tools
        .call("assign_client", json!({ "client_id": coach.id }))
        .await;
    assert_eq!(itself.error_code(), Some(&ToolErrorCode::ToolError));
    Ok(())
}

#[tokio::test]
async fn test_malformed_client_id_is_rejected_by_the_contract() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, client.id, RelationshipStatus::Active).await?;

    let response = common::bound_tools(&database, &coach)
        .call("get_client_profile", json!({ "client_id": "not-a-uuid" }))
        .await;
    assert_eq!(response.error_code(), Some(&ToolErrorCode::InvalidParameters));
    Ok(())
}

// ============================================================================
// Workouts
// ============================================================================

#[tokio::test]
async fn test_logged_workouts_reach_the_coach_newest_first() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, client.id, RelationshipStatus::Active).await?;
    let client_tools = common::bound_tools(&database, &client);

    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
    let older = client_tools
        .call(
            "log_workout",
            json!({
                "title": "  Long run  ",
                "workout_type": "run",
                "duration_minutes": 95,
                "completed_at": yesterday,
            }),
        )
        .await;
    let older = older.data().unwrap();
    assert_eq!(older["title"], "Long run");
    assert_eq!(older["user_id"], json!(client.id));
    assert!(older["notes"].is_null());

    let newer = client_tools
        .call(
            "log_workout",
            json!({ "title": "Mobility", "duration_minutes": 20, "notes": "hips" }),
        )
        .await;
    assert_eq!(newer.data().unwrap()["workout_type"], "other");

    let history = common::bound_tools(&database, &coach)
        .call("get_client_workouts", json!({ "client_id": client.id }))
        .await;
    let history = history.data().unwrap();
    assert_eq!(history["count"], 2);
    assert_eq!(history["workouts"][0]["title"], "Mobility");
    assert_eq!(history["workouts"][1]["title"], "Long run");

    let first_only = common::bound_tools(&database, &coach)
        .call("get_client_workouts", json!({ "client_id": client.id, "limit": 1 }))
        .await;
    assert_eq!(first_only.data().unwrap()["count"], 1);
    Ok(())
}

#[tokio::test]
async fn test_log_workout_rejects_future_and_out_of_range_input() -> Result<()> {
    let database = common::create_test_database().await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    let tools = common::bound_tools(&database, &client);

    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();
    let rejected = [
        json!({ "title": "Time travel", "duration_minutes": 30, "completed_at": tomorrow }),
        json!({ "title": "Marathon+", "duration_minutes": 601 }),
        json!({ "title": "Nap", "duration_minutes": 0 }),
        json!({ "title": "Dance", "duration_minutes": 30, "workout_type": "dance" }),
        json!({ "title": "No time", "duration_minutes": 30, "completed_at": "yesterday" }),
        json!({ "duration_minutes": 30 }),
    ];
    for args in rejected {
        let response = tools.call("log_workout", args.clone()).await;
        assert_eq!(
            response.error_code(),
            Some(&ToolErrorCode::InvalidParameters),
            "{args}"
        );
    }

    let stored = database.list_workouts(client.id, 10).await?;
    assert!(stored.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_workout_history_requires_active_relationship() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, client.id, RelationshipStatus::Inactive).await?;

    let response = common::bound_tools(&database, &coach)
        .call("get_client_workouts", json!({ "client_id": client.id }))
        .await;
    assert_eq!(response.error_code(), Some(&ToolErrorCode::Unauthorized));
    Ok(())
}

// ============================================================================
// Messaging
// ============================================================================

#[tokio::test]
async fn test_retried_send_with_same_key_is_stored_once() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, client.id, RelationshipStatus::Active).await?;
    let tools = common::bound_tools(&database, &coach);

    let args = json!({
        "client_id": client.id,
        "body": "Great job on the tempo run!",
        "idempotency_key": "tempo-2025-06-01",
    });
    let first = tools.call("send_client_message", args.clone()).await;
    let retry = tools.call("send_client_message", args).await;

    let first = first.data().unwrap();
    let retry = retry.data().unwrap();
    assert_eq!(first["duplicate"], false);
    assert_eq!(retry["duplicate"], true);
    assert_eq!(first["message"]["id"], retry["message"]["id"]);

    tools
        .call(
            "send_client_message",
            json!({ "client_id": client.id, "body": "Rest day tomorrow" }),
        )
        .await
        .into_result()
        .unwrap();

    let history = tools
        .call("get_client_messages", json!({ "client_id": client.id }))
        .await;
    let history = history.data().unwrap();
    assert_eq!(history["count"], 2);
    assert_eq!(history["messages"][0]["body"], "Rest day tomorrow");
    Ok(())
}

#[tokio::test]
async fn test_idempotency_key_is_scoped_to_the_client() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let first_client = common::create_user(&database, UserRole::Client).await?;
    let second_client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, first_client.id, RelationshipStatus::Active).await?;
    common::link(&database, coach.id, second_client.id, RelationshipStatus::Active).await?;
    let tools = common::bound_tools(&database, &coach);

    let private = tools
        .call(
            "send_client_message",
            json!({
                "client_id": first_client.id,
                "body": "Private note about your knee",
                "idempotency_key": "k1",
            }),
        )
        .await;
    let private = private.data().unwrap();
    assert_eq!(private["duplicate"], false);

    let ended = tools
        .call(
            "end_coaching_relationship",
            json!({ "counterpart_id": first_client.id }),
        )
        .await;
    assert_eq!(ended.data().unwrap()["status"], "terminated");

    let args = json!({
        "client_id": second_client.id,
        "body": "Hill repeats on Thursday",
        "idempotency_key": "k1",
    });
    let sent = tools.call("send_client_message", args.clone()).await;
    let sent = sent.data().unwrap();
    assert_eq!(sent["duplicate"], false);
    assert_eq!(sent["message"]["client_id"], json!(second_client.id));
    assert_eq!(sent["message"]["body"], "Hill repeats on Thursday");
    assert_ne!(sent["message"]["id"], private["message"]["id"]);

    let retry = tools.call("send_client_message", args).await;
    let retry = retry.data().unwrap();
    assert_eq!(retry["duplicate"], true);
    assert_eq!(retry["message"]["id"], sent["message"]["id"]);

    let history = tools
        .call("get_client_messages", json!({ "client_id": second_client.id }))
        .await;
    let history = history.data().unwrap();
    assert_eq!(history["count"], 1);
    assert_eq!(history["messages"][0]["body"], "Hill repeats on Thursday");
    Ok(())
}

#[tokio::test]
async fn test_messaging_requires_active_relationship() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, coach.id, client.id, RelationshipStatus::Pending).await?;
    let tools = common::bound_tools(&database, &coach);

    let send = tools
        .call(
            "send_client_message",
            json!({ "client_id": client.id, "body": "Welcome!" }),
        )
        .await;
    assert_eq!(send.error_code(), Some(&ToolErrorCode::Unauthorized));

    let read = tools
        .call("get_client_messages", json!({ "client_id": client.id }))
        .await;
    assert_eq!(read.error_code(), Some(&ToolErrorCode::Unauthorized));

    assert!(database.list_messages(coach.id, client.id, 10).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_client_cannot_send_coach_messages() -> Result<()> {
    let database = common::create_test_database().await?;
    let client = common::create_user(&database, UserRole::Client).await?;

    let response = common::bound_tools(&database, &client)
        .call(
            "send_client_message",
            json!({ "client_id": client.id, "body": "hello me" }),
        )
        .await;
    assert_eq!(response.error_code(), Some(&ToolErrorCode::PermissionDenied));
    Ok(())
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_admin_sees_relationships_across_coaches() -> Result<()> {
    let database = common::create_test_database().await?;
    let admin = common::create_user(&database, UserRole::Admin).await?;
    let first_coach = common::create_user(&database, UserRole::Coach).await?;
    let second_coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    let first =
        common::link(&database, first_coach.id, client.id, RelationshipStatus::Active).await?;
    let second =
        common::link(&database, second_coach.id, client.id, RelationshipStatus::Pending).await?;

    let tools = common::bound_tools(&database, &admin);

    let all = tools.call("admin_list_relationships", json!({})).await;
    let all = all.data().unwrap();
    assert_eq!(all["status"], "all");
    assert_eq!(
        ids(&all["relationships"], "id"),
        HashSet::from([first.id.to_string(), second.id.to_string()])
    );

    let pending = tools
        .call("admin_list_relationships", json!({ "status": "pending" }))
        .await;
    let pending = pending.data().unwrap();
    assert_eq!(pending["count"], 1);
    assert_eq!(pending["relationships"][0]["id"], json!(second.id));

    // Admins outrank coaches but still pass through the tenant check
    let profile = tools
        .call("get_client_profile", json!({ "client_id": client.id }))
        .await;
    assert_eq!(profile.error_code(), Some(&ToolErrorCode::Unauthorized));
    Ok(())
}
