// ABOUTME: Integration tests for the tool call pipeline: contract, permission gate and guarded business logic
// ABOUTME: Covers role-gate exhaustiveness, collector independence, panic capture, cancellation and envelope shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use pierre_coaching::errors::{AppError, AppResult};
use pierre_coaching::models::RelationshipStatus;
use pierre_coaching::permissions::UserRole;
use pierre_coaching::tools::{
    CallableTool, ParameterContract, ParameterKind, ParameterSpec, ToolCapabilities, ToolCollector,
    ToolContext, ToolDefinition, ToolErrorCode, ToolFactory, ToolHandler, ToolRegistry,
    ToolResponse,
};

mod common;

// ============================================================================
// Test tools
// ============================================================================

#[derive(Clone, Copy)]
enum Behavior {
    Echo,
    Fail,
    Panic,
    Sleep,
}

/// Test tool counting how often its business logic runs
struct CountingTool {
    minimum_role: Option<UserRole>,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

#[derive(Debug, Deserialize)]
struct CountingParams {
    note: String,
    repeat: i64,
}

#[async_trait]
impl ToolHandler for CountingTool {
    type Params = CountingParams;
    type Output = Value;

    fn name(&self) -> &'static str {
        "counting_tool"
    }

    fn description(&self) -> &'static str {
        "Counts invocations"
    }

    fn parameters(&self) -> ParameterContract {
        ParameterContract::new()
            .param(ParameterSpec::required(
                "note",
                "Any text",
                ParameterKind::string_max(32),
            ))
            .param(
                ParameterSpec::optional("repeat", "Repeat count", ParameterKind::integer_range(1, 5))
                    .with_default(1),
            )
    }

    fn minimum_role(&self) -> Option<UserRole> {
        self.minimum_role
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
    }

    async fn execute(&self, params: CountingParams, context: &ToolContext) -> AppResult<ToolResponse<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Echo => Ok(ToolResponse::success(json!({
                "note": params.note,
                "repeat": params.repeat,
                "caller_id": context.caller_id(),
                "role": context.caller_role(),
            }))),
            Behavior::Fail => Err(AppError::database("connection reset by peer")),
            Behavior::Panic => panic!("index out of bounds in scoring"),
            Behavior::Sleep => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(ToolResponse::success(json!({})))
            }
        }
    }
}

fn counting_tool(
    minimum_role: Option<UserRole>,
    behavior: Behavior,
) -> (Arc<dyn ToolFactory>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let factory = ToolDefinition::shared(CountingTool {
        minimum_role,
        behavior,
        calls: Arc::clone(&calls),
    });
    (factory, calls)
}

async fn context_with_role(role: UserRole) -> Result<Arc<ToolContext>> {
    let database = common::create_test_database().await?;
    let user = common::create_user(&database, role).await?;
    Ok(common::context_for(&database, &user))
}

fn assert_code(response: &ToolResponse<Value>, expected: &ToolErrorCode) {
    assert_eq!(
        response.error_code(),
        Some(expected),
        "unexpected response: {response:?}"
    );
}

// ============================================================================
// Permission gate
// ============================================================================

#[tokio::test]
async fn test_gate_reaches_business_logic_iff_rank_suffices() -> Result<()> {
    for required in UserRole::ALL {
        for caller in UserRole::ALL {
            let (factory, calls) = counting_tool(Some(required), Behavior::Echo);
            let tool = factory.bind(context_with_role(caller).await?);

            let response = tool.call(json!({ "note": "hi" })).await;

            if caller.rank() >= required.rank() {
                assert!(response.is_success(), "{caller} calling {required} tool: {response:?}");
                assert_eq!(calls.load(Ordering::SeqCst), 1);
            } else {
                assert_code(&response, &ToolErrorCode::PermissionDenied);
                assert_eq!(calls.load(Ordering::SeqCst), 0, "{caller} reached {required} logic");
            }
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_tool_without_minimum_role_admits_everyone() -> Result<()> {
    for caller in UserRole::ALL {
        let (factory, calls) = counting_tool(None, Behavior::Echo);
        let response = factory
            .bind(context_with_role(caller).await?)
            .call(json!({ "note": "open" }))
            .await;
        assert!(response.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_scenario_a_base_role_denied_elevated_tool() -> Result<()> {
    let (factory, calls) = counting_tool(Some(UserRole::Coach), Behavior::Echo);
    let response = factory
        .bind(context_with_role(UserRole::Client).await?)
        .call(json!({ "note": "let me in" }))
        .await;

    assert_code(&response, &ToolErrorCode::PermissionDenied);
    let message = &response.failure().unwrap().message;
    assert!(message.contains("'coach'"), "{message}");
    assert!(message.contains("'client'"), "{message}");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}

// ============================================================================
// Parameter contract
// ============================================================================

#[tokio::test]
async fn test_scenario_e_missing_required_field_never_runs_logic() -> Result<()> {
    let (factory, calls) = counting_tool(None, Behavior::Echo);
    let tool = factory.bind(context_with_role(UserRole::Coach).await?);

    let response = tool.call(json!({ "repeat": 2 })).await;

    assert_code(&response, &ToolErrorCode::InvalidParameters);
    assert!(response.failure().unwrap().message.contains("'note'"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_contract_errors_are_reported_before_the_gate() -> Result<()> {
    let (factory, calls) = counting_tool(Some(UserRole::Admin), Behavior::Echo);
    let tool = factory.bind(context_with_role(UserRole::Client).await?);

    let response = tool.call(json!({ "note": "x", "repeat": 99 })).await;

    assert_code(&response, &ToolErrorCode::InvalidParameters);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_defaults_are_applied_before_business_logic() -> Result<()> {
    let (factory, _calls) = counting_tool(None, Behavior::Echo);
    let tool = factory.bind(context_with_role(UserRole::Client).await?);

    let response = tool.call(json!({ "note": "defaults", "ignored": true })).await;

    let data = response.data().unwrap();
    assert_eq!(data["repeat"], 1);
    assert_eq!(data["note"], "defaults");
    Ok(())
}

// ============================================================================
// Unclassified failures
// ============================================================================

#[tokio::test]
async fn test_app_error_becomes_tool_error_with_original_message() -> Result<()> {
    let (factory, calls) = counting_tool(None, Behavior::Fail);
    let response = factory
        .bind(context_with_role(UserRole::Coach).await?)
        .call(json!({ "note": "boom" }))
        .await;

    assert_code(&response, &ToolErrorCode::ToolError);
    assert_eq!(response.failure().unwrap().message, "connection reset by peer");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_panic_in_business_logic_becomes_tool_error() -> Result<()> {
    let (factory, _calls) = counting_tool(None, Behavior::Panic);
    let (healthy, healthy_calls) = counting_tool(None, Behavior::Echo);
    let context = context_with_role(UserRole::Coach).await?;

    let response = factory.bind(Arc::clone(&context)).call(json!({ "note": "p" })).await;
    assert_code(&response, &ToolErrorCode::ToolError);
    assert!(response
        .failure()
        .unwrap()
        .message
        .contains("index out of bounds in scoring"));

    let after = healthy.bind(context).call(json!({ "note": "still fine" })).await;
    assert!(after.is_success());
    assert_eq!(healthy_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_timeout_cancels_call_without_an_envelope() -> Result<()> {
    let (factory, calls) = counting_tool(None, Behavior::Sleep);
    let tool = factory.bind(context_with_role(UserRole::Coach).await?);

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        tool.call(json!({ "note": "slow" })),
    )
    .await;

    assert!(outcome.is_err(), "expected the deadline to elapse");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

// ============================================================================
// Collector
// ============================================================================

#[tokio::test]
async fn test_collect_keys_equal_factory_keys() -> Result<()> {
    let context = context_with_role(UserRole::Coach).await?;
    let registry = ToolRegistry::with_builtin_tools();

    let tools = ToolCollector::new().collect(&context, &registry);

    assert_eq!(tools.names(), registry.tool_names());

    let (factory, _calls) = counting_tool(None, Behavior::Echo);
    let mut factories: HashMap<String, Arc<dyn ToolFactory>> = HashMap::new();
    factories.insert("alias_one".to_owned(), Arc::clone(&factory));
    factories.insert("alias_two".to_owned(), factory);
    let aliased = ToolCollector::new().collect_factories(&context, &factories);
    assert_eq!(aliased.names(), vec!["alias_one", "alias_two"]);

    let empty = ToolCollector::new().collect_factories(&context, &HashMap::new());
    assert!(empty.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_collect_with_different_roles_yields_independent_tools() -> Result<()> {
    let database = common::create_test_database().await?;
    let coach = common::create_user(&database, UserRole::Coach).await?;
    let admin = common::create_user(&database, UserRole::Admin).await?;

    let coach_tools = common::bound_tools(&database, &coach);
    let admin_tools = common::bound_tools(&database, &admin);

    let as_coach = coach_tools.call("admin_list_relationships", json!({})).await;
    let as_admin = admin_tools.call("admin_list_relationships", json!({})).await;

    assert_code(&as_coach, &ToolErrorCode::PermissionDenied);
    assert!(as_admin.is_success());
    Ok(())
}

#[tokio::test]
async fn test_collect_with_different_callers_yields_independent_tools() -> Result<()> {
    let database = common::create_test_database().await?;
    let linked_coach = common::create_user(&database, UserRole::Coach).await?;
    let other_coach = common::create_user(&database, UserRole::Coach).await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    common::link(&database, linked_coach.id, client.id, RelationshipStatus::Active).await?;

    let args = json!({ "client_id": client.id });
    let linked = common::bound_tools(&database, &linked_coach)
        .call("get_client_profile", args.clone())
        .await;
    let other = common::bound_tools(&database, &other_coach)
        .call("get_client_profile", args)
        .await;

    assert!(linked.is_success());
    assert_code(&other, &ToolErrorCode::Unauthorized);
    Ok(())
}

#[tokio::test]
async fn test_unknown_tool_name_returns_not_found_envelope() -> Result<()> {
    let context = context_with_role(UserRole::Admin).await?;
    let tools = ToolCollector::new().collect(&context, &ToolRegistry::with_builtin_tools());

    let response = tools.call("delete_everything", json!({})).await;

    assert_code(&response, &ToolErrorCode::not_found("tool"));
    assert_eq!(
        response.error_code().unwrap().to_string(),
        "TOOL_NOT_FOUND"
    );
    Ok(())
}

#[tokio::test]
async fn test_audited_tools_forward_envelopes_unchanged() -> Result<()> {
    let database = common::create_test_database().await?;
    let client = common::create_user(&database, UserRole::Client).await?;
    let context = common::context_for(&database, &client);
    let registry = ToolRegistry::with_builtin_tools();

    let plain = ToolCollector::new().collect(&context, &registry);
    let audited = ToolCollector::new()
        .with_audit(true)
        .collect(&context, &registry);

    assert_eq!(plain.names(), audited.names());
    assert_eq!(plain.catalog(), audited.catalog());

    let plain_response = plain.call("list_clients", json!({})).await;
    let audited_response = audited.call("list_clients", json!({})).await;
    assert_eq!(plain_response, audited_response);
    assert_code(&audited_response, &ToolErrorCode::PermissionDenied);
    Ok(())
}

// ============================================================================
// Envelope shape
// ============================================================================

#[tokio::test]
async fn test_every_outcome_has_exactly_one_of_data_or_error() -> Result<()> {
    let context = context_with_role(UserRole::Client).await?;
    let cases = [
        (counting_tool(None, Behavior::Echo).0, json!({ "note": "ok" })),
        (counting_tool(None, Behavior::Echo).0, json!({})),
        (counting_tool(Some(UserRole::Admin), Behavior::Echo).0, json!({ "note": "x" })),
        (counting_tool(None, Behavior::Fail).0, json!({ "note": "x" })),
        (counting_tool(None, Behavior::Panic).0, json!({ "note": "x" })),
    ];

    for (factory, args) in cases {
        let response = factory.bind(Arc::clone(&context)).call(args).await;
        let rendered = serde_json::to_value(&response)?;
        let object = rendered.as_object().unwrap();

        let success = object["success"].as_bool().unwrap();
        assert_eq!(success, object.contains_key("data"), "{rendered}");
        assert_eq!(!success, object.contains_key("error"), "{rendered}");
        assert_eq!(object.len(), 2, "{rendered}");
    }
    Ok(())
}
