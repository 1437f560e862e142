// crates/policy-gate-mcp/tests/tool_router.rs
// ============================================================================
// Module: Tool Router Tests
// Description: Tests for tool dispatch, argument validation, and auditing.
// Purpose: Ensure tool calls are validated before evaluation and audited.
// Dependencies: policy-gate-mcp, policy-gate-core, tokio
// ============================================================================

//! Tool router integration tests against the local rule table.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use policy_gate_config::PolicyGateConfig;
use policy_gate_core::LocalRuleEvaluator;
use policy_gate_core::ToolName;
use policy_gate_mcp::ToolError;
use policy_gate_mcp::ToolRouter;
use policy_gate_mcp::audit::ToolOutcome;
use serde_json::json;

use crate::common::local_router;
use crate::common::router_with;

// ============================================================================
// SECTION: evaluate_opa_policy
// ============================================================================

#[tokio::test]
async fn evaluate_returns_decision_with_echoed_input() {
    let (router, _audit) = local_router();
    let input = json!({"user": {"role": "user"}, "action": "read"});
    let result = router
        .handle_tool_call(
            "evaluate_opa_policy",
            json!({"policy_name": "simple", "input_data": input.clone()}),
        )
        .await
        .unwrap();
    assert_eq!(result, json!({"allowed": true, "policy": "simple", "input": input}));
}

/// Key order, big integers, and decimal spelling survive the round trip.
#[tokio::test]
async fn evaluate_echoes_input_text_exactly() {
    let (router, _audit) = local_router();
    let raw = r#"{"zeta":1.10,"user":{"role":"user","clearance_level":123456789012345678901234567890},"document":{"classification_level":1e400},"action":"read"}"#;
    let input: serde_json::Value = serde_json::from_str(raw).unwrap();
    let result = router
        .handle_tool_call(
            "evaluate_opa_policy",
            json!({"policy_name": "attribute_based", "input_data": input}),
        )
        .await
        .unwrap();
    assert_eq!(result["allowed"], json!(false));
    assert_eq!(serde_json::to_string(&result["input"]).unwrap(), raw);
}

#[tokio::test]
async fn evaluate_unknown_policy_denies() {
    let (router, audit) = local_router();
    let result = router
        .handle_tool_call(
            "evaluate_opa_policy",
            json!({"policy_name": "custom", "input_data": {"user": {"role": "admin"}}}),
        )
        .await
        .unwrap();
    assert_eq!(result["allowed"], json!(false));
    assert_eq!(result["policy"], json!("custom"));

    let events = audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].policy.as_deref(), Some("custom"));
    assert_eq!(events[0].allowed, Some(false));
    assert_eq!(events[0].outcome, ToolOutcome::Ok);
}

#[tokio::test]
async fn evaluate_rejects_non_object_input() {
    let (router, audit) = local_router();
    for input in [json!([1, 2]), json!("user"), json!(null), json!(42)] {
        let error = router
            .handle_tool_call(
                "evaluate_opa_policy",
                json!({"policy_name": "simple", "input_data": input}),
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ToolError::InvalidArgument(_)), "unexpected error: {error}");
    }
    let events = audit.events();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|event| event.error_kind == Some("invalid_argument")));
    assert!(events.iter().all(|event| event.allowed.is_none()));
}

#[tokio::test]
async fn evaluate_rejects_missing_arguments() {
    let (router, _audit) = local_router();
    let error = router
        .handle_tool_call("evaluate_opa_policy", json!({"policy_name": "simple"}))
        .await
        .unwrap_err();
    assert!(matches!(error, ToolError::InvalidArgument(_)));

    let error = router
        .handle_tool_call("evaluate_opa_policy", json!({"input_data": {}}))
        .await
        .unwrap_err();
    assert!(matches!(error, ToolError::InvalidArgument(_)));
}

#[tokio::test]
async fn evaluate_rejects_unknown_arguments() {
    let (router, _audit) = local_router();
    let error = router
        .handle_tool_call(
            "evaluate_opa_policy",
            json!({"policy_name": "simple", "input_data": {}, "trace": true}),
        )
        .await
        .unwrap_err();
    assert!(matches!(error, ToolError::InvalidArgument(_)));
}

#[tokio::test]
async fn evaluate_rejects_oversized_payload() {
    let (router, audit) = router_with(Arc::new(LocalRuleEvaluator), 64);
    let padding = "x".repeat(128);
    let error = router
        .handle_tool_call(
            "evaluate_opa_policy",
            json!({"policy_name": "simple", "input_data": {"padding": padding}}),
        )
        .await
        .unwrap_err();
    assert!(error.to_string().contains("max_input_bytes"));
    assert_eq!(audit.events()[0].tool, Some(ToolName::EvaluateOpaPolicy));
}

#[tokio::test]
async fn evaluate_audit_event_omits_payload() {
    let (router, audit) = local_router();
    router
        .handle_tool_call(
            "evaluate_opa_policy",
            json!({"policy_name": "advanced", "input_data": {"user": {"role": "admin", "ssn": "123-45-6789"}}}),
        )
        .await
        .unwrap();
    let events = audit.events();
    let serialized = serde_json::to_string(&events[0]).unwrap();
    assert!(!serialized.contains("123-45-6789"));
    assert_eq!(events[0].redaction, "omitted");
    assert_eq!(events[0].evaluator, Some("local"));
    assert_eq!(events[0].allowed, Some(true));
}

// ============================================================================
// SECTION: list_policies
// ============================================================================

#[tokio::test]
async fn list_policies_returns_catalog() {
    let (router, _audit) = local_router();
    let expected = json!({"policies": ["simple", "advanced", "attribute_based"]});
    assert_eq!(router.handle_tool_call("list_policies", json!({})).await.unwrap(), expected);
    assert_eq!(router.handle_tool_call("list_policies", json!(null)).await.unwrap(), expected);
}

#[tokio::test]
async fn list_policies_rejects_arguments() {
    let (router, _audit) = local_router();
    let error =
        router.handle_tool_call("list_policies", json!({"filter": "simple"})).await.unwrap_err();
    assert!(matches!(error, ToolError::InvalidArgument(_)));
}

// ============================================================================
// SECTION: authenticate_user
// ============================================================================

#[tokio::test]
async fn authenticate_returns_role_on_success() {
    let (router, audit) = local_router();
    let result = router
        .handle_tool_call("authenticate_user", json!({"username": "admin", "password": "admin123"}))
        .await
        .unwrap();
    assert_eq!(result, json!({"authenticated": true, "username": "admin", "role": "admin"}));

    let auth_events = audit.auth_events();
    assert_eq!(auth_events.len(), 1);
    assert!(auth_events[0].authenticated);
    assert_eq!(auth_events[0].role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn authenticate_reports_invalid_credentials() {
    let (router, audit) = local_router();
    let result = router
        .handle_tool_call("authenticate_user", json!({"username": "user", "password": "nope"}))
        .await
        .unwrap();
    assert_eq!(result, json!({"authenticated": false, "message": "Invalid credentials"}));
    assert!(!audit.auth_events()[0].authenticated);

    let serialized = serde_json::to_string(&audit.auth_events()[0]).unwrap();
    assert!(!serialized.contains("nope"));
}

#[tokio::test]
async fn authenticate_requires_both_fields() {
    let (router, _audit) = local_router();
    let error = router
        .handle_tool_call("authenticate_user", json!({"username": "user"}))
        .await
        .unwrap_err();
    assert!(matches!(error, ToolError::InvalidArgument(_)));
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

#[tokio::test]
async fn unknown_tool_is_rejected_and_audited() {
    let (router, audit) = local_router();
    let error = router.handle_tool_call("read_csv", json!({})).await.unwrap_err();
    assert!(matches!(error, ToolError::UnknownTool));
    let events = audit.events();
    assert_eq!(events[0].tool, None);
    assert_eq!(events[0].error_kind, Some("unknown_tool"));
    assert_eq!(events[0].outcome, ToolOutcome::Error);
}

#[test]
fn list_tools_covers_every_tool() {
    let tools = ToolRouter::list_tools();
    let names: Vec<_> = tools.iter().map(|tool| tool.name.as_str()).collect();
    assert_eq!(names, ["evaluate_opa_policy", "list_policies", "authenticate_user"]);
    assert!(tools.iter().all(|tool| !tool.description.is_empty()));
}

#[test]
fn router_from_default_config_uses_local_evaluator() {
    let mut config = PolicyGateConfig::default();
    config.audit.sink = policy_gate_config::AuditSinkKind::None;
    let router = ToolRouter::from_config(&config).unwrap();
    assert_eq!(router.evaluator_backend(), "local");
}
