// crates/policy-gate-mcp/tests/audit_sinks.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Validate JSON-line audit sinks and config-driven selection.
// Purpose: Ensure audit output is append-only, line-delimited, and redacted.
// Dependencies: policy-gate-mcp, policy-gate-config, tempfile
// ============================================================================

//! Audit sink tests.

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

use std::fs;

use policy_gate_config::AuditConfig;
use policy_gate_config::AuditSinkKind;
use policy_gate_core::ToolName;
use policy_gate_mcp::AuthAuditEvent;
use policy_gate_mcp::PolicyAuditEvent;
use policy_gate_mcp::PolicyAuditSink;
use policy_gate_mcp::audit::FileAuditSink;
use policy_gate_mcp::audit::PolicyAuditEventParams;
use policy_gate_mcp::audit::audit_sink_from_config;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

fn sample_event() -> PolicyAuditEvent {
    PolicyAuditEvent::new(PolicyAuditEventParams {
        tool: Some(ToolName::EvaluateOpaPolicy),
        policy: Some("simple".to_string()),
        allowed: Some(true),
        error_kind: None,
        evaluator: Some("local"),
    })
}

#[test]
fn event_serializes_expected_fields() {
    let value = serde_json::to_value(sample_event()).unwrap();
    assert_eq!(value["event"], json!("tool_call"));
    assert_eq!(value["tool"], json!("evaluate_opa_policy"));
    assert_eq!(value["policy"], json!("simple"));
    assert_eq!(value["allowed"], json!(true));
    assert_eq!(value["outcome"], json!("ok"));
    assert_eq!(value["error_kind"], Value::Null);
    assert_eq!(value["redaction"], json!("omitted"));
    assert!(value["timestamp_ms"].as_u64().unwrap() > 0);
}

#[test]
fn error_kind_marks_outcome_as_error() {
    let event = PolicyAuditEvent::new(PolicyAuditEventParams {
        error_kind: Some("transport"),
        ..PolicyAuditEventParams::default()
    });
    assert_eq!(serde_json::to_value(event).unwrap()["outcome"], json!("error"));
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.jsonl");
    fs::write(&path, "{\"event\":\"previous\"}\n").unwrap();

    let sink = FileAuditSink::new(&path).unwrap();
    sink.record(&sample_event());
    sink.record_auth(&AuthAuditEvent::new(false, None));

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "{\"event\":\"previous\"}");
    let auth: Value = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(auth["event"], json!("auth_attempt"));
    assert_eq!(auth["authenticated"], json!(false));
}

#[test]
fn config_selects_file_sink() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.jsonl");
    let sink = audit_sink_from_config(&AuditConfig {
        sink: AuditSinkKind::File,
        path: Some(path.to_string_lossy().into_owned()),
    })
    .unwrap();
    sink.record(&sample_event());
    assert!(fs::read_to_string(&path).unwrap().contains("\"tool_call\""));
}

#[test]
fn file_sink_without_path_is_rejected() {
    let result = audit_sink_from_config(&AuditConfig {
        sink: AuditSinkKind::File,
        path: None,
    });
    assert!(result.is_err());
}
