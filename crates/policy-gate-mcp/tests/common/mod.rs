// crates/policy-gate-mcp/tests/common/mod.rs
// =============================================================================
// Module: Tool Router Test Helpers
// Description: Shared router builders and audit capture for integration tests.
// Purpose: Reduce duplication across policy-gate-mcp test suites.
// =============================================================================

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test helpers are selectively used across suites."
)]

use std::sync::Arc;
use std::sync::Mutex;

use policy_gate_config::UserConfig;
use policy_gate_core::LocalRuleEvaluator;
use policy_gate_core::PolicyEvaluator;
use policy_gate_mcp::AuthAuditEvent;
use policy_gate_mcp::PolicyAuditEvent;
use policy_gate_mcp::PolicyAuditSink;
use policy_gate_mcp::ToolRouter;
use policy_gate_mcp::UserDirectory;
use policy_gate_mcp::tools::ToolRouterConfig;

/// Audit sink capturing events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Captured tool-call events.
    pub events: Mutex<Vec<PolicyAuditEvent>>,
    /// Captured authentication events.
    pub auth_events: Mutex<Vec<AuthAuditEvent>>,
}

impl RecordingAuditSink {
    /// Returns a snapshot of captured tool-call events.
    pub fn events(&self) -> Vec<PolicyAuditEvent> {
        self.events.lock().expect("audit events lock").clone()
    }

    /// Returns a snapshot of captured authentication events.
    pub fn auth_events(&self) -> Vec<AuthAuditEvent> {
        self.auth_events.lock().expect("auth events lock").clone()
    }
}

impl PolicyAuditSink for RecordingAuditSink {
    fn record(&self, event: &PolicyAuditEvent) {
        self.events.lock().expect("audit events lock").push(event.clone());
    }

    fn record_auth(&self, event: &AuthAuditEvent) {
        self.auth_events.lock().expect("auth events lock").push(event.clone());
    }
}

/// Returns the sample user directory entries.
pub fn sample_users() -> Vec<UserConfig> {
    vec![
        UserConfig {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            role: "admin".to_string(),
        },
        UserConfig {
            username: "user".to_string(),
            password: "user123".to_string(),
            role: "user".to_string(),
        },
    ]
}

/// Builds a router around the given evaluator with a recording audit sink.
pub fn router_with(
    evaluator: Arc<dyn PolicyEvaluator>,
    max_input_bytes: usize,
) -> (ToolRouter, Arc<RecordingAuditSink>) {
    let audit = Arc::new(RecordingAuditSink::default());
    let router = ToolRouter::new(ToolRouterConfig {
        evaluator,
        users: Arc::new(UserDirectory::from_config(&sample_users())),
        audit: Arc::clone(&audit) as Arc<dyn PolicyAuditSink>,
        max_input_bytes,
    });
    (router, audit)
}

/// Builds a router backed by the local rule table.
pub fn local_router() -> (ToolRouter, Arc<RecordingAuditSink>) {
    router_with(Arc::new(LocalRuleEvaluator), 1024 * 1024)
}
