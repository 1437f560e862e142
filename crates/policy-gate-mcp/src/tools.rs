// crates/policy-gate-mcp/src/tools.rs
// ============================================================================
// Module: Tool Router
// Description: Tool-call dispatch for policy evaluation and authentication.
// Purpose: Validate tool arguments and route them to the configured backends.
// Dependencies: policy-gate-core, policy-gate-config, serde, tokio
// ============================================================================

//! ## Overview
//! [`ToolRouter`] decodes tool payloads, rejects malformed arguments with
//! [`ToolError::InvalidArgument`] before any evaluator is reached, and returns
//! JSON results. Evaluation runs on the blocking pool because the remote agent
//! adapter performs blocking I/O. Every call produces one audit event.
//!
//! Security posture: tool inputs are untrusted; payload size is bounded and
//! arguments are decoded strictly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use policy_gate_config::PolicyGateConfig;
use policy_gate_core::Decision;
use policy_gate_core::EvaluationError;
use policy_gate_core::InputDocument;
use policy_gate_core::PolicyEvaluator;
use policy_gate_core::PolicyName;
use policy_gate_core::ToolName;
use policy_gate_core::policy_catalog;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::audit::AuthAuditEvent;
use crate::audit::PolicyAuditEvent;
use crate::audit::PolicyAuditEventParams;
use crate::audit::PolicyAuditSink;
use crate::audit::audit_sink_from_config;
use crate::auth::UserDirectory;
use crate::evaluator::build_evaluator;

// ============================================================================
// SECTION: Requests and Responses
// ============================================================================

/// Arguments for `evaluate_opa_policy`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluatePolicyRequest {
    /// Policy to evaluate.
    pub policy_name: String,
    /// Input document; must be a JSON object.
    pub input_data: Value,
}

/// Arguments for `list_policies`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListPoliciesRequest {}

/// Response for `list_policies`.
#[derive(Debug, Clone, Serialize)]
pub struct ListPoliciesResponse {
    /// Built-in policy names in canonical order.
    pub policies: Vec<String>,
}

/// Arguments for `authenticate_user`.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthenticateUserRequest {
    /// Login name.
    pub username: String,
    /// Shared secret.
    pub password: String,
}

/// Tool definition exposed to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: ToolName,
    /// One-line description.
    pub description: &'static str,
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Construction inputs for [`ToolRouter`].
#[derive(Clone)]
pub struct ToolRouterConfig {
    /// Evaluator backing `evaluate_opa_policy`.
    pub evaluator: Arc<dyn PolicyEvaluator>,
    /// Directory backing `authenticate_user`.
    pub users: Arc<UserDirectory>,
    /// Audit sink for tool calls.
    pub audit: Arc<dyn PolicyAuditSink>,
    /// Maximum serialized payload size in bytes.
    pub max_input_bytes: usize,
}

/// Tool router dispatching tool calls to policy backends.
#[derive(Clone)]
pub struct ToolRouter {
    /// Configured policy evaluator.
    evaluator: Arc<dyn PolicyEvaluator>,
    /// Read-only user directory.
    users: Arc<UserDirectory>,
    /// Audit sink.
    audit: Arc<dyn PolicyAuditSink>,
    /// Maximum serialized payload size in bytes.
    max_input_bytes: usize,
}

impl ToolRouter {
    /// Creates a router from explicit components.
    #[must_use]
    pub fn new(config: ToolRouterConfig) -> Self {
        Self {
            evaluator: config.evaluator,
            users: config.users,
            audit: config.audit,
            max_input_bytes: config.max_input_bytes,
        }
    }

    /// Builds a router from validated configuration.
    ///
    /// Call this outside of an async context when the remote evaluator is
    /// configured; it constructs a blocking HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the evaluator or audit sink cannot be built.
    pub fn from_config(config: &PolicyGateConfig) -> Result<Self, ToolError> {
        let evaluator = build_evaluator(&config.evaluator)?;
        let audit = audit_sink_from_config(&config.audit)
            .map_err(|err| ToolError::Internal(format!("audit sink unavailable: {err}")))?;
        Ok(Self::new(ToolRouterConfig {
            evaluator,
            users: Arc::new(UserDirectory::from_config(&config.users)),
            audit,
            max_input_bytes: config.limits.max_input_bytes,
        }))
    }

    /// Returns the evaluator backend label.
    #[must_use]
    pub fn evaluator_backend(&self) -> &'static str {
        self.evaluator.backend()
    }

    /// Returns the tool definitions in canonical order.
    #[must_use]
    pub fn list_tools() -> Vec<ToolDefinition> {
        ToolName::all()
            .iter()
            .map(|tool| ToolDefinition {
                name: *tool,
                description: tool.description(),
            })
            .collect()
    }

    /// Routes a tool call by name with JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when routing fails.
    pub async fn handle_tool_call(&self, name: &str, payload: Value) -> Result<Value, ToolError> {
        let Some(tool) = ToolName::parse(name) else {
            let error = ToolError::UnknownTool;
            self.record_outcome(None, Some(&error));
            return Err(error);
        };
        if let Err(error) = self.check_payload_size(&payload) {
            self.record_outcome(Some(tool), Some(&error));
            return Err(error);
        }
        match tool {
            ToolName::EvaluateOpaPolicy => self.handle_evaluate(payload).await,
            ToolName::ListPolicies => {
                let result = Self::handle_list_policies(payload);
                self.record_outcome(Some(tool), result.as_ref().err());
                result
            }
            ToolName::AuthenticateUser => {
                let result = self.handle_authenticate(payload);
                self.record_outcome(Some(tool), result.as_ref().err());
                result
            }
        }
    }

    /// Handles `evaluate_opa_policy` and records its audit event.
    async fn handle_evaluate(&self, payload: Value) -> Result<Value, ToolError> {
        let mut params = PolicyAuditEventParams {
            tool: Some(ToolName::EvaluateOpaPolicy),
            evaluator: Some(self.evaluator.backend()),
            ..PolicyAuditEventParams::default()
        };
        let result = self.evaluate_payload(payload, &mut params).await;
        match &result {
            Ok(decision) => params.allowed = Some(decision.allowed()),
            Err(error) => params.error_kind = Some(error.kind()),
        }
        self.audit.record(&PolicyAuditEvent::new(params));
        serde_json::to_value(result?).map_err(|_| ToolError::Serialization)
    }

    /// Decodes evaluation arguments and runs the evaluator.
    async fn evaluate_payload(
        &self,
        payload: Value,
        params: &mut PolicyAuditEventParams,
    ) -> Result<Decision, ToolError> {
        let request = decode::<EvaluatePolicyRequest>(payload)?;
        params.policy = Some(request.policy_name.clone());
        let Value::Object(input) = request.input_data else {
            return Err(ToolError::InvalidArgument(
                "input_data must be a JSON object".to_string(),
            ));
        };
        self.run_evaluator(PolicyName::parse(&request.policy_name), input).await
    }

    /// Runs the evaluator on the blocking pool.
    async fn run_evaluator(
        &self,
        policy: PolicyName,
        input: InputDocument,
    ) -> Result<Decision, ToolError> {
        let evaluator = Arc::clone(&self.evaluator);
        let decision = tokio::task::spawn_blocking(move || evaluator.evaluate(&policy, &input))
            .await
            .map_err(|err| ToolError::Internal(format!("policy evaluation join failed: {err}")))??;
        Ok(decision)
    }

    /// Handles `list_policies`.
    fn handle_list_policies(payload: Value) -> Result<Value, ToolError> {
        if !payload.is_null() {
            decode::<ListPoliciesRequest>(payload)?;
        }
        let response = ListPoliciesResponse {
            policies: policy_catalog().iter().map(|policy| policy.as_str().to_string()).collect(),
        };
        serde_json::to_value(response).map_err(|_| ToolError::Serialization)
    }

    /// Handles `authenticate_user`.
    fn handle_authenticate(&self, payload: Value) -> Result<Value, ToolError> {
        let request = decode::<AuthenticateUserRequest>(payload)?;
        let Some(user) = self.users.authenticate(&request.username, &request.password) else {
            self.audit.record_auth(&AuthAuditEvent::new(false, None));
            return Ok(json!({
                "authenticated": false,
                "message": "Invalid credentials",
            }));
        };
        self.audit.record_auth(&AuthAuditEvent::new(true, Some(user.role.clone())));
        Ok(json!({
            "authenticated": true,
            "username": user.username,
            "role": user.role,
        }))
    }

    /// Rejects payloads whose serialized size exceeds the configured limit.
    fn check_payload_size(&self, payload: &Value) -> Result<(), ToolError> {
        let size = serde_json::to_vec(payload).map_err(|_| ToolError::Serialization)?.len();
        if size > self.max_input_bytes {
            return Err(ToolError::InvalidArgument(format!(
                "payload exceeds max_input_bytes ({size} > {})",
                self.max_input_bytes
            )));
        }
        Ok(())
    }

    /// Records a tool-call event without evaluation details.
    fn record_outcome(&self, tool: Option<ToolName>, error: Option<&ToolError>) {
        self.audit.record(&PolicyAuditEvent::new(PolicyAuditEventParams {
            tool,
            error_kind: error.map(ToolError::kind),
            ..PolicyAuditEventParams::default()
        }));
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool routing errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name not recognized.
    #[error("unknown tool")]
    UnknownTool,
    /// Tool arguments missing, mistyped, or oversized.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Evaluator backend failure.
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
    /// Tool result serialization failed.
    #[error("serialization failure")]
    Serialization,
    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Returns a stable label for logs and audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Evaluation(error) => error.kind(),
            Self::Serialization => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a JSON payload into a typed request.
fn decode<T: for<'de> Deserialize<'de>>(payload: Value) -> Result<T, ToolError> {
    serde_json::from_value(payload).map_err(|err| ToolError::InvalidArgument(err.to_string()))
}
