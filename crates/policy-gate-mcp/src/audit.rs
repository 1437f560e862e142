// crates/policy-gate-mcp/src/audit.rs
// ============================================================================
// Module: Policy Audit Logging
// Description: Structured audit events for tool-call handling.
// Purpose: Emit redacted audit logs without hard dependencies.
// Dependencies: policy-gate-config, policy-gate-core, serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for tool-call logging.
//! Events are JSON lines. Input documents and credentials are never logged;
//! the `redaction` field records that payloads were omitted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use policy_gate_config::AuditConfig;
use policy_gate_config::AuditSinkKind;
use policy_gate_core::ToolName;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Redaction label for events that never carry payloads.
const REDACTION_OMITTED: &str = "omitted";

/// Outcome of a handled tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The tool returned a result.
    Ok,
    /// The tool returned an error.
    Error,
}

/// Tool-call audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Tool name when recognized.
    pub tool: Option<ToolName>,
    /// Policy name for evaluation calls.
    pub policy: Option<String>,
    /// Decision bit for successful evaluation calls.
    pub allowed: Option<bool>,
    /// Request outcome.
    pub outcome: ToolOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Evaluator backend label for evaluation calls.
    pub evaluator: Option<&'static str>,
    /// Redaction classification for payload logging.
    pub redaction: &'static str,
}

/// Inputs required to construct a tool-call audit event.
#[derive(Debug, Clone, Default)]
pub struct PolicyAuditEventParams {
    /// Tool name when recognized.
    pub tool: Option<ToolName>,
    /// Policy name for evaluation calls.
    pub policy: Option<String>,
    /// Decision bit for successful evaluation calls.
    pub allowed: Option<bool>,
    /// Normalized error kind label; `None` marks success.
    pub error_kind: Option<&'static str>,
    /// Evaluator backend label.
    pub evaluator: Option<&'static str>,
}

impl PolicyAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: PolicyAuditEventParams) -> Self {
        let outcome = if params.error_kind.is_some() { ToolOutcome::Error } else { ToolOutcome::Ok };
        Self {
            event: "tool_call",
            timestamp_ms: now_ms(),
            tool: params.tool,
            policy: params.policy,
            allowed: params.allowed,
            outcome,
            error_kind: params.error_kind,
            evaluator: params.evaluator,
            redaction: REDACTION_OMITTED,
        }
    }
}

/// Authentication audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Whether the credentials matched a directory entry.
    pub authenticated: bool,
    /// Role granted on success.
    pub role: Option<String>,
    /// Redaction classification for payload logging.
    pub redaction: &'static str,
}

impl AuthAuditEvent {
    /// Creates a new authentication audit event.
    #[must_use]
    pub fn new(authenticated: bool, role: Option<String>) -> Self {
        Self {
            event: "auth_attempt",
            timestamp_ms: now_ms(),
            authenticated,
            role,
            redaction: REDACTION_OMITTED,
        }
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for tool-call events.
pub trait PolicyAuditSink: Send + Sync {
    /// Record a tool-call audit event.
    fn record(&self, event: &PolicyAuditEvent);

    /// Record an authentication audit event.
    fn record_auth(&self, _event: &AuthAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl PolicyAuditSink for StderrAuditSink {
    fn record(&self, event: &PolicyAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_auth(&self, event: &AuthAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl PolicyAuditSink for FileAuditSink {
    fn record(&self, event: &PolicyAuditEvent) {
        self.append(event);
    }

    fn record_auth(&self, event: &AuthAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl PolicyAuditSink for NoopAuditSink {
    fn record(&self, _event: &PolicyAuditEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns an error when the file sink cannot open its log file.
pub fn audit_sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn PolicyAuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
        (AuditSinkKind::File, Some(path)) => Ok(Arc::new(FileAuditSink::new(Path::new(path))?)),
        (AuditSinkKind::File, None) => {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "audit.sink=file requires audit.path"))
        }
    }
}
