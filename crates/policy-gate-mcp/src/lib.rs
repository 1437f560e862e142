// crates/policy-gate-mcp/src/lib.rs
// ============================================================================
// Module: Policy Gate MCP Library
// Description: Tool-call boundary for policy evaluation and authentication.
// Purpose: Route tool calls to the configured evaluator with audit logging.
// Dependencies: policy-gate-core, policy-gate-config, policy-gate-providers
// ============================================================================

//! ## Overview
//! `policy-gate-mcp` is the host side of the policy evaluator. The
//! [`ToolRouter`] validates tool arguments, dispatches evaluation to the
//! configured [`policy_gate_core::PolicyEvaluator`], answers credential checks
//! from a read-only [`UserDirectory`], and records redacted audit events.
//! Transport plumbing (JSON-RPC over stdio or HTTP) is left to the embedding
//! process.
//!
//! Security posture: tool payloads are untrusted; arguments are validated
//! before any evaluator is reached and payloads are never written to audit
//! logs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod evaluator;
pub mod tools;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuthAuditEvent;
pub use audit::PolicyAuditEvent;
pub use audit::PolicyAuditSink;
pub use auth::AuthenticatedUser;
pub use auth::UserDirectory;
pub use evaluator::build_evaluator;
pub use tools::ToolError;
pub use tools::ToolRouter;
