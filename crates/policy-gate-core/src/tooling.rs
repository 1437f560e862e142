// crates/policy-gate-core/src/tooling.rs
// ============================================================================
// Module: Policy Gate Tool Names
// Description: Canonical tool identifiers exposed to tool-call dispatchers.
// Purpose: Keep tool labels stable across routers, CLI, and audit events.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Tool names are stable labels used by tool-call dispatchers and audit
//! logs. Parsing is exact; unrecognized names are rejected by the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Tool Names
// ============================================================================

/// Canonical tool names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Evaluate a policy against an input document.
    EvaluateOpaPolicy,
    /// List the built-in policies.
    ListPolicies,
    /// Check credentials against the configured user directory.
    AuthenticateUser,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EvaluateOpaPolicy => "evaluate_opa_policy",
            Self::ListPolicies => "list_policies",
            Self::AuthenticateUser => "authenticate_user",
        }
    }

    /// Returns all tool names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::EvaluateOpaPolicy, Self::ListPolicies, Self::AuthenticateUser]
    }

    /// Parses a tool name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "evaluate_opa_policy" => Some(Self::EvaluateOpaPolicy),
            "list_policies" => Some(Self::ListPolicies),
            "authenticate_user" => Some(Self::AuthenticateUser),
            _ => None,
        }
    }

    /// Returns a one-line description of the tool.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::EvaluateOpaPolicy => "Evaluate a policy with input data",
            Self::ListPolicies => "List available policies",
            Self::AuthenticateUser => "Authenticate a user and return their role",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
