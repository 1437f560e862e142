// crates/policy-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Policy Gate Interfaces
// Description: Backend-agnostic evaluator capability and its error taxonomy.
// Purpose: Let callers swap the local rule table for a remote policy agent.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! [`PolicyEvaluator`] is the single seam between policy callers and policy
//! backends. The local rule table never fails; delegating backends report
//! transport or agent failures through [`EvaluationError`] and must fail
//! closed (deny) whenever a decision cannot be resolved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Decision;
use crate::core::InputDocument;
use crate::core::PolicyName;

// ============================================================================
// SECTION: Policy Evaluator
// ============================================================================

/// Policy evaluation errors raised by delegating backends.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Backend could not be constructed from its configuration.
    #[error("policy backend configuration error: {0}")]
    Configuration(String),
    /// Request to the policy agent failed before a response arrived.
    #[error("policy agent request failed: {0}")]
    Transport(String),
    /// Policy agent answered with a non-success status.
    #[error("policy agent returned status {status}")]
    Agent {
        /// HTTP status code returned by the agent.
        status: u16,
    },
    /// Policy agent response could not be interpreted.
    #[error("policy agent response invalid: {0}")]
    Response(String),
}

impl EvaluationError {
    /// Returns a stable label for audit and telemetry.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Transport(_) => "transport",
            Self::Agent {
                ..
            } => "agent_status",
            Self::Response(_) => "response",
        }
    }
}

/// Policy evaluation capability.
pub trait PolicyEvaluator: Send + Sync {
    /// Evaluates `policy` against `input` and returns a decision echoing the input.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] when a delegating backend cannot produce a
    /// decision. The local rule table never returns an error.
    fn evaluate(
        &self,
        policy: &PolicyName,
        input: &InputDocument,
    ) -> Result<Decision, EvaluationError>;

    /// Returns a stable backend label for audit events.
    fn backend(&self) -> &'static str;
}
