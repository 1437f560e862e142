// crates/policy-gate-core/src/core/decision.rs
// ============================================================================
// Module: Policy Decisions
// Description: Immutable decision records produced by policy evaluation.
// Purpose: Capture the outcome alongside an exact echo of the evaluated input.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Decision`] records whether an input was allowed under a policy. The
//! input is echoed exactly as received so callers can audit or debug the
//! evaluation; no normalization is applied. Decisions serialize to JSON with
//! the keys `allowed`, `policy`, and `input`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::PolicyName;
use crate::core::input::InputDocument;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Immutable record of a policy evaluation.
///
/// # Invariants
/// - `input` is identical to the document passed to the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the input is permitted by the policy.
    allowed: bool,
    /// Policy that was evaluated.
    policy: PolicyName,
    /// Echo of the evaluated input.
    input: InputDocument,
}

impl Decision {
    /// Creates a decision record.
    #[must_use]
    pub const fn new(allowed: bool, policy: PolicyName, input: InputDocument) -> Self {
        Self {
            allowed,
            policy,
            input,
        }
    }

    /// Creates a fail-closed deny decision.
    #[must_use]
    pub const fn deny(policy: PolicyName, input: InputDocument) -> Self {
        Self::new(false, policy, input)
    }

    /// Returns whether the input was allowed.
    #[must_use]
    pub const fn allowed(&self) -> bool {
        self.allowed
    }

    /// Returns the evaluated policy.
    #[must_use]
    pub const fn policy(&self) -> &PolicyName {
        &self.policy
    }

    /// Returns the echoed input document.
    #[must_use]
    pub const fn input(&self) -> &InputDocument {
        &self.input
    }
}
