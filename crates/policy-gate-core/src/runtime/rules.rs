// crates/policy-gate-core/src/runtime/rules.rs
// ============================================================================
// Module: Policy Rule Table
// Description: Built-in rule table and the pure evaluation dispatch.
// Purpose: Map (policy, input) to an allow/deny decision deterministically.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Each built-in policy is an ordered list of [`Rule`]s. Rules are checked in
//! order and the first match allows the input; the admin bypass is always
//! first. A policy with no matching rule denies. Unknown policy names map to
//! an empty rule list, so they deny as well: this is the fail-closed default
//! and is not reported as an error.
//!
//! ## Invariants
//! - Evaluation reads the input through [`InputView`] and never mutates it.
//! - Identical `(policy, input)` pairs always produce identical decisions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use serde::Serialize;

use crate::core::Decision;
use crate::core::InputDocument;
use crate::core::InputView;
use crate::core::PolicyName;
use crate::core::input::compare_numbers;
use crate::interfaces::EvaluationError;
use crate::interfaces::PolicyEvaluator;

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Role granted unconditional access.
const ROLE_ADMIN: &str = "admin";
/// Role subject to action and attribute checks.
const ROLE_USER: &str = "user";
/// Read action label.
const ACTION_READ: &str = "read";
/// Write action label.
const ACTION_WRITE: &str = "write";

/// Single allow condition in a policy rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// `user.role == "admin"`.
    AdminBypass,
    /// `user.role == "user"` and `action == "read"`.
    UserRead,
    /// `user.role == "user"`, `action == "write"`, and the user and document
    /// departments are equal.
    UserWriteOwnDepartment,
    /// `user.role == "user"` and `user.clearance_level >= document.classification_level`.
    UserClearanceCovers,
}

impl Rule {
    /// Returns a stable label for the rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminBypass => "admin_bypass",
            Self::UserRead => "user_read",
            Self::UserWriteOwnDepartment => "user_write_own_department",
            Self::UserClearanceCovers => "user_clearance_covers",
        }
    }

    /// Returns true when the rule allows the input.
    #[must_use]
    pub fn matches(self, view: &InputView<'_>) -> bool {
        match self {
            Self::AdminBypass => view.role() == ROLE_ADMIN,
            Self::UserRead => view.role() == ROLE_USER && view.action() == ACTION_READ,
            Self::UserWriteOwnDepartment => {
                view.role() == ROLE_USER
                    && view.action() == ACTION_WRITE
                    && view.departments_match()
            }
            Self::UserClearanceCovers => {
                if view.role() != ROLE_USER {
                    return false;
                }
                let (Some(clearance), Some(classification)) =
                    (view.clearance_level(), view.classification_level())
                else {
                    return false;
                };
                matches!(
                    compare_numbers(&clearance, &classification),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }
        }
    }
}

/// Rule table for the `simple` policy.
const SIMPLE_RULES: &[Rule] = &[Rule::AdminBypass, Rule::UserRead];
/// Rule table for the `advanced` policy.
const ADVANCED_RULES: &[Rule] = &[Rule::AdminBypass, Rule::UserRead, Rule::UserWriteOwnDepartment];
/// Rule table for the `attribute_based` policy.
const ATTRIBUTE_BASED_RULES: &[Rule] = &[Rule::AdminBypass, Rule::UserClearanceCovers];

/// Returns the ordered rule table for a policy (empty for unknown policies).
#[must_use]
pub const fn rules_for(policy: &PolicyName) -> &'static [Rule] {
    match policy {
        PolicyName::Simple => SIMPLE_RULES,
        PolicyName::Advanced => ADVANCED_RULES,
        PolicyName::AttributeBased => ATTRIBUTE_BASED_RULES,
        PolicyName::Unknown(_) => &[],
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Returns the first rule of `policy` that allows `input`, if any.
#[must_use]
pub fn first_match(policy: &PolicyName, input: &InputDocument) -> Option<Rule> {
    let view = InputView::new(input);
    rules_for(policy).iter().copied().find(|rule| rule.matches(&view))
}

/// Returns whether `policy` allows `input`.
#[must_use]
pub fn evaluate_policy(policy: &PolicyName, input: &InputDocument) -> bool {
    first_match(policy, input).is_some()
}

/// Evaluates a policy by name and returns a decision echoing the input.
#[must_use]
pub fn evaluate(policy_name: &str, input: &InputDocument) -> Decision {
    let policy = PolicyName::parse(policy_name);
    let allowed = evaluate_policy(&policy, input);
    Decision::new(allowed, policy, input.clone())
}

// ============================================================================
// SECTION: Local Evaluator
// ============================================================================

/// Policy evaluator backed by the built-in rule table.
///
/// # Invariants
/// - Stateless; evaluation never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRuleEvaluator;

impl PolicyEvaluator for LocalRuleEvaluator {
    fn evaluate(
        &self,
        policy: &PolicyName,
        input: &InputDocument,
    ) -> Result<Decision, EvaluationError> {
        let allowed = evaluate_policy(policy, input);
        Ok(Decision::new(allowed, policy.clone(), input.clone()))
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
