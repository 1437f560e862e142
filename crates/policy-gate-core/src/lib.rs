// crates/policy-gate-core/src/lib.rs
// ============================================================================
// Module: Policy Gate Core Library
// Description: Public API surface for the Policy Gate core.
// Purpose: Expose policy types, the evaluator capability, and the rule table.
// Dependencies: crate::{core, interfaces, runtime, tooling}
// ============================================================================

//! ## Overview
//! Policy Gate core provides deterministic, fail-closed policy decisions for
//! structured input documents. Evaluation is a pure function of the policy
//! name and the input; callers reach it through the [`PolicyEvaluator`]
//! capability so the local rule table and remote policy agents stay
//! interchangeable.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod tooling;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::EvaluationError;
pub use interfaces::PolicyEvaluator;
pub use runtime::LocalRuleEvaluator;
pub use runtime::Rule;
pub use runtime::evaluate;
pub use runtime::evaluate_policy;
pub use tooling::ToolName;
