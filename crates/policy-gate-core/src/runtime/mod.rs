// crates/policy-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Policy Gate Runtime
// Description: Deterministic local rule evaluation.
// Purpose: Evaluate built-in policies against input documents.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the built-in rule table. Every surface (tool
//! calls, CLI, delegating adapters) must call into the same table to
//! preserve decision invariance.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod rules;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use rules::LocalRuleEvaluator;
pub use rules::Rule;
pub use rules::evaluate;
pub use rules::evaluate_policy;
pub use rules::first_match;
pub use rules::rules_for;
