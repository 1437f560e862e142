// crates/policy-gate-core/src/core/mod.rs
// ============================================================================
// Module: Policy Gate Core Types
// Description: Canonical policy identifiers, input documents, and decisions.
// Purpose: Provide stable, serializable types for policy evaluation.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types define the policy catalog, the tolerant input document view,
//! and the immutable decision record. These types are the canonical source of
//! truth for any derived surface (tool calls, CLI output, remote agents).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod decision;
pub mod identifiers;
pub mod input;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decision::Decision;
pub use identifiers::PolicyName;
pub use identifiers::policy_catalog;
pub use input::InputDocument;
pub use input::InputView;
