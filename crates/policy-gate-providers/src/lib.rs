// crates/policy-gate-providers/src/lib.rs
// ============================================================================
// Module: Policy Gate Providers
// Description: Delegating policy evaluator backends.
// Purpose: Provide remote policy agents behind the core evaluator capability.
// Dependencies: policy-gate-core, serde, reqwest
// ============================================================================

//! ## Overview
//! This crate ships policy evaluator backends that delegate decisions to an
//! external policy agent. Backends implement
//! [`policy_gate_core::PolicyEvaluator`], enforce strict URL and size limits
//! on untrusted responses, and fail closed when a decision cannot be
//! resolved.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod remote;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use remote::RemoteAgentConfig;
pub use remote::RemotePolicyAgent;
