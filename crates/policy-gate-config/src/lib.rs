// crates/policy-gate-config/src/lib.rs
// ============================================================================
// Module: Policy Gate Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for policy-gate.toml semantics.
// Dependencies: policy-gate-providers, serde, toml
// ============================================================================

//! ## Overview
//! `policy-gate-config` defines the configuration model for Policy Gate:
//! which evaluator backs decisions, where audit events go, input limits, and
//! the read-only user directory. Validation is strict and fail-closed.
//!
//! Security posture: config inputs are untrusted and validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
