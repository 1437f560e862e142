// crates/policy-gate-mcp/src/evaluator.rs
// ============================================================================
// Module: Evaluator Selection
// Description: Builds the configured policy evaluator backend.
// Purpose: Keep backend choice a configuration concern behind one capability.
// Dependencies: policy-gate-config, policy-gate-core, policy-gate-providers
// ============================================================================

//! ## Overview
//! The rule logic exists once, in the local rule table. The remote agent is an
//! adapter over the same [`PolicyEvaluator`] capability, and this module picks
//! between them from `[evaluator]` configuration.

use std::sync::Arc;

use policy_gate_config::EvaluatorConfig;
use policy_gate_config::EvaluatorMode;
use policy_gate_core::EvaluationError;
use policy_gate_core::LocalRuleEvaluator;
use policy_gate_core::PolicyEvaluator;
use policy_gate_providers::RemotePolicyAgent;

/// Builds the evaluator selected by configuration.
///
/// The remote agent owns a blocking HTTP client, so call this outside of an
/// async context.
///
/// # Errors
///
/// Returns [`EvaluationError::Configuration`] when remote settings are invalid.
pub fn build_evaluator(
    config: &EvaluatorConfig,
) -> Result<Arc<dyn PolicyEvaluator>, EvaluationError> {
    match config.mode {
        EvaluatorMode::Local => Ok(Arc::new(LocalRuleEvaluator)),
        EvaluatorMode::Remote => Ok(Arc::new(RemotePolicyAgent::new(config.remote.clone())?)),
    }
}
