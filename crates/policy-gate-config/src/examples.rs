// crates/policy-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `policy-gate.toml`. The output is deterministic and
//! parses under the strict config model.

/// Returns a canonical example `policy-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[evaluator]
mode = "local"

[evaluator.remote]
base_url = "http://localhost:8181"
allow_http = false
timeout_ms = 5000
max_response_bytes = 1048576
user_agent = "policy-gate/0.1"

[audit]
sink = "stderr"
# sink = "file"
# path = "policy-gate-audit.jsonl"

[limits]
max_input_bytes = 1048576

[[users]]
username = "admin"
password = "change-me-admin"
role = "admin"

[[users]]
username = "user"
password = "change-me-user"
role = "user"
"#,
    )
}
