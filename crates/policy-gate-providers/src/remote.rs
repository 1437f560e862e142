// crates/policy-gate-providers/src/remote.rs
// ============================================================================
// Module: Remote Policy Agent
// Description: Policy evaluator delegating decisions to an OPA-style agent.
// Purpose: Query `/v1/data/{policy}/allow` with bounded waits and sizes.
// Dependencies: policy-gate-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The remote agent posts `{"input": ...}` to
//! `{base_url}/v1/data/{policy}/allow` and reads the boolean `result` field of
//! the response. Redirects are disabled, responses are size-limited, and the
//! request timeout bounds every call. A missing or non-boolean `result` is a
//! deny. Policy names outside the built-in catalog are never sent to the agent;
//! they deny locally, matching the rule table.
//! Security posture: agent responses are untrusted and must fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::net::IpAddr;
use std::time::Duration;

use policy_gate_core::Decision;
use policy_gate_core::EvaluationError;
use policy_gate_core::InputDocument;
use policy_gate_core::PolicyEvaluator;
use policy_gate_core::PolicyName;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum request timeout in milliseconds.
pub const MIN_REMOTE_TIMEOUT_MS: u64 = 100;
/// Maximum request timeout in milliseconds.
pub const MAX_REMOTE_TIMEOUT_MS: u64 = 30_000;
/// Maximum allowed response size limit in bytes.
pub const MAX_REMOTE_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the remote policy agent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteAgentConfig {
    /// Base URL of the policy agent.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Allow cleartext HTTP to non-loopback hosts (disabled by default).
    #[serde(default)]
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RemoteAgentConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            allow_http: false,
            timeout_ms: default_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl RemoteAgentConfig {
    /// Validates the configuration and returns the parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<Url, String> {
        let url = Url::parse(self.base_url.trim()).map_err(|_| "base_url is invalid".to_string())?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http || is_loopback_host(&url) => {}
            "http" => {
                return Err("base_url uses http:// without allow_http".to_string());
            }
            _ => return Err("base_url must use http:// or https://".to_string()),
        }
        if url.host_str().is_none() {
            return Err("base_url requires a host".to_string());
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err("base_url must not include a query or fragment".to_string());
        }
        if !(MIN_REMOTE_TIMEOUT_MS ..= MAX_REMOTE_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(format!(
                "timeout_ms must be between {MIN_REMOTE_TIMEOUT_MS} and {MAX_REMOTE_TIMEOUT_MS}"
            ));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_REMOTE_RESPONSE_BYTES {
            return Err(format!(
                "max_response_bytes must be between 1 and {MAX_REMOTE_RESPONSE_BYTES}"
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must be non-empty".to_string());
        }
        Ok(url)
    }
}

/// Returns the default agent base URL.
fn default_base_url() -> String {
    "http://localhost:8181".to_string()
}

/// Returns the default request timeout.
const fn default_timeout_ms() -> u64 {
    5_000
}

/// Returns the default response size limit.
const fn default_max_response_bytes() -> usize {
    1024 * 1024
}

/// Returns the default user agent.
fn default_user_agent() -> String {
    "policy-gate/0.1".to_string()
}

// ============================================================================
// SECTION: Agent Implementation
// ============================================================================

/// Policy evaluator that delegates decisions to a remote policy agent.
pub struct RemotePolicyAgent {
    /// Agent configuration, including limits.
    config: RemoteAgentConfig,
    /// Validated base URL.
    base_url: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl RemotePolicyAgent {
    /// Creates a remote agent from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Configuration`] when the configuration is
    /// invalid or the HTTP client cannot be created.
    pub fn new(config: RemoteAgentConfig) -> Result<Self, EvaluationError> {
        let base_url = config.validate().map_err(EvaluationError::Configuration)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| EvaluationError::Configuration("http client build failed".to_string()))?;
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Returns the decision endpoint for a policy.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Configuration`] when the base URL cannot carry a path.
    pub fn endpoint(&self, policy: &PolicyName) -> Result<Url, EvaluationError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EvaluationError::Configuration("base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1", "data", policy.as_str(), "allow"]);
        Ok(url)
    }

    /// Posts the input to the agent and returns the allow bit.
    fn query(&self, policy: &PolicyName, input: &InputDocument) -> Result<bool, EvaluationError> {
        let url = self.endpoint(policy)?;
        let body = json!({ "input": input });
        let mut response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .map_err(|err| EvaluationError::Transport(transport_label(&err).to_string()))?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(EvaluationError::Agent {
                status: status.as_u16(),
            });
        }
        let bytes = read_response_limited(&mut response, self.config.max_response_bytes)?;
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|_| EvaluationError::Response("response is not valid json".to_string()))?;
        Ok(matches!(payload.get("result"), Some(Value::Bool(true))))
    }
}

impl PolicyEvaluator for RemotePolicyAgent {
    fn evaluate(
        &self,
        policy: &PolicyName,
        input: &InputDocument,
    ) -> Result<Decision, EvaluationError> {
        if !policy.is_known() {
            return Ok(Decision::deny(policy.clone(), input.clone()));
        }
        let allowed = self.query(policy, input)?;
        Ok(Decision::new(allowed, policy.clone(), input.clone()))
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the URL host is a loopback name or address.
fn is_loopback_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok_and(|addr| addr.is_loopback())
}

/// Classifies a transport failure without echoing untrusted detail.
fn transport_label(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    response: &mut reqwest::blocking::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, EvaluationError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| EvaluationError::Response("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(EvaluationError::Response("response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle
        .read_to_end(&mut buf)
        .map_err(|_| EvaluationError::Response("failed to read response".to_string()))?;
    if buf.len() > max_bytes {
        return Err(EvaluationError::Response("response exceeds size limit".to_string()));
    }
    Ok(buf)
}
