// crates/policy-gate-config/src/config.rs
// ============================================================================
// Module: Policy Gate Configuration
// Description: Configuration loading and validation for Policy Gate.
// Purpose: Provide strict, fail-closed config parsing with size/path limits.
// Dependencies: policy-gate-providers, serde, toml
// ============================================================================

//! ## Overview
//! This module loads `policy-gate.toml`, applies defaults, and validates every
//! section before any evaluator or directory is built from it.
//!
//! Resolution order for the config path: explicit path, then the
//! `POLICY_GATE_CONFIG` environment variable, then `policy-gate.toml` in the
//! working directory. [`PolicyGateConfig::load_or_default`] falls back to the
//! built-in defaults only when neither an explicit path nor the environment
//! variable was given and the default file does not exist.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use policy_gate_providers::RemoteAgentConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Default config file name.
pub const DEFAULT_CONFIG_NAME: &str = "policy-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "POLICY_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum input document size in bytes.
const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Upper bound for the configurable input document size.
pub const MAX_INPUT_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Maximum number of directory entries.
pub const MAX_USERS: usize = 1024;
/// Maximum length of a username, password, or role.
const MAX_CREDENTIAL_FIELD_LENGTH: usize = 256;

// ============================================================================
// SECTION: Top-Level Config
// ============================================================================

/// Policy Gate configuration loaded from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyGateConfig {
    /// Evaluator selection.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Request limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Read-only user directory.
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl PolicyGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_from(&resolved.path)
    }

    /// Loads configuration, falling back to defaults when no file was requested
    /// and the default file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit or environment-selected file
    /// cannot be loaded, or when any loaded file is invalid.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        if !resolved.explicit && !resolved.path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::load_from(&resolved.path)
    }

    /// Parses configuration from a TOML string and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file at a resolved path.
    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evaluator.validate()?;
        self.audit.validate()?;
        self.limits.validate()?;
        validate_users(&self.users)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Evaluator Config
// ============================================================================

/// Evaluator backend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorMode {
    /// Built-in rule table.
    #[default]
    Local,
    /// Delegate decisions to a remote policy agent.
    Remote,
}

impl EvaluatorMode {
    /// Returns the canonical config label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// Evaluator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Selected evaluator backend.
    #[serde(default)]
    pub mode: EvaluatorMode,
    /// Remote agent settings, used when `mode = "remote"`.
    #[serde(default)]
    pub remote: RemoteAgentConfig,
}

impl EvaluatorConfig {
    /// Validates evaluator settings.
    ///
    /// Remote settings are only checked when the remote backend is selected,
    /// so a local deployment is never blocked by an unused agent URL.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == EvaluatorMode::Remote {
            self.remote
                .validate()
                .map_err(|message| ConfigError::Invalid(format!("evaluator.remote.{message}")))?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

impl AuditSinkKind {
    /// Returns the canonical config label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::None => "none",
        }
    }
}

/// Audit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Output path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.sink=file requires audit.path".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid with audit.sink=file".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Limits Config
// ============================================================================

/// Request size limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum serialized size of a tool payload or input document.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == 0 || self.max_input_bytes > MAX_INPUT_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "limits.max_input_bytes must be between 1 and {MAX_INPUT_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Returns the default input size limit.
const fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

// ============================================================================
// SECTION: User Directory Config
// ============================================================================

/// A single user directory entry.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Login name.
    pub username: String,
    /// Shared secret checked during authentication.
    pub password: String,
    /// Role reported on successful authentication.
    pub role: String,
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Validates the user directory entries.
fn validate_users(users: &[UserConfig]) -> Result<(), ConfigError> {
    if users.len() > MAX_USERS {
        return Err(ConfigError::Invalid(format!("users exceeds max entries ({MAX_USERS})")));
    }
    let mut seen = BTreeSet::new();
    for user in users {
        validate_credential_field("users.username", &user.username)?;
        validate_credential_field("users.password", &user.password)?;
        validate_credential_field("users.role", &user.role)?;
        if user.username.trim() != user.username {
            return Err(ConfigError::Invalid(
                "users.username must not have surrounding whitespace".to_string(),
            ));
        }
        if !seen.insert(user.username.as_str()) {
            return Err(ConfigError::Invalid(format!("duplicate user: {}", user.username)));
        }
    }
    Ok(())
}

/// Validates a single credential field.
fn validate_credential_field(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_CREDENTIAL_FIELD_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config path plus whether it was requested explicitly.
struct ResolvedPath {
    /// Path to read.
    path: PathBuf,
    /// True when the path came from the caller or the environment.
    explicit: bool,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            explicit: true,
        });
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            explicit: true,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        explicit: false,
    })
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
