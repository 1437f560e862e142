// crates/policy-gate-mcp/src/auth.rs
// ============================================================================
// Module: User Directory
// Description: Read-only credential directory for the authenticate tool.
// Purpose: Answer credential checks without timing side-channels on secrets.
// Dependencies: policy-gate-config, subtle
// ============================================================================

//! ## Overview
//! The user directory is built once from configuration and never mutated.
//! Password comparison runs in constant time with respect to the stored
//! secret, and unknown usernames still pay for one comparison so lookups do
//! not reveal which accounts exist.
//!
//! Security posture: credentials are secrets; they are never logged or echoed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use policy_gate_config::UserConfig;
use serde::Serialize;
use subtle::ConstantTimeEq;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Placeholder secret compared when a username is not in the directory.
const UNKNOWN_USER_SECRET: &str = "policy-gate-unknown-user";

/// Stored credential entry.
#[derive(Clone)]
struct UserRecord {
    /// Shared secret.
    password: String,
    /// Role reported on success.
    role: String,
}

/// User returned by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    /// Login name.
    pub username: String,
    /// Granted role.
    pub role: String,
}

/// Read-only username to credential mapping.
#[derive(Clone, Default)]
pub struct UserDirectory {
    /// Entries keyed by username.
    users: BTreeMap<String, UserRecord>,
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory").field("users", &self.users.len()).finish()
    }
}

impl UserDirectory {
    /// Builds a directory from validated configuration entries.
    ///
    /// Later duplicates never occur in validated config; if present the first
    /// entry wins.
    #[must_use]
    pub fn from_config(entries: &[UserConfig]) -> Self {
        let mut users = BTreeMap::new();
        for entry in entries {
            users.entry(entry.username.clone()).or_insert_with(|| UserRecord {
                password: entry.password.clone(),
                role: entry.role.clone(),
            });
        }
        Self {
            users,
        }
    }

    /// Checks credentials and returns the user on success.
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> Option<AuthenticatedUser> {
        let Some(record) = self.users.get(username) else {
            let _ = constant_time_eq_str(UNKNOWN_USER_SECRET, password);
            return None;
        };
        if !constant_time_eq_str(&record.password, password) {
            return None;
        }
        Some(AuthenticatedUser {
            username: username.to_string(),
            role: record.role.clone(),
        })
    }
}

// ============================================================================
// SECTION: Constant-Time Comparisons
// ============================================================================

/// Compares two strings in constant time.
#[must_use]
pub fn constant_time_eq_str(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
