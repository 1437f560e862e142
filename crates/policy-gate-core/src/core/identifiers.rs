// crates/policy-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Policy Gate Identifiers
// Description: Canonical policy identifiers and the built-in policy catalog.
// Purpose: Provide a strongly typed policy name with a stable string form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Policy names serialize as plain strings. Names outside the built-in
//! catalog are kept verbatim in [`PolicyName::Unknown`] so decisions can echo
//! exactly what the caller asked for; unknown names always evaluate to deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Policy Name
// ============================================================================

/// Policy identifier.
///
/// # Invariants
/// - Known variants map one-to-one onto their canonical string labels.
/// - [`PolicyName::Unknown`] never holds a canonical label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PolicyName {
    /// Role-based policy: admins do anything, users may read.
    Simple,
    /// Department-scoped policy: users may also write within their department.
    Advanced,
    /// Clearance-based policy: users access documents at or below their clearance.
    AttributeBased,
    /// Any other policy name, preserved verbatim.
    Unknown(String),
}

impl PolicyName {
    /// Parses a policy name; names outside the catalog become [`Self::Unknown`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "simple" => Self::Simple,
            "advanced" => Self::Advanced,
            "attribute_based" => Self::AttributeBased,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns the policy name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Simple => "simple",
            Self::Advanced => "advanced",
            Self::AttributeBased => "attribute_based",
            Self::Unknown(name) => name,
        }
    }

    /// Returns true when the name belongs to the built-in catalog.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PolicyName {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for PolicyName {
    fn from(value: String) -> Self {
        match value.as_str() {
            "simple" => Self::Simple,
            "advanced" => Self::Advanced,
            "attribute_based" => Self::AttributeBased,
            _ => Self::Unknown(value),
        }
    }
}

impl From<PolicyName> for String {
    fn from(value: PolicyName) -> Self {
        match value {
            PolicyName::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the built-in policies in canonical order.
#[must_use]
pub const fn policy_catalog() -> &'static [PolicyName] {
    &[PolicyName::Simple, PolicyName::Advanced, PolicyName::AttributeBased]
}

// ============================================================================
// SECTION: Tests
// ============================================================================
