// crates/policy-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Provides the message catalog and translation utilities.
// Purpose: Centralize user-facing strings for consistent CLI output.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Policy Gate CLI stores user-facing strings in a small catalog so every
//! message is phrased once. All runtime output should be routed through the
//! [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries.
const CATALOG: &[(&str, &str)] = &[
    ("main.version", "policy-gate {version}"),
    ("runtime.start_failed", "Failed to start async runtime: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    (
        "config.validate.ok",
        "Config validated successfully (evaluator: {mode}, users: {users}, audit: {audit}).",
    ),
    ("router.build_failed", "Failed to initialize tool router: {error}"),
    ("input.read_failed", "Failed to read {path}: {error}"),
    (
        "input.too_large",
        "Refusing to read {path}: size {size} bytes exceeds limit {limit} bytes.",
    ),
    ("input.parse_failed", "Failed to parse JSON from {path}: {error}"),
    ("tool.call_failed", "Tool {tool} failed: {error}"),
    (
        "eval.explain_unsupported",
        "--explain requires the local evaluator (configured: {backend}).",
    ),
    ("output.json_failed", "Failed to render JSON output: {error}"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
];

/// Returns the message catalog.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

/// Returns all catalog keys in declaration order.
#[must_use]
pub fn catalog_keys() -> Vec<&'static str> {
    CATALOG.iter().map(|(key, _)| *key).collect()
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Resolves `key` in the catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
