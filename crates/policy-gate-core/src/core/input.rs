// crates/policy-gate-core/src/core/input.rs
// ============================================================================
// Module: Policy Input Documents
// Description: Input document alias and a tolerant read-only attribute view.
// Purpose: Resolve policy attributes without failing on malformed input.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Input documents are arbitrary JSON objects. [`InputView`] borrows one and
//! resolves the attributes policies consult. Missing or mistyped fields
//! resolve to absent/falsy defaults instead of errors, so evaluation always
//! completes. The view never mutates or normalizes the document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Structured input document evaluated by policies.
pub type InputDocument = Map<String, Value>;

/// Placeholder for a missing department attribute.
static EMPTY_ATTRIBUTE: Value = Value::String(String::new());

/// Read-only attribute view over an [`InputDocument`].
#[derive(Debug, Clone, Copy)]
pub struct InputView<'a> {
    /// Borrowed input document.
    input: &'a InputDocument,
}

impl<'a> InputView<'a> {
    /// Creates a view over the input document.
    #[must_use]
    pub const fn new(input: &'a InputDocument) -> Self {
        Self {
            input,
        }
    }

    /// Returns `user.role`, or an empty string when absent or not a string.
    #[must_use]
    pub fn role(&self) -> &'a str {
        string_field(self.user(), "role")
    }

    /// Returns the top-level `action`, or an empty string when absent or not a string.
    #[must_use]
    pub fn action(&self) -> &'a str {
        self.input.get("action").and_then(Value::as_str).unwrap_or("")
    }

    /// Returns the raw `user.department` value, defaulting to an empty string.
    #[must_use]
    pub fn user_department(&self) -> &'a Value {
        raw_field(self.user(), "department")
    }

    /// Returns the raw `document.department` value, defaulting to an empty string.
    #[must_use]
    pub fn document_department(&self) -> &'a Value {
        raw_field(self.document(), "department")
    }

    /// Returns true when the user and document departments are equal.
    ///
    /// Numeric departments compare by value, so `1` equals `1.0`.
    #[must_use]
    pub fn departments_match(&self) -> bool {
        attributes_equal(self.user_department(), self.document_department())
    }

    /// Returns `user.clearance_level` (missing or null resolves to zero).
    ///
    /// Returns `None` when the value is present but not numeric.
    #[must_use]
    pub fn clearance_level(&self) -> Option<Number> {
        numeric_field(self.user(), "clearance_level")
    }

    /// Returns `document.classification_level` (missing or null resolves to zero).
    ///
    /// Returns `None` when the value is present but not numeric.
    #[must_use]
    pub fn classification_level(&self) -> Option<Number> {
        numeric_field(self.document(), "classification_level")
    }

    /// Returns the `user` object when present.
    fn user(&self) -> Option<&'a Map<String, Value>> {
        self.input.get("user").and_then(Value::as_object)
    }

    /// Returns the `document` object when present.
    fn document(&self) -> Option<&'a Map<String, Value>> {
        self.input.get("document").and_then(Value::as_object)
    }
}

// ============================================================================
// SECTION: Numeric Comparison
// ============================================================================

/// Compares two JSON numbers, exactly for integers and by `f64` otherwise.
#[must_use]
pub fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    if let (Some(left), Some(right)) = (integer_value(left), integer_value(right)) {
        return Some(left.cmp(&right));
    }
    left.as_f64()?.partial_cmp(&right.as_f64()?)
}

/// Compares two attribute values, treating numbers by value.
fn attributes_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            compare_numbers(left, right) == Some(Ordering::Equal)
        }
        _ => left == right,
    }
}

/// Widens an integral JSON number so signed and unsigned values compare exactly.
fn integer_value(number: &Number) -> Option<i128> {
    number.as_i64().map(i128::from).or_else(|| number.as_u64().map(i128::from))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves a string field, treating absent or non-string values as empty.
fn string_field<'a>(object: Option<&'a Map<String, Value>>, key: &str) -> &'a str {
    object.and_then(|map| map.get(key)).and_then(Value::as_str).unwrap_or("")
}

/// Resolves a raw field, treating absent values as an empty string.
fn raw_field<'a>(object: Option<&'a Map<String, Value>>, key: &str) -> &'a Value {
    object.and_then(|map| map.get(key)).unwrap_or(&EMPTY_ATTRIBUTE)
}

/// Resolves a numeric field; absent or null is zero, other non-numbers are `None`.
fn numeric_field(object: Option<&Map<String, Value>>, key: &str) -> Option<Number> {
    match object.and_then(|map| map.get(key)) {
        None | Some(Value::Null) => Some(Number::from(0)),
        Some(Value::Number(number)) => Some(number.clone()),
        Some(_) => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use serde_json::json;

    use super::*;

    fn document(value: Value) -> InputDocument {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_fields_resolve_to_defaults() {
        let input = document(json!({}));
        let view = InputView::new(&input);
        assert_eq!(view.role(), "");
        assert_eq!(view.action(), "");
        assert_eq!(view.user_department(), &json!(""));
        assert_eq!(view.document_department(), &json!(""));
        assert_eq!(view.clearance_level(), Some(Number::from(0)));
        assert_eq!(view.classification_level(), Some(Number::from(0)));
    }

    #[test]
    fn non_object_user_is_treated_as_absent() {
        let input = document(json!({"user": "admin", "document": [1, 2]}));
        let view = InputView::new(&input);
        assert_eq!(view.role(), "");
        assert_eq!(view.classification_level(), Some(Number::from(0)));
    }

    #[test]
    fn mistyped_fields_do_not_match_strings() {
        let input = document(json!({"user": {"role": 7, "clearance_level": "high"}, "action": true}));
        let view = InputView::new(&input);
        assert_eq!(view.role(), "");
        assert_eq!(view.action(), "");
        assert_eq!(view.clearance_level(), None);
    }

    #[test]
    fn compare_numbers_handles_mixed_representations() {
        let big = Number::from(u64::MAX);
        let negative = Number::from(-1_i64);
        assert_eq!(compare_numbers(&big, &negative), Some(Ordering::Greater));
        let float = Number::from_f64(2.5).unwrap();
        assert_eq!(compare_numbers(&Number::from(3), &float), Some(Ordering::Greater));
        assert_eq!(compare_numbers(&Number::from(2), &float), Some(Ordering::Less));
    }

    #[test]
    fn numeric_departments_compare_by_value() {
        let input = document(
            serde_json::from_str(r#"{"user": {"department": 1}, "document": {"department": 1.0}}"#)
                .unwrap(),
        );
        assert!(InputView::new(&input).departments_match());

        let input = document(
            serde_json::from_str(r#"{"user": {"department": 7}, "document": {"department": "7"}}"#)
                .unwrap(),
        );
        assert!(!InputView::new(&input).departments_match());
    }

    #[test]
    fn missing_departments_match_each_other() {
        let input = document(json!({"user": {}, "document": {}}));
        assert!(InputView::new(&input).departments_match());
    }
}
