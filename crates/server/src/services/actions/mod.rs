//! Mutation actions.
//!
//! Every entity write follows one contract: validate the input shape,
//! verify tenant ownership of every referenced ID, perform the write
//! through the gateway (a transaction when more than one row changes),
//! invalidate the entity's cache tags only after the write commits, and
//! return a uniform [`ActionResult`].
//!
//! Validation failures carry per-field messages and perform no write and
//! no invalidation. Gateway errors are logged server-side and surfaced as
//! a generic failure message, never the raw error.

pub mod batch;
pub mod category;
pub mod customer;
pub mod location;
pub mod product;
pub mod purchase_order;
pub mod sale;
pub mod supplier;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_core::Email;

/// Uniform result shape returned by every mutation action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    /// Whether the mutation was applied.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Per-field validation messages, present only on validation failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ActionResult {
    /// A successful mutation.
    #[must_use]
    pub const fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
            errors: None,
        }
    }

    /// A failed mutation with no field-level detail.
    #[must_use]
    pub const fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            errors: None,
        }
    }

    /// A validation failure on a single field.
    #[must_use]
    pub fn invalid(field: &str, message: String) -> Self {
        let mut errors = FieldErrors::default();
        errors.push(field, message);
        errors.into_result()
    }
}

/// Accumulator for per-field validation messages.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Add a message for a field.
    pub fn push(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_default().push(message);
    }

    /// True when no messages have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into a failed [`ActionResult`].
    #[must_use]
    pub fn into_result(self) -> ActionResult {
        ActionResult {
            success: false,
            message: "Validation failed".to_string(),
            errors: Some(self.0),
        }
    }
}

// =============================================================================
// Validation helpers
// =============================================================================

/// Require a non-blank string.
pub fn require_non_empty(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("{field} is required"));
    }
}

/// Require a non-negative integer.
pub fn require_non_negative(errors: &mut FieldErrors, field: &str, value: i32) {
    if value < 0 {
        errors.push(field, format!("{field} must be zero or greater"));
    }
}

/// Require a strictly positive integer.
pub fn require_positive(errors: &mut FieldErrors, field: &str, value: i32) {
    if value <= 0 {
        errors.push(field, format!("{field} must be greater than zero"));
    }
}

/// Require a non-negative decimal amount.
pub fn require_non_negative_amount(errors: &mut FieldErrors, field: &str, value: Decimal) {
    if value < Decimal::ZERO {
        errors.push(field, format!("{field} must be zero or greater"));
    }
}

/// Require a structurally valid email when one is given.
pub fn require_valid_email(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if let Some(value) = value
        && let Err(e) = Email::parse(value)
    {
        errors.push(field, e.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_ok_result_shape() {
        let result = ActionResult::ok("Product created".to_string());
        assert!(result.success);
        assert!(result.errors.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Product created");
        // errors key is omitted entirely on success
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_field_errors_accumulate() {
        let mut errors = FieldErrors::default();
        require_non_empty(&mut errors, "name", "  ");
        require_non_negative(&mut errors, "quantity", -1);
        require_non_negative_amount(&mut errors, "unit_price", dec!(-0.01));
        assert!(!errors.is_empty());

        let result = errors.into_result();
        assert!(!result.success);
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["name"], vec!["name is required"]);
        assert_eq!(errors["quantity"], vec!["quantity must be zero or greater"]);
    }

    #[test]
    fn test_multiple_messages_per_field() {
        let mut errors = FieldErrors::default();
        errors.push("sku", "too short".to_string());
        errors.push("sku", "already in use".to_string());

        let result = errors.into_result();
        assert_eq!(result.errors.unwrap()["sku"].len(), 2);
    }

    #[test]
    fn test_valid_input_accumulates_nothing() {
        let mut errors = FieldErrors::default();
        require_non_empty(&mut errors, "name", "Widget");
        require_non_negative(&mut errors, "quantity", 0);
        require_positive(&mut errors, "items", 3);
        require_non_negative_amount(&mut errors, "unit_price", dec!(9.99));
        require_valid_email(&mut errors, "email", Some("owner@acme.com"));
        require_valid_email(&mut errors, "email", None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_invalid_email_is_reported() {
        let mut errors = FieldErrors::default();
        require_valid_email(&mut errors, "contact_email", Some("nope"));
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_invalid_single_field_constructor() {
        let result = ActionResult::invalid("threshold", "must be zero or greater".to_string());
        assert!(!result.success);
        assert_eq!(result.message, "Validation failed");
        assert!(result.errors.unwrap().contains_key("threshold"));
    }
}
