//! Wire format of the cart service.
//!
//! Requests are url-encoded form posts; responses are JSON. Every response
//! field is optional on the wire because the service omits fields freely on
//! both success and failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartSummary, CurrencyCode, Money};

/// Value of the `action` field the service requires on add and update.
pub const ACTION_POST: &str = "post";

/// Form field name carrying the CSRF token.
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

/// Header name carrying the CSRF token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

// =============================================================================
// Requests
// =============================================================================

/// Body of an add request.
#[derive(Debug, Serialize)]
pub struct AddForm<'a> {
    pub product_id: &'a str,
    pub product_qty: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrfmiddlewaretoken: Option<&'a str>,
    pub action: &'a str,
}

/// Body of an update request.
#[derive(Debug, Serialize)]
pub struct UpdateForm<'a> {
    pub product_id: &'a str,
    pub action_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrfmiddlewaretoken: Option<&'a str>,
    pub action: &'a str,
}

/// Body of a delete request. Here `action` is the control's action kind.
#[derive(Debug, Serialize)]
pub struct DeleteForm<'a> {
    pub product_id: &'a str,
    pub action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrfmiddlewaretoken: Option<&'a str>,
}

// =============================================================================
// Responses
// =============================================================================

/// Minimal body used to pull a message out of a failed response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Response to an add request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResponse {
    /// New total quantity across the cart.
    pub qty: Option<u64>,
    pub cart_total: Option<Decimal>,
    pub error: Option<String>,
}

/// Response to an update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub qty: Option<u64>,
    /// Quantity of the updated line after the change; `<= 0` means gone.
    pub item_quantity: Option<i64>,
    pub cart_total: Option<Decimal>,
    /// Subtotal of the updated line, when the service reports it.
    pub line_total: Option<Decimal>,
    pub success: Option<bool>,
    pub error: Option<String>,
}

/// Response to a delete request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
    pub qty: Option<u64>,
    pub cart_total: Option<Decimal>,
}

fn summary(qty: Option<u64>, total: Option<Decimal>, currency: CurrencyCode) -> CartSummary {
    CartSummary {
        total_quantity: qty,
        total_amount: total.map(|amount| Money::new(amount, currency)),
    }
}

impl AddResponse {
    /// Cart totals reported alongside the add.
    #[must_use]
    pub fn summary(&self, currency: CurrencyCode) -> CartSummary {
        summary(self.qty, self.cart_total, currency)
    }
}

impl UpdateResponse {
    /// Cart totals reported alongside the update.
    #[must_use]
    pub fn summary(&self, currency: CurrencyCode) -> CartSummary {
        summary(self.qty, self.cart_total, currency)
    }

    /// Whether the service signalled a logical failure in a 2xx body.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some() || matches!(self.success, Some(false))
    }
}

impl DeleteResponse {
    /// Cart totals reported alongside the delete.
    #[must_use]
    pub fn summary(&self, currency: CurrencyCode) -> CartSummary {
        summary(self.qty, self.cart_total, currency)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_response_reads_float_totals() {
        let body = r#"{"qty": 3, "item_quantity": 0, "cart_total": 12.5, "success": true}"#;
        let response: UpdateResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.qty, Some(3));
        assert_eq!(response.item_quantity, Some(0));
        assert_eq!(response.cart_total, Some(Decimal::new(125, 1)));
        assert!(!response.is_failure());
        assert_eq!(
            response.summary(CurrencyCode::USD).total_amount.unwrap().to_string(),
            "$12.50"
        );
    }

    #[test]
    fn test_delete_response_without_success_is_a_failure() {
        let response: DeleteResponse = serde_json::from_str(r#"{"error": "gone"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("gone"));
    }

    #[test]
    fn test_update_response_error_field_is_a_failure() {
        let response: UpdateResponse =
            serde_json::from_str(r#"{"error": "Product is out of stock"}"#).unwrap();
        assert!(response.is_failure());
    }

    #[test]
    fn test_add_form_omits_csrf_field_when_sent_as_header() {
        let form = AddForm {
            product_id: "42",
            product_qty: "2",
            csrfmiddlewaretoken: None,
            action: ACTION_POST,
        };
        let value = serde_json::to_value(&form).unwrap();
        assert!(value.get(CSRF_FORM_FIELD).is_none());
        assert_eq!(value["product_qty"], "2");
        assert_eq!(value["action"], "post");
    }
}
