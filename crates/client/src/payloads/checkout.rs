//! Checkout payloads.
//!
//! The backend does not commit to one canonical field name for the checkout
//! identifier across its checkout mutations, so the payload keeps the raw
//! response value and the id is extracted by an ordered list of candidate
//! field names. The alias list is part of the wire contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Candidate field names for the checkout identifier, in priority order.
pub const CHECKOUT_ID_ALIASES: &[&str] = &["checkout_id", "checkoutId", "id"];

/// A checkout record as returned by create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutPayload {
    raw: Value,
}

impl CheckoutPayload {
    #[must_use]
    pub const fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The raw response object, for fields the session does not interpret.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Extract the checkout identifier by trying each alias in order.
    ///
    /// Returns `None` when no alias maps to a non-empty string.
    #[must_use]
    pub fn checkout_id(&self) -> Option<&str> {
        CHECKOUT_ID_ALIASES
            .iter()
            .filter_map(|alias| self.raw.get(alias))
            .filter_map(Value::as_str)
            .find(|id| !id.is_empty())
    }
}

/// Fields for a partial checkout update.
///
/// Only fields actually set are sent; absent fields must not overwrite
/// previously-set remote values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CheckoutUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_accepts_terms_conditions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_accepts_purchase_conditions: Option<bool>,
}
