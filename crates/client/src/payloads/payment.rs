//! Payment provider payloads and inputs.
//!
//! Three provider families with distinct shapes: Klarna (redirect), Klarna
//! native (init/confirm/poll), Stripe (intent or hosted link), and Vipps
//! (redirect with return-URL completion).

use serde::{Deserialize, Serialize};

// =============================================================================
// Klarna (redirect-style)
// =============================================================================

/// Descriptor for a redirect-style Klarna session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlarnaInitPayload {
    pub order_id: String,
    pub status: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub html_snippet: Option<String>,
}

// =============================================================================
// Klarna Native (in-app)
// =============================================================================

/// A Klarna payment method category (e.g., pay-later, pay-now).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentMethodCategoryPayload {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Result of initializing an in-app Klarna session.
///
/// The backend may re-issue the checkout id here; the session writes it back
/// onto its state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlarnaNativeInitPayload {
    pub session_id: String,
    pub checkout_id: String,
    #[serde(default)]
    pub cart_id: Option<String>,
    #[serde(default)]
    pub client_token: Option<String>,
    #[serde(default)]
    pub purchase_country: Option<String>,
    #[serde(default)]
    pub purchase_currency: Option<String>,
    #[serde(default)]
    pub payment_method_categories: Vec<PaymentMethodCategoryPayload>,
}

/// Result of confirming an in-app Klarna authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlarnaNativeConfirmPayload {
    pub order_id: String,
    #[serde(default)]
    pub checkout_id: Option<String>,
    #[serde(default)]
    pub fraud_status: Option<String>,
}

/// A purchased line on a Klarna native order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KlarnaOrderLinePayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
}

/// Status snapshot of a Klarna native order (polled after confirm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlarnaNativeOrderPayload {
    pub order_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub purchase_country: Option<String>,
    #[serde(default)]
    pub purchase_currency: Option<String>,
    #[serde(default)]
    pub order_amount: Option<f64>,
    #[serde(default)]
    pub order_tax_amount: Option<f64>,
    #[serde(default)]
    pub order_lines: Vec<KlarnaOrderLinePayload>,
    #[serde(default)]
    pub payment_method_categories: Vec<PaymentMethodCategoryPayload>,
}

/// Customer block for Klarna native init/confirm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KlarnaNativeCustomerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

/// Address block for Klarna native init/confirm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KlarnaNativeAddressInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Input for Klarna native session init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KlarnaNativeInitInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_capture: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<KlarnaNativeCustomerInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<KlarnaNativeAddressInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<KlarnaNativeAddressInput>,
}

/// Input for confirming a Klarna native authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KlarnaNativeConfirmInput {
    pub authorization_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_capture: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<KlarnaNativeCustomerInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<KlarnaNativeAddressInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<KlarnaNativeAddressInput>,
}

// =============================================================================
// Stripe
// =============================================================================

/// Client secret bundle for an embedded Stripe payment sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeIntentPayload {
    pub client_secret: String,
    pub customer: String,
    pub publishable_key: String,
    #[serde(default)]
    pub ephemeral_key: Option<String>,
}

/// Hosted-link descriptor for the Stripe checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeLinkPayload {
    pub checkout_url: String,
    pub order_id: i64,
}

// =============================================================================
// Vipps
// =============================================================================

/// Redirect descriptor for a Vipps payment; completion arrives via the
/// return-URL hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VippsInitPayload {
    pub payment_url: String,
}
