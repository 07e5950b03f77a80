//! Cart and line-item payloads.

use seagrape_core::TaxedAmount;
use serde::{Deserialize, Serialize};

/// The authoritative cart snapshot returned by every cart mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPayload {
    pub cart_id: String,
    #[serde(default)]
    pub customer_session_id: Option<String>,
    pub currency: String,
    #[serde(default)]
    pub shipping_country: Option<String>,
    #[serde(default)]
    pub available_shipping_countries: Vec<String>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub shipping: f64,
    #[serde(default)]
    pub line_items: Vec<LineItemPayload>,
}

/// A line item inside a cart payload or a supplier group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemPayload {
    pub id: String,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub image: Option<Vec<ImagePayload>>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub product_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub variant_id: Option<i64>,
    #[serde(default)]
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub price: PricePayload,
    #[serde(default)]
    pub shipping: Option<ShippingPayload>,
    #[serde(default)]
    pub available_shippings: Option<Vec<AvailableShippingPayload>>,
}

/// Product price block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PricePayload {
    pub amount: f64,
    #[serde(default)]
    pub currency_code: String,
    #[serde(default)]
    pub amount_incl_taxes: Option<f64>,
    #[serde(default)]
    pub tax_amount: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub compare_at: Option<f64>,
}

impl PricePayload {
    /// The amount the customer pays: tax-inclusive when present (explicit
    /// zero included), base amount otherwise.
    #[must_use]
    pub fn effective_amount(&self) -> f64 {
        TaxedAmount::new(Some(self.amount), self.amount_incl_taxes).effective_or_zero()
    }
}

/// The shipping option currently selected on a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: ShippingPricePayload,
}

/// Price of a selected shipping option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShippingPricePayload {
    pub amount: f64,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub amount_incl_taxes: Option<f64>,
    #[serde(default)]
    pub tax_amount: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
}

impl ShippingPricePayload {
    /// See [`PricePayload::effective_amount`].
    #[must_use]
    pub fn effective_amount(&self) -> f64 {
        TaxedAmount::new(Some(self.amount), self.amount_incl_taxes).effective_or_zero()
    }
}

/// A shipping option valid for a line item's supplier group.
///
/// Everything is optional on the wire; options without an id are unusable
/// and get filtered out during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AvailableShippingPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub price: AvailableShippingPricePayload,
}

/// Price of an available (not yet selected) shipping option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AvailableShippingPricePayload {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub amount_incl_taxes: Option<f64>,
}

impl AvailableShippingPricePayload {
    /// See [`PricePayload::effective_amount`].
    #[must_use]
    pub fn effective_amount(&self) -> f64 {
        TaxedAmount::new(self.amount, self.amount_incl_taxes).effective_or_zero()
    }
}

/// A product image attached to a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Line items grouped by fulfilling supplier, with the group's options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SupplierGroupPayload {
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItemPayload>,
    #[serde(default)]
    pub available_shippings: Option<Vec<AvailableShippingPayload>>,
}

/// Input for the add-line-item mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<i64>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_data: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cart_payload_tolerates_missing_optionals() {
        let payload: CartPayload = serde_json::from_value(json!({
            "cart_id": "c-1",
            "currency": "USD",
            "line_items": [{
                "id": "li-1",
                "product_id": 42,
                "quantity": 2,
                "price": { "amount": 10.0, "currency_code": "USD" }
            }]
        }))
        .expect("minimal cart payload");
        assert_eq!(payload.line_items.len(), 1);
        assert!(payload.shipping_country.is_none());
        assert_eq!(payload.subtotal, 0.0);
    }

    #[test]
    fn effective_amount_prefers_explicit_zero() {
        let price = PricePayload {
            amount: 4.99,
            amount_incl_taxes: Some(0.0),
            ..PricePayload::default()
        };
        assert_eq!(price.effective_amount(), 0.0);

        let price = PricePayload {
            amount: 4.99,
            ..PricePayload::default()
        };
        assert_eq!(price.effective_amount(), 4.99);
    }

    #[test]
    fn line_item_input_omits_absent_fields() {
        let input = LineItemInput {
            product_id: 7,
            variant_id: None,
            quantity: 1,
            price_data: None,
        };
        let value = serde_json::to_value(&input).expect("serialize");
        assert_eq!(value, json!({ "product_id": 7, "quantity": 1 }));
    }
}
