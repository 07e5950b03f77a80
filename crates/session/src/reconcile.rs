//! Authoritative payload reconciliation.
//!
//! Whenever a remote call returns a full cart snapshot, local state is
//! replaced wholesale rather than merged. The only local data that survives
//! is the pending shipping map, whose entries are re-applied on top of the
//! rebuilt items so an uncommitted user choice is never clobbered by a
//! concurrent refresh.

use seagrape_client::payloads::{
    AvailableShippingPayload, CartPayload, ImagePayload, LineItemPayload,
};
use seagrape_core::decimal_from_wire;

use crate::state::{CartState, LineItem, ShippingOption};

/// Replace `state` from an authoritative cart snapshot.
pub(crate) fn reconcile(state: &mut CartState, payload: &CartPayload) {
    state.cart_id = Some(payload.cart_id.clone());
    state.currency = payload.currency.clone();
    if let Some(country) = &payload.shipping_country {
        state.country = country.clone();
    }

    state.items = payload.line_items.iter().map(line_item_from_payload).collect();

    for item in &mut state.items {
        if let Some(option) = state.pending_shipping.get(&item.id) {
            item.select_shipping(option);
        }
    }

    state.recompute_totals();

    if let Some(market) = state.selected_market.clone() {
        state.apply_market_display(&market);
    }
}

fn line_item_from_payload(line: &LineItemPayload) -> LineItem {
    let mut item = LineItem {
        id: line.id.clone(),
        product_id: line.product_id,
        variant_id: line.variant_id,
        title: line.title.clone().unwrap_or_default(),
        brand: line.brand.clone(),
        image_url: line.image.as_deref().and_then(primary_image_url),
        sku: line.sku.clone(),
        supplier: line.supplier.clone(),
        price: decimal_from_wire(line.price.effective_amount()),
        currency: line.price.currency_code.clone(),
        quantity: line.quantity,
        shipping_id: None,
        shipping_name: None,
        shipping_amount: None,
        shipping_currency: None,
        available_shippings: line
            .available_shippings
            .as_deref()
            .map(shipping_options_from_payloads)
            .unwrap_or_default(),
    };

    if let Some(shipping) = &line.shipping {
        item.shipping_id = Some(shipping.id.clone());
        item.shipping_name = Some(shipping.name.clone());
        item.shipping_amount = Some(decimal_from_wire(shipping.price.effective_amount()));
        item.shipping_currency = shipping.price.currency_code.clone();
    }

    item
}

/// First image by ascending explicit order, default 0 when unspecified.
fn primary_image_url(images: &[ImagePayload]) -> Option<String> {
    images
        .iter()
        .min_by_key(|image| image.order.unwrap_or(0))
        .map(|image| image.url.clone())
}

/// Options without an id or name are unusable and dropped.
pub(crate) fn shipping_options_from_payloads(
    payloads: &[AvailableShippingPayload],
) -> Vec<ShippingOption> {
    payloads
        .iter()
        .filter_map(|payload| {
            let id = payload.id.clone()?;
            let name = payload.name.clone()?;
            Some(ShippingOption {
                id,
                name,
                description: payload.description.clone(),
                amount: decimal_from_wire(payload.price.effective_amount()),
                currency: payload.price.currency_code.clone().unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use seagrape_core::Market;
    use serde_json::json;

    fn state() -> CartState {
        CartState::new(&Market::new("US", "United States", "USD", "$", "+1"))
    }

    fn payload(value: serde_json::Value) -> CartPayload {
        serde_json::from_value(value).expect("cart payload")
    }

    #[test]
    fn rebuilds_items_and_totals() {
        let mut state = state();
        let payload = payload(json!({
            "cart_id": "c-1",
            "currency": "USD",
            "shipping_country": "US",
            "line_items": [{
                "id": "li-1",
                "product_id": 1,
                "quantity": 2,
                "price": { "amount": 10.0, "currency_code": "USD" }
            }]
        }));

        reconcile(&mut state, &payload);

        assert_eq!(state.cart_id.as_deref(), Some("c-1"));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.cart_total, Decimal::new(2000, 2));
        assert_eq!(state.shipping_total, Decimal::ZERO);
    }

    #[test]
    fn picks_lowest_ordered_image() {
        let mut state = state();
        let payload = payload(json!({
            "cart_id": "c-1",
            "currency": "USD",
            "line_items": [{
                "id": "li-1",
                "product_id": 1,
                "quantity": 1,
                "price": { "amount": 1.0 },
                "image": [
                    { "url": "https://img/third", "order": 2 },
                    { "url": "https://img/first" },
                    { "url": "https://img/second", "order": 1 }
                ]
            }]
        }));

        reconcile(&mut state, &payload);

        assert_eq!(state.items[0].image_url.as_deref(), Some("https://img/first"));
    }

    #[test]
    fn tax_inclusive_zero_wins_over_base_amount() {
        let mut state = state();
        let payload = payload(json!({
            "cart_id": "c-1",
            "currency": "USD",
            "line_items": [{
                "id": "li-1",
                "product_id": 1,
                "quantity": 3,
                "price": { "amount": 9.99, "amount_incl_taxes": 0.0 }
            }]
        }));

        reconcile(&mut state, &payload);

        assert_eq!(state.items[0].price, Decimal::ZERO);
        assert_eq!(state.cart_total, Decimal::ZERO);
    }

    #[test]
    fn pending_selection_overrides_server_shipping() {
        let mut state = state();
        state.pending_shipping.insert(
            "li-1".to_string(),
            ShippingOption {
                id: "ship-local".to_string(),
                name: "Express".to_string(),
                description: None,
                amount: Decimal::new(900, 2),
                currency: "USD".to_string(),
            },
        );
        let payload = payload(json!({
            "cart_id": "c-1",
            "currency": "USD",
            "line_items": [{
                "id": "li-1",
                "product_id": 1,
                "quantity": 1,
                "price": { "amount": 10.0 },
                "shipping": {
                    "id": "ship-remote",
                    "name": "Standard",
                    "price": { "amount": 3.0, "currency_code": "USD" }
                }
            }]
        }));

        reconcile(&mut state, &payload);

        assert_eq!(state.items[0].shipping_id.as_deref(), Some("ship-local"));
        assert_eq!(state.shipping_total, Decimal::new(900, 2));
    }

    #[test]
    fn options_without_id_are_dropped() {
        let options = shipping_options_from_payloads(&[
            AvailableShippingPayload {
                id: Some("s-1".to_string()),
                name: Some("Standard".to_string()),
                ..AvailableShippingPayload::default()
            },
            AvailableShippingPayload {
                name: Some("No id".to_string()),
                ..AvailableShippingPayload::default()
            },
        ]);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].id, "s-1");
    }
}
