//! Shipping aggregation and per-line selection.

use seagrape_client::payloads::SupplierGroupPayload;
use seagrape_client::CommerceBackend;
use seagrape_core::decimal_from_wire;
use tracing::{debug, warn};

use crate::engine::CartSession;
use crate::reconcile::{reconcile, shipping_options_from_payloads};

impl<B: CommerceBackend> CartSession<B> {
    /// Fetch line items grouped by supplier and attach each group's shipping
    /// options to the matching cart lines. Never propagates the failure; on
    /// error the state is left unchanged and false is returned.
    pub async fn refresh_shipping_options(&mut self) -> bool {
        let Some(cart_id) = self.ensure_cart().await else {
            return false;
        };
        match self.backend.cart_line_items_by_supplier(&cart_id).await {
            Ok(groups) => {
                self.apply_supplier_groups(&groups);
                true
            }
            Err(err) => {
                warn!(error = %err, "shipping refresh failed");
                self.state.error_message = Some(err.to_string());
                false
            }
        }
    }

    /// Merge supplier-group shipping data into the current items. A pending
    /// local selection always overrides the server-reported selection until
    /// it is committed or cleared.
    fn apply_supplier_groups(&mut self, groups: &[SupplierGroupPayload]) {
        for group in groups {
            let group_options = group
                .available_shippings
                .as_deref()
                .map(shipping_options_from_payloads);

            for line in &group.line_items {
                let Some(item) = self.state.items.iter_mut().find(|item| item.id == line.id)
                else {
                    continue;
                };

                item.available_shippings = line
                    .available_shippings
                    .as_deref()
                    .map(shipping_options_from_payloads)
                    .or_else(|| group_options.clone())
                    .unwrap_or_default();

                if let Some(pending) = self.state.pending_shipping.get(&line.id) {
                    item.select_shipping(pending);
                } else if let Some(shipping) = &line.shipping {
                    item.shipping_id = Some(shipping.id.clone());
                    item.shipping_name = Some(shipping.name.clone());
                    item.shipping_amount =
                        Some(decimal_from_wire(shipping.price.effective_amount()));
                    item.shipping_currency = shipping.price.currency_code.clone();
                }
            }
        }
        self.state.recompute_totals();
    }

    /// Select a shipping option for one line. Purely local: the option is
    /// written onto the item, recorded as pending, and the shipping total is
    /// recomputed optimistically. Nothing is sent to the backend until
    /// [`Self::commit_pending_shipping`].
    pub fn set_shipping_option(&mut self, item_id: &str, option_id: &str) -> bool {
        let Some(item) = self.state.items.iter_mut().find(|item| item.id == item_id) else {
            return false;
        };
        let Some(option) = item
            .available_shippings
            .iter()
            .find(|option| option.id == option_id)
            .cloned()
        else {
            return false;
        };
        item.select_shipping(&option);
        self.state
            .pending_shipping
            .insert(item_id.to_string(), option);
        self.state.recompute_totals();
        true
    }

    /// Commit every pending per-line shipping selection to the backend, one
    /// update call per line. Calls are independent: a failure leaves that
    /// line pending for retry without blocking the rest. Returns the number
    /// of lines updated remotely.
    pub async fn commit_pending_shipping(&mut self) -> usize {
        let Some(cart_id) = self.ensure_cart().await else {
            return 0;
        };
        let pending: Vec<(String, String)> = self
            .state
            .pending_shipping
            .iter()
            .map(|(item_id, option)| (item_id.clone(), option.id.clone()))
            .collect();
        if pending.is_empty() {
            return 0;
        }

        let mut updated = 0;
        let mut last_payload = None;
        for (item_id, shipping_id) in pending {
            match self
                .backend
                .cart_update_item(&cart_id, &item_id, Some(&shipping_id), None)
                .await
            {
                Ok(payload) => {
                    updated += 1;
                    self.state.pending_shipping.remove(&item_id);
                    last_payload = Some(payload);
                }
                Err(err) => {
                    warn!(error = %err, item_id = %item_id, "shipping commit failed, left pending");
                    self.state.error_message = Some(err.to_string());
                }
            }
        }

        // The backend returns the full cart on each update, so the last
        // successful payload is the freshest authoritative snapshot.
        if let Some(payload) = last_payload {
            reconcile(&mut self.state, &payload);
        } else {
            self.state.recompute_totals();
        }
        debug!(updated, "committed pending shipping selections");
        updated
    }
}
