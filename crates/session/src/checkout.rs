//! Checkout creation and partial updates.

use seagrape_client::payloads::CheckoutUpdateInput;
use seagrape_client::CommerceBackend;
use tracing::warn;

use crate::engine::CartSession;

impl<B: CommerceBackend> CartSession<B> {
    /// Create a checkout for the current cart, lazily creating the cart
    /// first. The checkout id is extracted from the response by trying the
    /// known field-name aliases in order and stored on the session.
    pub async fn create_checkout(&mut self) -> Option<String> {
        let cart_id = self.ensure_cart().await?;
        match self.backend.checkout_create(&cart_id).await {
            Ok(payload) => match payload.checkout_id().map(str::to_string) {
                Some(checkout_id) => {
                    self.state.checkout_id = Some(checkout_id.clone());
                    self.state.error_message = None;
                    Some(checkout_id)
                }
                None => {
                    self.state.error_message =
                        Some("checkout response carried no id".to_string());
                    None
                }
            },
            Err(err) => {
                warn!(error = %err, "checkout creation failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Existing checkout id, creating one when absent.
    pub(crate) async fn ensure_checkout(&mut self) -> Option<String> {
        if let Some(checkout_id) = self.state.checkout_id.clone() {
            return Some(checkout_id);
        }
        self.create_checkout().await
    }

    /// Send a partial checkout update. Only the fields set on `input` are
    /// sent, so previously set remote values stay untouched. When no
    /// checkout id is given and none exists, one is created first. Returns
    /// the checkout id after the update, which the backend may have rotated.
    pub async fn update_checkout(
        &mut self,
        checkout_id: Option<&str>,
        input: &CheckoutUpdateInput,
    ) -> Option<String> {
        let checkout_id = match checkout_id {
            Some(id) => id.to_string(),
            None => self.ensure_checkout().await?,
        };
        match self.backend.checkout_update(&checkout_id, input).await {
            Ok(payload) => {
                // The backend may rotate the id during an update.
                let final_id = payload
                    .checkout_id()
                    .map_or(checkout_id, str::to_string);
                self.state.checkout_id = Some(final_id.clone());
                self.state.error_message = None;
                Some(final_id)
            }
            Err(err) => {
                warn!(error = %err, "checkout update failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }
}
