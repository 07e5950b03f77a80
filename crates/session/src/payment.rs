//! Payment provider orchestration.
//!
//! Three independent provider families sit behind one rule: a checkout id
//! must exist (and is created lazily) before any provider call. Every
//! operation converts a failure into `error_message` plus a `None` return,
//! never a partially populated result.

use seagrape_client::payloads::{
    KlarnaInitPayload, KlarnaNativeConfirmInput, KlarnaNativeConfirmPayload,
    KlarnaNativeInitInput, KlarnaNativeInitPayload, KlarnaNativeOrderPayload,
    StripeIntentPayload, StripeLinkPayload, VippsInitPayload,
};
use seagrape_client::CommerceBackend;
use seagrape_core::PaymentStatus;
use tracing::{debug, warn};

use crate::engine::CartSession;

impl<B: CommerceBackend> CartSession<B> {
    /// Start a redirect-style Klarna payment.
    pub async fn klarna_init(
        &mut self,
        country_code: &str,
        href: &str,
        email: Option<&str>,
    ) -> Option<KlarnaInitPayload> {
        let checkout_id = self.ensure_checkout().await?;
        match self
            .backend
            .payment_klarna_init(&checkout_id, country_code, href, email)
            .await
        {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "klarna init failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Start an in-app Klarna session. The backend may rotate the checkout
    /// id during init; the returned id is written back onto the session so
    /// the follow-up confirm call targets the right checkout.
    pub async fn klarna_native_init(
        &mut self,
        input: &KlarnaNativeInitInput,
    ) -> Option<KlarnaNativeInitPayload> {
        let checkout_id = self.ensure_checkout().await?;
        match self
            .backend
            .payment_klarna_native_init(&checkout_id, input)
            .await
        {
            Ok(payload) => {
                if !payload.checkout_id.is_empty() {
                    self.state.checkout_id = Some(payload.checkout_id.clone());
                }
                Some(payload)
            }
            Err(err) => {
                warn!(error = %err, "klarna native init failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Confirm an authorized in-app Klarna session.
    pub async fn klarna_native_confirm(
        &mut self,
        input: &KlarnaNativeConfirmInput,
    ) -> Option<KlarnaNativeConfirmPayload> {
        let checkout_id = self.ensure_checkout().await?;
        match self
            .backend
            .payment_klarna_native_confirm(&checkout_id, input)
            .await
        {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "klarna native confirm failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Poll an in-app Klarna order's status.
    pub async fn klarna_native_order(
        &mut self,
        order_id: &str,
        user_id: Option<&str>,
    ) -> Option<KlarnaNativeOrderPayload> {
        self.ensure_checkout().await?;
        match self.backend.payment_klarna_native_order(order_id, user_id).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "klarna order poll failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Create a Stripe payment intent for an embedded payment sheet.
    pub async fn stripe_intent(
        &mut self,
        return_ephemeral_key: Option<bool>,
    ) -> Option<StripeIntentPayload> {
        let checkout_id = self.ensure_checkout().await?;
        match self
            .backend
            .payment_stripe_intent(&checkout_id, return_ephemeral_key)
            .await
        {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "stripe intent failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Create a hosted Stripe payment link.
    pub async fn stripe_link(
        &mut self,
        success_url: &str,
        payment_method: &str,
        email: &str,
    ) -> Option<StripeLinkPayload> {
        let checkout_id = self.ensure_checkout().await?;
        match self
            .backend
            .payment_stripe_link(&checkout_id, success_url, payment_method, email)
            .await
        {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "stripe link failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Start a Vipps redirect payment. On success the checkout id is
    /// tracked so the return-URL hook can match the completion against it,
    /// and the observable status flips to in-progress.
    pub async fn vipps_init(
        &mut self,
        email: &str,
        return_url: &str,
    ) -> Option<VippsInitPayload> {
        let checkout_id = self.ensure_checkout().await?;
        match self
            .backend
            .payment_vipps_init(&checkout_id, email, return_url)
            .await
        {
            Ok(payload) => {
                debug!(checkout_id = %checkout_id, "vipps payment in progress");
                self.vipps_in_flight = Some(checkout_id);
                self.payment_status = PaymentStatus::InProgress;
                Some(payload)
            }
            Err(err) => {
                warn!(error = %err, "vipps init failed");
                self.state.error_message = Some(err.to_string());
                None
            }
        }
    }
}
