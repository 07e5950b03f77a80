//! Inbound payment return-URL handling.
//!
//! Return URLs arrive from the operating system and are untrusted input:
//! a URL only updates payment state when its scheme matches the configured
//! app scheme and its `payment_method` parameter names the expected
//! provider. The in-progress flag clears only when the returned checkout id
//! matches the one being tracked.

use seagrape_client::CommerceBackend;
use seagrape_core::PaymentStatus;
use tracing::debug;
use url::Url;

use crate::engine::CartSession;

impl<B: CommerceBackend> CartSession<B> {
    /// Whether `url` looks like a Vipps completion callback for this app.
    #[must_use]
    pub fn is_vipps_return_url(&self, url: &str) -> bool {
        Url::parse(url).is_ok_and(|parsed| {
            parsed.scheme() == self.config.url_scheme
                && parsed
                    .query_pairs()
                    .any(|(key, value)| key == "payment_method" && value == "vipps")
        })
    }

    /// Handle a payment completion callback. Returns the observable status
    /// after handling, or `None` when the URL was rejected. A callback
    /// without a `status` parameter leaves the previous status in place.
    pub fn handle_return_url(&mut self, url: &str) -> Option<PaymentStatus> {
        let parsed = Url::parse(url).ok()?;
        if parsed.scheme() != self.config.url_scheme {
            return None;
        }

        let mut checkout_id = None;
        let mut status_raw = None;
        let mut payment_method = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "checkout_id" => checkout_id = Some(value.into_owned()),
                "status" => status_raw = Some(value.into_owned()),
                "payment_method" => payment_method = Some(value.into_owned()),
                _ => {}
            }
        }

        if payment_method.as_deref() != Some("vipps") {
            return None;
        }

        if let Some(raw) = status_raw.as_deref() {
            self.payment_status = PaymentStatus::from_return_param(raw);
        }

        if let (Some(returned), Some(tracked)) = (&checkout_id, &self.vipps_in_flight)
            && returned == tracked
        {
            debug!(checkout_id = %returned, "vipps payment completed");
            self.vipps_in_flight = None;
        }

        Some(self.payment_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::testing::OfflineBackend;
    use seagrape_core::Market;

    fn session() -> CartSession<OfflineBackend> {
        let market = Market::new("NO", "Norway", "NOK", "kr", "+47");
        CartSession::new(OfflineBackend, SessionConfig::new(market, "seagrape"))
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        let mut session = session();
        let status = session
            .handle_return_url("https://host/return?payment_method=vipps&status=success");
        assert_eq!(status, None);
        assert_eq!(session.payment_status(), PaymentStatus::Unknown);
    }

    #[test]
    fn wrong_provider_is_rejected() {
        let mut session = session();
        let status = session.handle_return_url("seagrape://return?payment_method=klarna");
        assert_eq!(status, None);
    }

    #[test]
    fn status_updates_and_tracking_clears_on_id_match() {
        let mut session = session();
        session.vipps_in_flight = Some("chk-1".to_string());

        let status = session.handle_return_url(
            "seagrape://return?payment_method=vipps&status=success&checkout_id=chk-1",
        );

        assert_eq!(status, Some(PaymentStatus::Success));
        assert_eq!(session.payment_status(), PaymentStatus::Success);
        assert_eq!(session.vipps_in_flight, None);
    }

    #[test]
    fn mismatched_checkout_id_keeps_tracking() {
        let mut session = session();
        session.vipps_in_flight = Some("chk-1".to_string());

        let status = session.handle_return_url(
            "seagrape://return?payment_method=vipps&status=cancelled&checkout_id=chk-2",
        );

        assert_eq!(status, Some(PaymentStatus::Cancelled));
        assert_eq!(session.vipps_in_flight, Some("chk-1".to_string()));
    }

    #[test]
    fn missing_status_keeps_the_previous_status() {
        let mut session = session();
        session.payment_status = PaymentStatus::InProgress;

        let status = session.handle_return_url("seagrape://return?payment_method=vipps");

        assert_eq!(status, Some(PaymentStatus::InProgress));
        assert_eq!(session.payment_status(), PaymentStatus::InProgress);
    }

    #[test]
    fn vipps_url_detection() {
        let session = session();
        assert!(session.is_vipps_return_url("seagrape://return?payment_method=vipps"));
        assert!(!session.is_vipps_return_url("https://x/return?payment_method=vipps"));
        assert!(!session.is_vipps_return_url("not a url"));
    }
}
