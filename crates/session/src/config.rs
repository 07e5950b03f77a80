//! Session-level configuration.

use seagrape_core::Market;

/// Static configuration for a [`crate::CartSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Market used before the market list loads, and as the fallback when
    /// the backend reports no markets.
    pub default_market: Market,
    /// URL scheme registered for payment return deep links.
    pub url_scheme: String,
    /// Image size variant requested from the catalog.
    pub image_size: String,
}

impl SessionConfig {
    #[must_use]
    pub fn new(default_market: Market, url_scheme: impl Into<String>) -> Self {
        Self {
            default_market,
            url_scheme: url_scheme.into(),
            image_size: "large".to_string(),
        }
    }

    #[must_use]
    pub fn with_image_size(mut self, image_size: impl Into<String>) -> Self {
        self.image_size = image_size.into();
        self
    }
}
