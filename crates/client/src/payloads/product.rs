//! Catalog product payloads.

use serde::{Deserialize, Serialize};

use super::cart::{ImagePayload, PricePayload};

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantPayload {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<PricePayload>,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    pub price: PricePayload,
    #[serde(default)]
    pub variants: Vec<VariantPayload>,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default)]
    pub digital: Option<bool>,
}

/// Parameters for a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// ISO 4217 currency to price in.
    pub currency: String,
    /// ISO 3166-1 country products must ship to.
    pub shipping_country: String,
    /// Image size variant to return (e.g., "large").
    pub image_size: String,
    /// Whether the backend may serve its cached catalog.
    pub use_cache: bool,
}
