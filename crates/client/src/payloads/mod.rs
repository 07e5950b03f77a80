//! Wire payload types for the commerce backend.
//!
//! These mirror what the backend actually returns, field-for-field, with
//! `Option` wherever the backend may omit a value. Conversion into domain
//! types happens in the session crate; nothing here is interpreted beyond
//! tax-inclusive amount preference, which is part of the wire contract.

pub mod cart;
pub mod checkout;
pub mod discount;
pub mod market;
pub mod payment;
pub mod product;

pub use cart::{
    AvailableShippingPayload, AvailableShippingPricePayload, CartPayload, ImagePayload,
    LineItemInput, LineItemPayload, PricePayload, ShippingPayload, ShippingPricePayload,
    SupplierGroupPayload,
};
pub use checkout::{CHECKOUT_ID_ALIASES, CheckoutPayload, CheckoutUpdateInput};
pub use discount::{DiscountActionPayload, DiscountPayload};
pub use market::{CurrencyPayload, MarketPayload};
pub use payment::{
    KlarnaInitPayload, KlarnaNativeAddressInput, KlarnaNativeConfirmInput,
    KlarnaNativeConfirmPayload, KlarnaNativeCustomerInput, KlarnaNativeInitInput,
    KlarnaNativeInitPayload, KlarnaNativeOrderPayload, KlarnaOrderLinePayload,
    PaymentMethodCategoryPayload, StripeIntentPayload, StripeLinkPayload, VippsInitPayload,
};
pub use product::{ProductPayload, ProductQuery, VariantPayload};
