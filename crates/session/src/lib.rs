//! Session-scoped cart, checkout, and payment coordination.
//!
//! One [`CartSession`] per user session: it keeps a local cart model in
//! sync with the remote backend, falls back to deterministic local
//! mutations when calls fail, and coordinates shipping selection, discount
//! codes, market switches, catalog loads, and payment provider flows on
//! top of the cart.
//!
//! ```no_run
//! use seagrape_client::{ClientConfig, GraphqlCommerceClient};
//! use seagrape_core::Market;
//! use seagrape_session::{CartSession, SessionConfig};
//!
//! # async fn run() {
//! let client = GraphqlCommerceClient::new(&ClientConfig::new(
//!     "https://api.example.com/graphql",
//!     "api-key",
//! ));
//! let norway = Market::new("NO", "Norway", "NOK", "kr", "+47");
//! let mut session = CartSession::new(client, SessionConfig::new(norway, "myapp"));
//!
//! session.load_markets_if_needed().await;
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod catalog;
mod checkout;
mod config;
mod discount;
mod engine;
mod market;
mod payment;
mod reconcile;
mod return_url;
mod shipping;
mod state;
#[cfg(test)]
mod testing;

pub use catalog::{CatalogRequest, Generation};
pub use config::SessionConfig;
pub use engine::{CartNotice, CartSession, MutationOutcome};
pub use state::{CartState, LineItem, ShippingOption};
