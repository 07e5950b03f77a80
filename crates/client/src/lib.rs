//! GraphQL client for the commerce backend.
//!
//! Exposes [`CommerceBackend`], the async trait the session layer drives,
//! and [`GraphqlCommerceClient`], its HTTP implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod api;
mod client;
mod config;
mod error;
mod graphql;
mod operations;
pub mod payloads;

pub use api::CommerceBackend;
pub use client::GraphqlCommerceClient;
pub use config::{ClientConfig, ConfigError};
pub use error::CommerceError;
