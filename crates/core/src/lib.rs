//! Seagrape Core - Shared types library.
//!
//! This crate provides common types used across all Seagrape components:
//! - `client` - Typed client for the commerce backend
//! - `session` - Cart/checkout/payment synchronization engine
//!
//! # Architecture
//!
//! The core crate contains only types and small pure helpers - no I/O, no
//! HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Money, taxed amounts, markets, and payment status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
