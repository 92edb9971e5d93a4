//! Urban Vibe storefront library.
//!
//! Cart manager, simulated checkout, and the demo HTTP surface, exposed as a
//! library so the CLI and integration tests can drive them directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod persistence;
pub mod routes;
pub mod shop;
pub mod state;
