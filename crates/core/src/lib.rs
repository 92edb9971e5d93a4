//! Urban Vibe Core - Shared types library.
//!
//! This crate provides the domain types used across the Urban Vibe components:
//! - `storefront` - Cart manager, checkout flow, and the HTTP storefront
//! - `cli` - Command-line tools for inspecting persisted state
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no persistence,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Prices, line items, order details, and the theme preference

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
