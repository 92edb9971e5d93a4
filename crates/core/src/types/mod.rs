//! Core types for Urban Vibe.
//!
//! This module provides type-safe wrappers for the cart and checkout domain.

pub mod line_item;
pub mod order;
pub mod price;
pub mod theme;

pub use line_item::LineItem;
pub use order::{OrderConfirmation, OrderDetails, OrderReference};
pub use price::{Price, PriceError};
pub use theme::{Theme, ThemeError};
