//! Integration tests for Urban Vibe.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`,
//! so no server needs to be running.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p urban-vibe-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Cart invariants over operation sequences
//! - `file_persistence` - Reloading state from the data directory
//! - `http_routes` - Cart, checkout, and theme endpoints
