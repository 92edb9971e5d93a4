//! Local persistence for cart and theme state.
//!
//! # Slots
//!
//! State is kept in string-keyed slots, the same shape as browser local
//! storage:
//!
//! - `uv_cart` - JSON array of `{name, img, price, qty}` records
//! - `uv_theme` - `light` or `dark`
//!
//! [`PersistenceSlot`] abstracts the backend. [`MemorySlot`] keeps values in
//! process (tests, quota simulation) and [`FileSlot`] writes one file per key.
//! [`CartStore`] is the typed adapter the cart manager talks to.

use std::sync::Arc;

use thiserror::Error;

pub mod file;
pub mod memory;
pub mod store;

pub use file::FileSlot;
pub use memory::MemorySlot;
pub use store::{CartStore, PersistenceError};

/// Slot keys.
pub mod keys {
    /// Key for the serialized cart snapshot.
    pub const CART: &str = "uv_cart";

    /// Key for the theme preference.
    pub const THEME: &str = "uv_theme";
}

/// Errors raised by a slot backend.
#[derive(Debug, Error)]
pub enum SlotError {
    /// Key contains characters outside `[a-z0-9_]`.
    #[error("invalid slot key: {0:?}")]
    InvalidKey(String),

    /// Writing the value would exceed the backend's quota.
    #[error("quota exceeded writing {key} ({needed} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// Filesystem operation failed.
    #[error("io error on slot {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend is unusable (e.g. a poisoned lock).
    #[error("slot backend unavailable: {0}")]
    Unavailable(String),
}

/// A string-keyed durable storage location.
pub trait PersistenceSlot: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns `SlotError` if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `SlotError` if the value could not be stored durably.
    fn write(&self, key: &str, value: &str) -> Result<(), SlotError>;
}

impl<T: PersistenceSlot + ?Sized> PersistenceSlot for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        (**self).write(key, value)
    }
}

impl<T: PersistenceSlot + ?Sized> PersistenceSlot for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        (**self).write(key, value)
    }
}

/// Type-erased slot shared by the server state.
pub type SharedSlot = Arc<dyn PersistenceSlot>;

/// Validate a slot key.
pub(crate) fn validate_key(key: &str) -> Result<(), SlotError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(SlotError::InvalidKey(key.to_owned()))
    }
}
