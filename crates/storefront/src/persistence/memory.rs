//! In-process slot backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{PersistenceSlot, SlotError, validate_key};

/// Slot backend holding values in memory.
///
/// Clones share the same storage, so a test can hand one clone to a cart
/// manager and inspect what it persisted through another. An optional quota
/// caps the total stored bytes, mimicking a full browser storage area.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemorySlot {
    /// Create an empty slot with no quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty slot that refuses writes beyond `bytes` in total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let slot = Self::default();
        slot.set_quota(Some(bytes));
        slot
    }

    /// Change the quota. `None` removes it.
    pub fn set_quota(&self, bytes: Option<usize>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.quota = bytes;
        }
    }

    /// Store a raw value, bypassing the quota.
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.values.insert(key.to_owned(), value.to_owned());
        }
    }

    /// Raw value currently stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.values.get(key).cloned())
    }
}

impl PersistenceSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        validate_key(key)?;
        let inner = self
            .inner
            .lock()
            .map_err(|e| SlotError::Unavailable(e.to_string()))?;
        Ok(inner.values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        validate_key(key)?;
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| SlotError::Unavailable(e.to_string()))?;

        if let Some(limit) = inner.quota {
            let others: usize = inner
                .values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(SlotError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    limit,
                });
            }
        }

        inner.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing() {
        let slot = MemorySlot::new();
        assert!(slot.read("uv_cart").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let slot = MemorySlot::new();
        slot.write("uv_cart", "[]").unwrap();
        assert_eq!(slot.read("uv_cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_clones_share_storage() {
        let slot = MemorySlot::new();
        let observer = slot.clone();
        slot.write("uv_theme", "light").unwrap();
        assert_eq!(observer.get("uv_theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_quota_exceeded() {
        let slot = MemorySlot::with_quota(10);
        let err = slot.write("uv_cart", "[1,2,3,4,5]").unwrap_err();
        assert!(matches!(err, SlotError::QuotaExceeded { .. }));
        assert!(slot.get("uv_cart").is_none());
    }

    #[test]
    fn test_quota_counts_replacement_not_previous_value() {
        let slot = MemorySlot::with_quota(12);
        slot.write("uv_cart", "[1]").unwrap();
        slot.write("uv_cart", "[12]").unwrap();
        assert_eq!(slot.get("uv_cart").as_deref(), Some("[12]"));
    }

    #[test]
    fn test_invalid_key() {
        let slot = MemorySlot::new();
        assert!(matches!(
            slot.write("Bad Key", "x"),
            Err(SlotError::InvalidKey(_))
        ));
    }
}
