//! Typed adapter between the cart manager and a persistence slot.

use std::collections::HashSet;

use thiserror::Error;
use urban_vibe_core::{LineItem, Theme};

use super::{PersistenceSlot, SlotError, keys};

/// Failure to durably save state.
///
/// In-memory state stays authoritative when this is returned.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The slot backend refused the write.
    #[error("failed to save {key}: {source}")]
    Slot {
        key: &'static str,
        #[source]
        source: SlotError,
    },

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reason a stored cart snapshot was discarded.
#[derive(Debug, Error)]
enum SnapshotError {
    #[error("unreadable: {0}")]
    Read(#[from] SlotError),
    #[error("unparseable: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate item name {0:?}")]
    DuplicateName(String),
}

/// Reads and writes cart and theme state through a [`PersistenceSlot`].
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    slot: S,
}

impl<S: PersistenceSlot> CartStore<S> {
    /// Wrap a slot backend.
    pub const fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Get a reference to the underlying slot.
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// Load the persisted cart.
    ///
    /// Never fails: a missing snapshot yields an empty cart, and an unreadable,
    /// unparseable, or inconsistent one is logged and also yields an empty cart.
    pub fn load(&self) -> Vec<LineItem> {
        match self.try_load() {
            Ok(Some(items)) => {
                tracing::debug!(items = items.len(), "cart restored");
                items
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, key = keys::CART, "discarding stored cart");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Vec<LineItem>>, SnapshotError> {
        let Some(raw) = self.slot.read(keys::CART)? else {
            return Ok(None);
        };
        let items: Vec<LineItem> = serde_json::from_str(&raw)?;

        if let Some(name) = first_duplicate(&items) {
            return Err(SnapshotError::DuplicateName(name));
        }

        Ok(Some(items))
    }

    /// Persist the cart.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if serialization or the slot write fails.
    pub fn save(&self, items: &[LineItem]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(items)?;
        self.slot
            .write(keys::CART, &raw)
            .map_err(|source| PersistenceError::Slot {
                key: keys::CART,
                source,
            })
    }

    /// Load the theme preference, falling back to the default.
    pub fn load_theme(&self) -> Theme {
        match self.slot.read(keys::THEME) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, key = keys::THEME, "ignoring stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(error = %e, key = keys::THEME, "theme slot unreadable");
                Theme::default()
            }
        }
    }

    /// Persist the theme preference.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the slot write fails.
    pub fn save_theme(&self, theme: Theme) -> Result<(), PersistenceError> {
        self.slot
            .write(keys::THEME, theme.as_str())
            .map_err(|source| PersistenceError::Slot {
                key: keys::THEME,
                source,
            })
    }
}

/// First name that appears more than once.
fn first_duplicate(items: &[LineItem]) -> Option<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .find(|item| !seen.insert(item.name.as_str()))
        .map(|item| item.name.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::MemorySlot;
    use urban_vibe_core::Price;

    fn store() -> (CartStore<MemorySlot>, MemorySlot) {
        let slot = MemorySlot::new();
        (CartStore::new(slot.clone()), slot)
    }

    fn item(name: &str, price: &str) -> LineItem {
        LineItem::new(name, format!("img/{name}.jpg"), Price::parse(price).unwrap())
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (store, _) = store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let (store, _) = store();
        let mut second = item("Hoodie B", "20");
        second.quantity = std::num::NonZeroU32::new(3).unwrap();
        let items = vec![item("Hoodie A", "49.99"), second];

        store.save(&items).unwrap();
        assert_eq!(store.load(), items);
    }

    #[test]
    fn test_save_then_load_preserves_precise_prices() {
        let (store, _) = store();
        let items = vec![
            item("A", "999999999.999999"),
            item("B", "0.004999"),
            item("C", "123.456789"),
            item("D", "0.000001"),
        ];

        store.save(&items).unwrap();
        let loaded = store.load();
        assert_eq!(loaded, items);

        let subtotal = |items: &[LineItem]| -> Price {
            items.iter().map(LineItem::line_total).sum::<Price>().to_cents()
        };
        assert_eq!(subtotal(&loaded), subtotal(&items));
    }

    #[test]
    fn test_prices_beyond_float_precision_are_rejected() {
        assert!(Price::parse("123456789.123456789").is_err());
        assert!(Price::parse("0.0049999999999999999").is_err());
    }

    #[test]
    fn test_load_rounds_browser_float_artefacts() {
        let (store, slot) = store();
        slot.seed(
            "uv_cart",
            r#"[{"name":"A","img":"a.jpg","price":0.30000000000000004,"qty":1}]"#,
        );
        let items = store.load();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, Price::parse("0.3").unwrap());
    }

    #[test]
    fn test_load_reads_browser_format() {
        let (store, slot) = store();
        slot.seed(
            "uv_cart",
            r#"[{"name":"Hoodie A","img":"a.jpg","price":49.99,"qty":2}]"#,
        );
        let items = store.load();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity.get(), 2);
        assert_eq!(items[0].line_total().to_string(), "$99.98");
    }

    #[test]
    fn test_load_garbage_is_empty() {
        let (store, slot) = store();
        slot.seed("uv_cart", "{not json");
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_nan_price_is_empty() {
        // JSON.stringify(NaN) writes null
        let (store, slot) = store();
        slot.seed(
            "uv_cart",
            r#"[{"name":"Hoodie A","img":"a.jpg","price":null,"qty":1}]"#,
        );
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_duplicate_names_is_empty() {
        let (store, slot) = store();
        slot.seed(
            "uv_cart",
            r#"[{"name":"A","img":"","price":1,"qty":1},{"name":"A","img":"","price":1,"qty":1}]"#,
        );
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_quota_exceeded() {
        let slot = MemorySlot::with_quota(16);
        let store = CartStore::new(slot);
        let err = store.save(&[item("Hoodie A", "49.99")]).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Slot {
                source: SlotError::QuotaExceeded { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_theme_round_trip() {
        let (store, slot) = store();
        assert_eq!(store.load_theme(), Theme::Dark);

        store.save_theme(Theme::Light).unwrap();
        assert_eq!(slot.get("uv_theme").as_deref(), Some("light"));
        assert_eq!(store.load_theme(), Theme::Light);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let (store, slot) = store();
        slot.seed("uv_theme", "sepia");
        assert_eq!(store.load_theme(), Theme::Dark);
    }
}
