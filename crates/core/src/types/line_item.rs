//! A single product entry in the cart.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// One product in the cart with its quantity.
///
/// The persisted field names (`img`, `qty`) match the `uv_cart` slot format.
/// `quantity` is a [`NonZeroU32`], so an item can never exist with zero units:
/// decrementing the last unit removes the item instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name, unique within a cart.
    pub name: String,
    /// Opaque reference to the product image.
    #[serde(rename = "img")]
    pub image_ref: String,
    /// Price of one unit.
    pub price: Price,
    /// Number of units.
    #[serde(rename = "qty")]
    pub quantity: NonZeroU32,
}

impl LineItem {
    /// Create a line item with a quantity of one.
    #[must_use]
    pub fn new(name: impl Into<String>, image_ref: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            image_ref: image_ref.into(),
            price,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Price of all units of this item.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity.get())
    }

    /// Add one unit. Returns `None` if the quantity would overflow.
    #[must_use]
    pub fn incremented(&self) -> Option<NonZeroU32> {
        self.quantity.checked_add(1)
    }

    /// Remove one unit. Returns `None` when the last unit is removed.
    #[must_use]
    pub const fn decremented(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.quantity.get() - 1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hoodie() -> LineItem {
        LineItem::new("Hoodie A", "img/hoodie-a.jpg", Price::parse("49.99").unwrap())
    }

    #[test]
    fn test_new_starts_at_one() {
        assert_eq!(hoodie().quantity.get(), 1);
    }

    #[test]
    fn test_line_total() {
        let mut item = hoodie();
        item.quantity = NonZeroU32::new(3).unwrap();
        assert_eq!(item.line_total().to_string(), "$149.97");
    }

    #[test]
    fn test_decrement_last_unit() {
        assert!(hoodie().decremented().is_none());
    }

    #[test]
    fn test_increment_overflow() {
        let mut item = hoodie();
        item.quantity = NonZeroU32::MAX;
        assert!(item.incremented().is_none());
    }

    #[test]
    fn test_persisted_field_names() {
        let json = serde_json::to_value(hoodie()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Hoodie A",
                "img": "img/hoodie-a.jpg",
                "price": 49.99,
                "qty": 1
            })
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let result = serde_json::from_str::<LineItem>(
            r#"{"name":"Hoodie A","img":"a.jpg","price":10,"qty":0}"#,
        );
        assert!(result.is_err());
    }
}
