//! Cart invariants checked over longer operation sequences.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use urban_vibe_core::{OrderDetails, Price};
use urban_vibe_storefront::cart::CartManager;
use urban_vibe_storefront::checkout::CheckoutState;
use urban_vibe_storefront::persistence::{CartStore, MemorySlot, keys};
use urban_vibe_storefront::shop::Shop;

fn manager() -> (MemorySlot, CartManager<MemorySlot>) {
    let slot = MemorySlot::new();
    let cart = CartManager::new(CartStore::new(slot.clone()));
    (slot, cart)
}

fn price(raw: &str) -> Price {
    Price::parse(raw).unwrap()
}

/// Subtotal recomputed from the items, rounded to cents.
fn expected_subtotal(cart: &CartManager<MemorySlot>) -> Price {
    cart.items()
        .iter()
        .map(urban_vibe_core::LineItem::line_total)
        .sum::<Price>()
        .to_cents()
}

#[test]
fn test_distinct_adds_count_once_each() {
    let (_, mut cart) = manager();
    for n in 0..25 {
        cart.add(&format!("Hoodie {n}"), "img.jpg", price("10")).unwrap();
        assert_eq!(cart.total_count(), n + 1);
        assert_eq!(cart.items().len(), usize::try_from(n + 1).unwrap());
    }
}

#[test]
fn test_repeated_adds_collapse_into_one_item() {
    let (_, mut cart) = manager();
    for n in 1..=12_u32 {
        cart.add("Hoodie A", "a.jpg", price("49.99")).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.get(), n);
    }
    assert_eq!(cart.total_count(), 12);
}

#[test]
fn test_subtotal_matches_items_across_mixed_operations() {
    let (_, mut cart) = manager();
    let prices = ["0.10", "0.20", "19.99", "0.333", "1000", "7.005"];

    for step in 0..60_usize {
        let name = format!("Item {}", step % prices.len());
        match step % 5 {
            0..=2 => cart.add(&name, "x.jpg", price(prices[step % prices.len()])).unwrap(),
            3 => {
                if !cart.items().is_empty() {
                    cart.decrease_quantity(step % cart.items().len()).unwrap();
                }
            }
            _ => {
                if !cart.items().is_empty() {
                    cart.increase_quantity(0).unwrap();
                }
            }
        }
        assert_eq!(cart.snapshot().subtotal, expected_subtotal(&cart));
        let counted: u64 = cart
            .items()
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum();
        assert_eq!(cart.total_count(), counted);
    }
}

#[test]
fn test_decrease_at_one_removes_exactly_that_item() {
    let (_, mut cart) = manager();
    cart.add("A", "a.jpg", price("1")).unwrap();
    cart.add("B", "b.jpg", price("2")).unwrap();
    cart.add("C", "c.jpg", price("3")).unwrap();

    cart.decrease_quantity(1).unwrap();

    let names: Vec<_> = cart.items().iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["A", "C"]);
}

#[test]
fn test_clear_resets_everything() {
    let (slot, mut cart) = manager();
    cart.add("A", "a.jpg", price("1")).unwrap();
    cart.add("B", "b.jpg", price("2")).unwrap();

    cart.clear().unwrap();

    assert!(cart.items().is_empty());
    assert_eq!(cart.total_count(), 0);
    assert_eq!(cart.subtotal().to_string(), "$0.00");
    assert_eq!(slot.get(keys::CART).as_deref(), Some("[]"));
}

#[test]
fn test_save_then_load_preserves_order_prices_and_quantities() {
    let (slot, mut cart) = manager();
    cart.add("Hoodie A", "a.jpg", price("49.99")).unwrap();
    cart.add("Cap", "cap.jpg", price("15.5")).unwrap();
    cart.add("Hoodie A", "a.jpg", price("49.99")).unwrap();
    cart.add("Socks", "socks.jpg", price("0.99")).unwrap();

    let reloaded = CartManager::new(CartStore::new(slot));
    assert_eq!(reloaded.items(), cart.items());
    assert_eq!(reloaded.subtotal(), cart.subtotal());
}

#[test]
fn test_empty_cart_checkout_stays_idle() {
    let mut shop = Shop::new(MemorySlot::new());
    shop.open_checkout().unwrap();
    assert_eq!(shop.checkout_state(), &CheckoutState::Idle);
}

#[test]
fn test_submitting_twenty_dollar_order_empties_persisted_cart() {
    let slot = MemorySlot::new();
    let mut shop = Shop::new(slot.clone());
    shop.add("Tee", "tee.jpg", "20.00").unwrap();
    shop.open_checkout().unwrap();
    assert_eq!(shop.checkout_state(), &CheckoutState::FormOpen);

    let details = OrderDetails::new()
        .with("name", "Ada")
        .with("email", "ada@example.com")
        .with("address", "1 Main St");
    let submitted = shop.submit_checkout(&details).unwrap();

    assert!(submitted.persistence.is_none());
    assert_eq!(submitted.confirmation.subtotal.to_string(), "$20.00");
    assert!(matches!(shop.checkout_state(), CheckoutState::Confirmed(_)));
    assert!(shop.items().is_empty());
    assert_eq!(slot.get(keys::CART).as_deref(), Some("[]"));
}
