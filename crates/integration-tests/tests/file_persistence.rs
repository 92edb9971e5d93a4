//! Cart and theme state surviving a restart through the file slot.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use urban_vibe_core::{Price, Theme};
use urban_vibe_storefront::cart::CartManager;
use urban_vibe_storefront::persistence::{CartStore, FileSlot, PersistenceSlot, keys};
use urban_vibe_storefront::shop::Shop;

#[test]
fn test_cart_reloads_from_data_dir() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut cart = CartManager::new(CartStore::new(FileSlot::new(dir.path())));
        cart.add("Hoodie A", "img/a.jpg", Price::parse("49.99").unwrap())
            .unwrap();
        cart.add("Hoodie A", "img/a.jpg", Price::parse("49.99").unwrap())
            .unwrap();
        cart.add("Cap", "img/cap.jpg", Price::parse("12").unwrap())
            .unwrap();
    }

    let cart = CartManager::new(CartStore::new(FileSlot::new(dir.path())));
    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.items()[0].name, "Hoodie A");
    assert_eq!(cart.items()[0].quantity.get(), 2);
    assert_eq!(cart.total_count(), 3);
    assert_eq!(cart.subtotal().to_string(), "$111.98");
}

#[test]
fn test_snapshot_file_uses_browser_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::new(dir.path());
    let mut cart = CartManager::new(CartStore::new(slot.clone()));
    cart.add("Hoodie A", "img/a.jpg", Price::parse("49.99").unwrap())
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join(keys::CART)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"name": "Hoodie A", "img": "img/a.jpg", "price": 49.99, "qty": 1}])
    );
    assert_eq!(slot.read(keys::CART).unwrap().as_deref(), Some(raw.as_str()));
}

#[test]
fn test_corrupt_file_loads_as_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(keys::CART), "{not json").unwrap();

    let mut cart = CartManager::new(CartStore::new(FileSlot::new(dir.path())));
    assert!(cart.items().is_empty());

    // The next mutation overwrites the corrupt snapshot
    cart.add("Tee", "tee.jpg", Price::parse("20").unwrap()).unwrap();
    let reloaded = CartManager::new(CartStore::new(FileSlot::new(dir.path())));
    assert_eq!(reloaded.items().len(), 1);
}

#[test]
fn test_theme_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut shop = Shop::new(FileSlot::new(dir.path()));
        assert_eq!(shop.theme(), Theme::Dark);
        shop.toggle_theme().unwrap();
    }

    let shop = Shop::new(FileSlot::new(dir.path()));
    assert_eq!(shop.theme(), Theme::Light);
}

#[test]
fn test_missing_data_dir_is_created_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested").join("data");

    let mut cart = CartManager::new(CartStore::new(FileSlot::new(&nested)));
    cart.add("Tee", "tee.jpg", Price::parse("20").unwrap()).unwrap();

    assert!(nested.join(keys::CART).is_file());
}
