//! Cart manager.
//!
//! Owns the ordered list of line items. Every mutation runs the same three
//! steps before returning: update memory, persist through the [`CartStore`],
//! then invoke each render callback. A failed persist is reported after the
//! callbacks ran and does not undo the mutation.
//!
//! Items can be addressed by position (the drawer's legacy contract) or by
//! name. Names are unique within a cart, so name-keyed calls stay valid when
//! other items are removed in between.

use core::fmt;

use serde::Serialize;
use thiserror::Error;
use urban_vibe_core::{LineItem, Price, PriceError};

use crate::persistence::{CartStore, PersistenceError, PersistenceSlot};

/// Callback invoked with no arguments after every cart mutation.
pub type RenderCallback = Box<dyn FnMut() + Send>;

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Position does not reference an item.
    #[error("no cart item at index {index} (cart has {len})")]
    InvalidIndex { index: usize, len: usize },

    /// No item with this name is in the cart.
    #[error("item not in cart: {0}")]
    ItemNotFound(String),

    /// Price input is not a non-negative number.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// Quantity would exceed the supported maximum.
    #[error("quantity limit reached for {0}")]
    QuantityOverflow(String),

    /// The mutation was applied in memory but could not be saved.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Read-only view of the cart contents plus derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    /// Items in display order.
    pub items: Vec<LineItem>,
    /// Sum of all quantities.
    pub total_count: u64,
    /// Sum of all line totals, rounded to cents.
    pub subtotal: Price,
}

impl CartSnapshot {
    /// Returns `true` if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Owner of the in-memory cart.
pub struct CartManager<S> {
    items: Vec<LineItem>,
    store: CartStore<S>,
    renderers: Vec<RenderCallback>,
}

impl<S> fmt::Debug for CartManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartManager")
            .field("items", &self.items)
            .field("renderers", &self.renderers.len())
            .finish_non_exhaustive()
    }
}

impl<S: PersistenceSlot> CartManager<S> {
    /// Create a cart manager hydrated from the store.
    pub fn new(store: CartStore<S>) -> Self {
        let items = store.load();
        Self {
            items,
            store,
            renderers: Vec::new(),
        }
    }

    /// Register a callback run after every mutation.
    pub fn on_render(&mut self, callback: impl FnMut() + Send + 'static) {
        self.renderers.push(Box::new(callback));
    }

    /// Get a reference to the store adapter.
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Exact sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Current contents plus derived totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_count: self.total_count(),
            subtotal: self.subtotal().to_cents(),
        }
    }

    /// Add one unit of a product.
    ///
    /// If an item with `name` exists its quantity grows by one and its image
    /// and price are kept; otherwise a new item with quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns `QuantityOverflow` if the existing quantity is at its maximum, or
    /// `Persistence` if the updated cart could not be saved.
    pub fn add(&mut self, name: &str, image_ref: &str, price: Price) -> Result<(), CartError> {
        if let Some(index) = self.position(name) {
            return self.increase_quantity(index);
        }
        self.items.push(LineItem::new(name, image_ref, price));
        tracing::debug!(item = name, %price, "item added");
        self.commit()?;
        Ok(())
    }

    /// Add one unit of a product whose price comes from unvalidated input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPrice` without touching the cart if `price` is not a
    /// non-negative number, otherwise the same errors as [`Self::add`].
    pub fn add_raw(&mut self, name: &str, image_ref: &str, price: &str) -> Result<(), CartError> {
        let price = Price::parse(price)?;
        self.add(name, image_ref, price)
    }

    /// Add one unit to the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndex` if out of range, `QuantityOverflow` at the
    /// maximum quantity, or `Persistence` if the save fails.
    pub fn increase_quantity(&mut self, index: usize) -> Result<(), CartError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CartError::InvalidIndex { index, len })?;
        item.quantity = item
            .incremented()
            .ok_or_else(|| CartError::QuantityOverflow(item.name.clone()))?;
        tracing::debug!(item = %item.name, quantity = item.quantity.get(), "quantity increased");
        self.commit()?;
        Ok(())
    }

    /// Remove one unit from the item at `index`, removing the item at zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndex` if out of range or `Persistence` if the save fails.
    pub fn decrease_quantity(&mut self, index: usize) -> Result<(), CartError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CartError::InvalidIndex { index, len })?;
        if let Some(quantity) = item.decremented() {
            item.quantity = quantity;
            tracing::debug!(item = %item.name, quantity = quantity.get(), "quantity decreased");
        } else {
            let removed = self.items.remove(index);
            tracing::debug!(item = %removed.name, "last unit removed");
        }
        self.commit()?;
        Ok(())
    }

    /// Remove the item at `index` regardless of quantity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndex` if out of range or `Persistence` if the save fails.
    pub fn remove_item(&mut self, index: usize) -> Result<(), CartError> {
        if index >= self.items.len() {
            return Err(CartError::InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);
        tracing::debug!(item = %removed.name, "item removed");
        self.commit()?;
        Ok(())
    }

    /// Add one unit to the item named `name`.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if no item has that name, otherwise as
    /// [`Self::increase_quantity`].
    pub fn increase(&mut self, name: &str) -> Result<(), CartError> {
        let index = self.require(name)?;
        self.increase_quantity(index)
    }

    /// Remove one unit from the item named `name`.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if no item has that name, otherwise as
    /// [`Self::decrease_quantity`].
    pub fn decrease(&mut self, name: &str) -> Result<(), CartError> {
        let index = self.require(name)?;
        self.decrease_quantity(index)
    }

    /// Remove the item named `name`.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if no item has that name, otherwise as
    /// [`Self::remove_item`].
    pub fn remove(&mut self, name: &str) -> Result<(), CartError> {
        let index = self.require(name)?;
        self.remove_item(index)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the empty cart could not be saved.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.items.clear();
        tracing::debug!("cart cleared");
        self.commit()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    fn require(&self, name: &str) -> Result<usize, CartError> {
        self.position(name)
            .ok_or_else(|| CartError::ItemNotFound(name.to_owned()))
    }

    /// Persist, then render. The save result is returned after rendering.
    fn commit(&mut self) -> Result<(), PersistenceError> {
        let saved = self.store.save(&self.items);
        if let Err(e) = &saved {
            tracing::warn!(error = %e, "cart not persisted, keeping in-memory state");
        }
        for render in &mut self.renderers {
            render();
        }
        saved
    }
}
