//! Shop session: the composition root for one shopper.
//!
//! Owns the cart manager, the checkout flow, and the theme preference, all
//! backed by one persistence slot. Cart edits are refused while the checkout
//! form is open so the order summary cannot change underneath the form.

use thiserror::Error;
use urban_vibe_core::{LineItem, OrderDetails, Price, Theme};

use crate::cart::{CartError, CartManager, CartSnapshot};
use crate::checkout::{CheckoutError, CheckoutEvent, CheckoutFlow, CheckoutState, OpenOutcome, Submitted};
use crate::persistence::{CartStore, PersistenceError, PersistenceSlot};

/// Errors returned by shop operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Cart edits are locked while the checkout form is open.
    #[error("cart cannot be changed during checkout")]
    CheckoutInProgress,

    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout transition failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// State was updated in memory but could not be saved.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ShopError {
    /// The persistence failure behind this error, if that is all it is.
    ///
    /// When this returns `Some` the operation itself took effect.
    #[must_use]
    pub const fn as_persistence(&self) -> Option<&PersistenceError> {
        match self {
            Self::Persistence(e) | Self::Cart(CartError::Persistence(e)) => Some(e),
            _ => None,
        }
    }
}

/// One shopper's cart, checkout, and theme.
#[derive(Debug)]
pub struct Shop<S> {
    cart: CartManager<S>,
    checkout: CheckoutFlow,
    theme: Theme,
}

impl<S: PersistenceSlot> Shop<S> {
    /// Create a shop restoring cart and theme from `slot`.
    pub fn new(slot: S) -> Self {
        Self::with_checkout(slot, CheckoutFlow::new())
    }

    /// Create a shop with a preconfigured checkout flow.
    pub fn with_checkout(slot: S, checkout: CheckoutFlow) -> Self {
        let store = CartStore::new(slot);
        let theme = store.load_theme();
        Self {
            cart: CartManager::new(store),
            checkout,
            theme,
        }
    }

    /// Register a callback run after every cart mutation.
    pub fn on_render(&mut self, callback: impl FnMut() + Send + 'static) {
        self.cart.on_render(callback);
    }

    /// Register a listener for checkout events.
    pub fn on_event(&mut self, listener: impl FnMut(&CheckoutEvent) + Send + 'static) {
        self.checkout.subscribe(listener);
    }

    /// Get a reference to the cart manager.
    pub const fn cart(&self) -> &CartManager<S> {
        &self.cart
    }

    /// Current cart contents and totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.snapshot()
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Current checkout state.
    #[must_use]
    pub const fn checkout_state(&self) -> &CheckoutState {
        self.checkout.state()
    }

    /// Current theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Add one unit of a product; `price` is raw user input.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutInProgress` while the form is open, otherwise any
    /// [`CartError`] from [`CartManager::add_raw`].
    pub fn add(&mut self, name: &str, image_ref: &str, price: &str) -> Result<(), ShopError> {
        self.ensure_editable()?;
        Ok(self.cart.add_raw(name, image_ref, price)?)
    }

    /// Add one unit of a product with an already validated price.
    ///
    /// # Errors
    ///
    /// As [`Self::add`], minus price validation.
    pub fn add_priced(&mut self, name: &str, image_ref: &str, price: Price) -> Result<(), ShopError> {
        self.ensure_editable()?;
        Ok(self.cart.add(name, image_ref, price)?)
    }

    /// Add one unit to the named item.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutInProgress` while the form is open, otherwise any
    /// [`CartError`] from [`CartManager::increase`].
    pub fn increase(&mut self, name: &str) -> Result<(), ShopError> {
        self.ensure_editable()?;
        Ok(self.cart.increase(name)?)
    }

    /// Remove one unit from the named item.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutInProgress` while the form is open, otherwise any
    /// [`CartError`] from [`CartManager::decrease`].
    pub fn decrease(&mut self, name: &str) -> Result<(), ShopError> {
        self.ensure_editable()?;
        Ok(self.cart.decrease(name)?)
    }

    /// Remove the named item.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutInProgress` while the form is open, otherwise any
    /// [`CartError`] from [`CartManager::remove`].
    pub fn remove(&mut self, name: &str) -> Result<(), ShopError> {
        self.ensure_editable()?;
        Ok(self.cart.remove(name)?)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutInProgress` while the form is open, or `Persistence`
    /// if the empty cart could not be saved.
    pub fn clear(&mut self) -> Result<(), ShopError> {
        self.ensure_editable()?;
        Ok(self.cart.clear()?)
    }

    /// Open the checkout form.
    ///
    /// # Errors
    ///
    /// Returns `Checkout(InvalidTransition)` unless checkout is idle.
    pub fn open_checkout(&mut self) -> Result<OpenOutcome, ShopError> {
        Ok(self.checkout.open(&self.cart)?)
    }

    /// Submit the checkout form.
    ///
    /// # Errors
    ///
    /// Returns `Checkout(..)` if the form is not open or a field is missing.
    pub fn submit_checkout(&mut self, details: &OrderDetails) -> Result<Submitted, ShopError> {
        Ok(self.checkout.submit(&mut self.cart, details)?)
    }

    /// Close the checkout form or confirmation view.
    pub fn dismiss_checkout(&mut self) {
        self.checkout.dismiss();
    }

    /// Switch between light and dark and persist the choice.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the preference could not be saved; the
    /// theme is switched for this session regardless.
    pub fn toggle_theme(&mut self) -> Result<Theme, PersistenceError> {
        self.set_theme(self.theme.toggled())
    }

    /// Set and persist the theme.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the preference could not be saved.
    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme, PersistenceError> {
        self.theme = theme;
        tracing::debug!(%theme, "theme changed");
        self.cart.store().save_theme(theme)?;
        Ok(theme)
    }

    fn ensure_editable(&self) -> Result<(), ShopError> {
        if self.checkout.is_form_open() {
            return Err(ShopError::CheckoutInProgress);
        }
        Ok(())
    }
}
