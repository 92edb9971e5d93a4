//! Application state shared across handlers.
//!
//! The shop is a single-writer resource: handlers run on a multi-threaded
//! runtime, so it sits behind a mutex. Guards are never held across `.await`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::checkout::CheckoutEvent;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::persistence::SharedSlot;
use crate::shop::Shop;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// shop, its render revision, and pending presentation events.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop: Mutex<Shop<SharedSlot>>,
    revision: Arc<AtomicU64>,
    events: Arc<Mutex<Vec<CheckoutEvent>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `slot` - Persistence backend for cart and theme
    #[must_use]
    pub fn new(config: StorefrontConfig, slot: SharedSlot) -> Self {
        let mut shop = Shop::new(slot);

        let revision = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&revision);
        shop.on_render(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let events = Arc::new(Mutex::new(Vec::new()));
        let queue = Arc::clone(&events);
        shop.on_event(move |event| {
            tracing::info!(?event, "checkout event");
            if let Ok(mut pending) = queue.lock() {
                pending.push(event.clone());
            }
        });

        Self {
            inner: Arc::new(AppStateInner {
                config,
                shop: Mutex::new(shop),
                revision,
                events,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Lock the shop for one operation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a previous holder panicked.
    pub fn shop(&self) -> Result<MutexGuard<'_, Shop<SharedSlot>>, AppError> {
        self.inner
            .shop
            .lock()
            .map_err(|_| AppError::Internal("shop lock poisoned".to_string()))
    }

    /// Number of cart renders so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Relaxed)
    }

    /// Take the events published since the last call.
    #[must_use]
    pub fn drain_events(&self) -> Vec<CheckoutEvent> {
        self.inner
            .events
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }
}
