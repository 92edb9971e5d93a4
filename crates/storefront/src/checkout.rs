//! Simulated checkout flow.
//!
//! ```text
//!          open (cart non-empty)         submit (fields filled)
//!   Idle ───────────────────────▶ FormOpen ───────────────────▶ Confirmed
//!    ▲                               │                              │
//!    └──────────── dismiss ──────────┴────────── dismiss ───────────┘
//! ```
//!
//! Opening with an empty cart leaves the flow in `Idle` and publishes a
//! [`CheckoutEvent::CartEmpty`] notice. Entering `Confirmed` clears the cart and
//! publishes [`CheckoutEvent::Celebrate`]; listeners decide how to present it.

use core::fmt;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use urban_vibe_core::{OrderConfirmation, OrderDetails, OrderReference};

use crate::cart::CartManager;
use crate::persistence::{PersistenceError, PersistenceSlot};

/// Contact fields that must be filled before an order is placed.
pub const DEFAULT_REQUIRED_FIELDS: &[&str] = &["name", "email", "address"];

/// Notice shown when checkout is opened with an empty cart.
pub const CART_EMPTY_NOTICE: &str = "Your cart is empty — add something first.";

/// Listener for checkout events.
pub type EventListener = Box<dyn FnMut(&CheckoutEvent) + Send>;

/// Errors returned by checkout transitions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The action is not valid in the current state.
    #[error("cannot {action} checkout while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// A required contact field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Current checkout state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    FormOpen,
    Confirmed(OrderConfirmation),
}

impl CheckoutState {
    /// Short state name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FormOpen => "form_open",
            Self::Confirmed(_) => "confirmed",
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Notifications published to presentation listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CheckoutEvent {
    /// Checkout was requested with nothing in the cart.
    CartEmpty { message: String },
    /// An order was confirmed; play the celebration effect.
    Celebrate { reference: OrderReference },
}

/// Result of [`CheckoutFlow::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The form is now open.
    Opened,
    /// The cart is empty; state unchanged and a notice was published.
    CartEmpty,
}

/// Result of a successful [`CheckoutFlow::submit`].
#[derive(Debug)]
pub struct Submitted {
    /// Summary of the placed order.
    pub confirmation: OrderConfirmation,
    /// Set if the cleared cart could not be persisted.
    pub persistence: Option<PersistenceError>,
}

/// The checkout state machine.
pub struct CheckoutFlow {
    state: CheckoutState,
    required_fields: Vec<String>,
    listeners: Vec<EventListener>,
}

impl fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("state", &self.state)
            .field("required_fields", &self.required_fields)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    /// Create an idle flow requiring [`DEFAULT_REQUIRED_FIELDS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_required_fields(DEFAULT_REQUIRED_FIELDS.iter().copied())
    }

    /// Create an idle flow requiring the given contact fields.
    #[must_use]
    pub fn with_required_fields<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            state: CheckoutState::Idle,
            required_fields: fields.into_iter().map(Into::into).collect(),
            listeners: Vec::new(),
        }
    }

    /// Register a listener for checkout events.
    pub fn subscribe(&mut self, listener: impl FnMut(&CheckoutEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Returns `true` while the checkout form is open.
    #[must_use]
    pub const fn is_form_open(&self) -> bool {
        matches!(self.state, CheckoutState::FormOpen)
    }

    /// Required contact fields.
    #[must_use]
    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Open the checkout form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the flow is `Idle`.
    pub fn open<S: PersistenceSlot>(
        &mut self,
        cart: &CartManager<S>,
    ) -> Result<OpenOutcome, CheckoutError> {
        self.require_state(&CheckoutState::Idle, "open")?;

        if cart.total_count() == 0 {
            tracing::debug!("checkout rejected: cart is empty");
            self.publish(&CheckoutEvent::CartEmpty {
                message: CART_EMPTY_NOTICE.to_owned(),
            });
            return Ok(OpenOutcome::CartEmpty);
        }

        self.state = CheckoutState::FormOpen;
        tracing::debug!(items = cart.total_count(), "checkout form opened");
        Ok(OpenOutcome::Opened)
    }

    /// Place the simulated order.
    ///
    /// The details are checked for the required fields and then dropped. On
    /// success the cart is cleared, the flow moves to `Confirmed`, and a
    /// celebration event is published. A failure to persist the cleared cart
    /// does not block confirmation and is returned in [`Submitted::persistence`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the form is open, or `MissingField`
    /// for the first required field that is missing or blank.
    pub fn submit<S: PersistenceSlot>(
        &mut self,
        cart: &mut CartManager<S>,
        details: &OrderDetails,
    ) -> Result<Submitted, CheckoutError> {
        self.require_state(&CheckoutState::FormOpen, "submit")?;

        if let Some(field) = self
            .required_fields
            .iter()
            .find(|field| details.filled(field).is_none())
        {
            return Err(CheckoutError::MissingField(field.clone()));
        }

        let confirmation = OrderConfirmation {
            reference: OrderReference::generate(),
            placed_at: Utc::now(),
            item_count: cart.total_count(),
            subtotal: cart.subtotal().to_cents(),
        };

        let persistence = cart.clear().err();
        self.state = CheckoutState::Confirmed(confirmation.clone());
        tracing::info!(
            reference = %confirmation.reference,
            items = confirmation.item_count,
            subtotal = %confirmation.subtotal,
            "order confirmed"
        );

        self.publish(&CheckoutEvent::Celebrate {
            reference: confirmation.reference,
        });

        Ok(Submitted {
            confirmation,
            persistence,
        })
    }

    /// Close the form or the confirmation view. No-op while `Idle`.
    pub fn dismiss(&mut self) {
        if self.state != CheckoutState::Idle {
            tracing::debug!(from = %self.state, "checkout dismissed");
            self.state = CheckoutState::Idle;
        }
    }

    fn require_state(&self, state: &CheckoutState, action: &'static str) -> Result<(), CheckoutError> {
        if core::mem::discriminant(&self.state) == core::mem::discriminant(state) {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                state: self.state.name(),
                action,
            })
        }
    }

    fn publish(&mut self, event: &CheckoutEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}
