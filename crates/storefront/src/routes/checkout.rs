//! Checkout route handlers.

use std::collections::HashMap;

use axum::{Form, Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use urban_vibe_core::OrderDetails;

use crate::checkout::{CART_EMPTY_NOTICE, CheckoutEvent, CheckoutState, OpenOutcome};
use crate::error::Result;
use crate::state::AppState;

/// Warning returned when the order was placed but the emptied cart was not saved.
pub const CLEAR_NOT_SAVED_WARNING: &str =
    "Your order was placed but the cart could not be cleared on this device.";

/// JSON body of every checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout: CheckoutState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub events: Vec<CheckoutEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CheckoutResponse {
    fn new(state: &AppState, checkout: CheckoutState) -> Self {
        Self {
            checkout,
            notice: None,
            events: state.drain_events(),
            warning: None,
        }
    }
}

/// Current checkout state.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CheckoutResponse>> {
    let checkout = state.shop()?.checkout_state().clone();
    Ok(Json(CheckoutResponse::new(&state, checkout)))
}

/// Open the checkout form.
///
/// An empty cart is not an error: the flow stays idle and the response
/// carries the notice.
#[instrument(skip(state))]
pub async fn open(State(state): State<AppState>) -> Result<Json<CheckoutResponse>> {
    let (outcome, checkout) = {
        let mut shop = state.shop()?;
        let outcome = shop.open_checkout()?;
        (outcome, shop.checkout_state().clone())
    };

    let mut response = CheckoutResponse::new(&state, checkout);
    if outcome == OpenOutcome::CartEmpty {
        response.notice = Some(CART_EMPTY_NOTICE.to_string());
    }
    Ok(Json(response))
}

/// Place the simulated order from the submitted contact fields.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<CheckoutResponse>> {
    let details: OrderDetails = form.into_iter().collect();

    let (submitted, checkout) = {
        let mut shop = state.shop()?;
        let submitted = shop.submit_checkout(&details)?;
        (submitted, shop.checkout_state().clone())
    };

    let mut response = CheckoutResponse::new(&state, checkout);
    if let Some(err) = submitted.persistence {
        tracing::warn!(error = %err, "cleared cart not persisted");
        response.warning = Some(CLEAR_NOT_SAVED_WARNING.to_string());
    }
    Ok(Json(response))
}

/// Close the form or the confirmation.
#[instrument(skip(state))]
pub async fn dismiss(State(state): State<AppState>) -> Result<Json<CheckoutResponse>> {
    let checkout = {
        let mut shop = state.shop()?;
        shop.dismiss_checkout();
        shop.checkout_state().clone()
    };
    Ok(Json(CheckoutResponse::new(&state, checkout)))
}
