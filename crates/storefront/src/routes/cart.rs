//! Cart route handlers.
//!
//! Mutations are keyed by item name and answer with the fresh cart view.
//! Every cart response carries `X-Cart-Revision`, bumped by the shop's render
//! callback, so the page can tell whether its drawer is stale.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use urban_vibe_core::LineItem;

use crate::cart::CartSnapshot;
use crate::error::Result;
use crate::persistence::SharedSlot;
use crate::shop::{Shop, ShopError};
use crate::state::AppState;

/// Response header carrying the render revision.
pub const REVISION_HEADER: &str = "x-cart-revision";

/// Warning returned when a change could not be saved.
pub const NOT_SAVED_WARNING: &str =
    "Your cart was updated but could not be saved on this device.";

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
        }
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            image: item.image_ref.clone(),
            quantity: item.quantity.get(),
            price: item.price.to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            items: snapshot.items.iter().map(CartItemView::from).collect(),
            subtotal: snapshot.subtotal.to_string(),
            item_count: snapshot.total_count,
        }
    }
}

/// JSON body of every cart response.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: CartView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub name: String,
    #[serde(default)]
    pub img: String,
    pub price: String,
}

/// Form data naming one cart item.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub name: String,
}

/// Cart drawer fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Display cart snapshot.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Response> {
    let snapshot = state.shop()?.snapshot();
    Ok(respond(&state, &snapshot, None))
}

/// Render the cart drawer fragment.
#[instrument(skip(state))]
pub async fn drawer(State(state): State<AppState>) -> Result<Response> {
    let snapshot = state.shop()?.snapshot();
    let template = CartDrawerTemplate {
        cart: CartView::from(&snapshot),
    };
    Ok((revision_header(&state), template).into_response())
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Result<Response> {
    mutate(&state, |shop| shop.add(&form.name, &form.img, &form.price))
}

/// Add one unit of an item already in the cart.
#[instrument(skip(state))]
pub async fn increase(State(state): State<AppState>, Form(form): Form<ItemForm>) -> Result<Response> {
    mutate(&state, |shop| shop.increase(&form.name))
}

/// Remove one unit of an item.
#[instrument(skip(state))]
pub async fn decrease(State(state): State<AppState>, Form(form): Form<ItemForm>) -> Result<Response> {
    mutate(&state, |shop| shop.decrease(&form.name))
}

/// Remove an item entirely.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<ItemForm>) -> Result<Response> {
    mutate(&state, |shop| shop.remove(&form.name))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Response> {
    mutate(&state, Shop::clear)
}

/// Run one shop mutation and answer with the resulting cart.
///
/// A persistence failure still answers 200 with a warning, since the change
/// took effect in memory.
fn mutate(
    state: &AppState,
    op: impl FnOnce(&mut Shop<SharedSlot>) -> std::result::Result<(), ShopError>,
) -> Result<Response> {
    let (result, snapshot) = {
        let mut shop = state.shop()?;
        let result = op(&mut shop);
        (result, shop.snapshot())
    };

    let warning = match result {
        Ok(()) => None,
        Err(err) => match err.as_persistence() {
            Some(cause) => {
                tracing::warn!(error = %cause, "cart change not persisted");
                Some(NOT_SAVED_WARNING.to_string())
            }
            None => return Err(err.into()),
        },
    };

    Ok(respond(state, &snapshot, warning))
}

fn revision_header(state: &AppState) -> AppendHeaders<[(&'static str, String); 1]> {
    AppendHeaders([(REVISION_HEADER, state.revision().to_string())])
}

fn respond(state: &AppState, snapshot: &CartSnapshot, warning: Option<String>) -> Response {
    (
        revision_header(state),
        Json(CartResponse {
            cart: CartView::from(snapshot),
            warning,
        }),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use urban_vibe_core::Price;

    use super::*;

    fn snapshot(items: &[(&str, &str, u32)]) -> CartSnapshot {
        let items: Vec<LineItem> = items
            .iter()
            .map(|(name, price, qty)| {
                let mut item = LineItem::new(*name, "img/a.jpg", Price::parse(price).unwrap());
                item.quantity = std::num::NonZeroU32::new(*qty).unwrap();
                item
            })
            .collect();
        let subtotal: Price = items.iter().map(LineItem::line_total).sum();
        CartSnapshot {
            total_count: items.iter().map(|i| u64::from(i.quantity.get())).sum(),
            subtotal: subtotal.to_cents(),
            items,
        }
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let view = CartView::from(&snapshot(&[("Hoodie A", "49.99", 2)]));
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "$99.98");
        assert_eq!(view.items[0].price, "$49.99");
        assert_eq!(view.items[0].line_price, "$99.98");
    }

    #[test]
    fn test_drawer_empty_message() {
        let html = CartDrawerTemplate {
            cart: CartView::empty(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Your cart is empty — add some hoodies."));
        assert!(html.contains("$0.00"));
    }

    #[test]
    fn test_drawer_escapes_item_names() {
        let html = CartDrawerTemplate {
            cart: CartView::from(&snapshot(&[("<script>alert(1)</script>", "5", 1)])),
        }
        .render()
        .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_drawer_lists_items_in_order() {
        let html = CartDrawerTemplate {
            cart: CartView::from(&snapshot(&[("Hoodie A", "49.99", 1), ("Hoodie B", "20", 3)])),
        }
        .render()
        .unwrap();
        let a = html.find("Hoodie A").unwrap();
        let b = html.find("Hoodie B").unwrap();
        assert!(a < b);
        assert!(html.contains("$109.99"));
    }
}
