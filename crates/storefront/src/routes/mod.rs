//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Cart
//! GET  /cart                   - Cart snapshot (JSON)
//! GET  /cart/drawer            - Cart drawer fragment (HTML)
//! POST /cart/add               - Add one unit (name, img, price)
//! POST /cart/increase          - Add one unit of an item (name)
//! POST /cart/decrease          - Remove one unit of an item (name)
//! POST /cart/remove            - Remove an item (name)
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! GET  /checkout               - Checkout state
//! POST /checkout/open          - Open the form (rejected on empty cart)
//! POST /checkout/submit        - Place the simulated order
//! POST /checkout/dismiss       - Close the form or confirmation
//!
//! # Theme
//! GET  /theme                  - Current theme
//! POST /theme/toggle           - Switch light/dark
//! ```

pub mod cart;
pub mod checkout;
pub mod theme;

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::state::AppState;

/// Create the cart routes router.
///
/// Cart responses are never cached; the drawer must reflect the last render.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/drawer", get(cart::drawer))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/open", post(checkout::open))
        .route("/submit", post(checkout::submit))
        .route("/dismiss", post(checkout::dismiss))
}

/// Create the theme routes router.
pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(theme::show))
        .route("/toggle", post(theme::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/theme", theme_routes())
}

/// Build the application router with tracing and state attached.
pub fn app(state: AppState) -> Router {
    routes().layer(TraceLayer::new_for_http()).with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
