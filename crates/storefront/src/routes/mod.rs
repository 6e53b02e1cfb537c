//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Health check
//!
//! # Customer data
//! GET  /customer/section/load          - Load sections (`?sections=cart,...`)
//!
//! # Cart (returns the refreshed cart section)
//! POST /cart/add                       - Add a product (`product_id`, `qty`)
//! POST /cart/remove                    - Remove a line (`item_id`)
//! ```

pub mod cart;
pub mod sections;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Build the complete router for storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customer/section/load", get(sections::load))
        .nest("/cart", cart_routes())
}
