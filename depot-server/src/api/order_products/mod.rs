//! Order line item API (read-only)

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/order-products", get(handler::list))
        .route("/api/v1/order-products/{id}", get(handler::get_by_id))
}
