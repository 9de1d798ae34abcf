//! Warehouse API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/warehouses",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/v1/warehouses/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
