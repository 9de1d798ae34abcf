//! Shipment API

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/shipments", get(handler::list).post(handler::create))
        .route("/api/v1/shipments/{id}", get(handler::get_by_id))
        .route("/api/v1/shipments/{id}/status", put(handler::update_status))
}
