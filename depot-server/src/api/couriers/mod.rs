//! Courier API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/couriers", get(handler::list).post(handler::create))
        .route("/api/v1/couriers/{id}", get(handler::get_by_id))
}
