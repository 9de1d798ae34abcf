//! Payment API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/payments", get(handler::list))
        .route(
            "/api/v1/payments/{id}",
            get(handler::get_by_id).put(handler::confirm),
        )
}
