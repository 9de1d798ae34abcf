//! Category API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/categories",
            get(handler::list).post(handler::create),
        )
        .route("/api/v1/categories/{id}", get(handler::get_by_id))
}
