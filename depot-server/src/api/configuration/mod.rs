//! Configuration API (delivery fee)

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/v1/configuration",
        get(handler::get).put(handler::update),
    )
}
