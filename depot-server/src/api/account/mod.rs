//! Account API: registration, login, logout, password change

mod handler;

use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/customer/register", post(handler::register_customer))
        .route("/api/v1/customer/login", post(handler::login_customer))
        .route("/api/v1/supplier/register", post(handler::register_supplier))
        .route("/api/v1/supplier/login", post(handler::login_supplier))
        .route("/api/v1/courier/login", post(handler::login_courier))
        .route("/api/v1/admin/login", post(handler::login_admin))
        .route("/api/v1/account/password", put(handler::update_password))
        .route("/api/v1/logout", post(handler::logout))
}
