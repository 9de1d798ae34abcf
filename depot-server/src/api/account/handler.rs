//! Account API Handlers

use axum::{Json, extract::State};
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    Admin, AdminLogin, AuthResponse, Courier, Customer, CustomerRegister, EmailLogin,
    PasswordUpdate, Supplier, SupplierRegister,
};

use crate::auth::{CurrentSession, Operation};
use crate::services::account;
use crate::state::AppState;

/// POST /api/v1/customer/register
pub async fn register_customer(
    State(state): State<AppState>,
    Json(payload): Json<CustomerRegister>,
) -> AppResult<ApiResponse<AuthResponse<Customer>>> {
    let auth = account::register_customer(&state, payload).await?;
    Ok(ApiResponse::success(auth))
}

/// POST /api/v1/customer/login
pub async fn login_customer(
    State(state): State<AppState>,
    Json(payload): Json<EmailLogin>,
) -> AppResult<ApiResponse<AuthResponse<Customer>>> {
    let auth = account::login_customer(&state, payload).await?;
    Ok(ApiResponse::success(auth))
}

/// POST /api/v1/supplier/register
pub async fn register_supplier(
    State(state): State<AppState>,
    Json(payload): Json<SupplierRegister>,
) -> AppResult<ApiResponse<AuthResponse<Supplier>>> {
    let auth = account::register_supplier(&state, payload).await?;
    Ok(ApiResponse::success(auth))
}

/// POST /api/v1/supplier/login
pub async fn login_supplier(
    State(state): State<AppState>,
    Json(payload): Json<EmailLogin>,
) -> AppResult<ApiResponse<AuthResponse<Supplier>>> {
    let auth = account::login_supplier(&state, payload).await?;
    Ok(ApiResponse::success(auth))
}

/// POST /api/v1/courier/login
pub async fn login_courier(
    State(state): State<AppState>,
    Json(payload): Json<EmailLogin>,
) -> AppResult<ApiResponse<AuthResponse<Courier>>> {
    let auth = account::login_courier(&state, payload).await?;
    Ok(ApiResponse::success(auth))
}

/// POST /api/v1/admin/login
pub async fn login_admin(
    State(state): State<AppState>,
    Json(payload): Json<AdminLogin>,
) -> AppResult<ApiResponse<AuthResponse<Admin>>> {
    let auth = account::login_admin(&state, payload).await?;
    Ok(ApiResponse::success(auth))
}

/// POST /api/v1/logout - drop the presented session
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentSession,
) -> AppResult<ApiResponse<bool>> {
    current.authorize(Operation::Logout)?;
    let removed = account::logout(&state, &current.token).await;
    tracing::info!(user_id = %current.session.user_id, "Logged out");
    Ok(ApiResponse::success(removed))
}

/// PUT /api/v1/account/password - change the caller's own password
pub async fn update_password(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<PasswordUpdate>,
) -> AppResult<ApiResponse<bool>> {
    current.authorize(Operation::UpdatePassword)?;
    account::update_password(&state, current.session, payload).await?;
    Ok(ApiResponse::success(true))
}
