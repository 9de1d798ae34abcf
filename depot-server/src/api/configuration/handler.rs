//! Configuration API Handlers

use axum::{Json, extract::State};
use shared::error::{ApiResponse, AppResult};
use shared::models::{Configuration, ConfigurationUpdate};

use crate::auth::{CurrentSession, Operation};
use crate::services::catalog;
use crate::state::AppState;

/// GET /api/v1/configuration
pub async fn get(
    State(state): State<AppState>,
    current: CurrentSession,
) -> AppResult<ApiResponse<Configuration>> {
    current.authorize(Operation::ViewConfiguration)?;
    Ok(ApiResponse::success(catalog::get_configuration(&state).await?))
}

/// PUT /api/v1/configuration - new fee applies to orders placed afterwards
pub async fn update(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<ConfigurationUpdate>,
) -> AppResult<ApiResponse<Configuration>> {
    current.authorize(Operation::ManageConfiguration)?;
    let config =
        catalog::set_delivery_fee(&state, payload.delivery_fee, current.session.user_id).await?;
    Ok(ApiResponse::success(config))
}
