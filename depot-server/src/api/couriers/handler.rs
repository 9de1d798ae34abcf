//! Courier API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{Courier, CourierCreate, ListFilter};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::account;
use crate::state::AppState;

/// POST /api/v1/couriers - admins create courier accounts
pub async fn create(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<CourierCreate>,
) -> AppResult<ApiResponse<Courier>> {
    current.authorize(Operation::ManageCouriers)?;
    let courier = account::create_courier(&state, payload, current.session.user_id).await?;
    Ok(ApiResponse::success(courier))
}

/// GET /api/v1/couriers
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<ApiResponse<Vec<Courier>>> {
    current.authorize(Operation::ViewCouriers)?;
    let couriers = account::list_couriers(&state, &ListQuery::from(&filter)).await?;
    Ok(ApiResponse::success(couriers))
}

/// GET /api/v1/couriers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Courier>> {
    current.authorize(Operation::ViewCouriers)?;
    Ok(ApiResponse::success(account::get_courier(&state, id).await?))
}
