//! Warehouse API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{ListFilter, Warehouse, WarehouseCreate, WarehouseUpdate};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::catalog;
use crate::state::AppState;

/// GET /api/v1/warehouses - by name, or ranked by distance when
/// `latitude` and `longitude` are both given
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<Response> {
    current.authorize(Operation::ViewWarehouses)?;
    let q = ListQuery::from(&filter);

    let response = match filter.coordinate() {
        Some((latitude, longitude)) => {
            let ranked = catalog::rank_warehouses(&state, latitude, longitude, &q).await?;
            ApiResponse::success(ranked).into_response()
        }
        None => {
            let warehouses = catalog::list_warehouses(&state, &q).await?;
            ApiResponse::success(warehouses).into_response()
        }
    };
    Ok(response)
}

/// GET /api/v1/warehouses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Warehouse>> {
    current.authorize(Operation::ViewWarehouses)?;
    Ok(ApiResponse::success(catalog::get_warehouse(&state, id).await?))
}

/// POST /api/v1/warehouses
pub async fn create(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<WarehouseCreate>,
) -> AppResult<ApiResponse<Warehouse>> {
    current.authorize(Operation::ManageWarehouses)?;
    let warehouse = catalog::create_warehouse(&state, payload, current.session.user_id).await?;
    Ok(ApiResponse::success(warehouse))
}

/// PUT /api/v1/warehouses/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<WarehouseUpdate>,
) -> AppResult<ApiResponse<Warehouse>> {
    current.authorize(Operation::ManageWarehouses)?;
    let warehouse =
        catalog::update_warehouse(&state, id, payload, current.session.user_id).await?;
    Ok(ApiResponse::success(warehouse))
}

/// DELETE /api/v1/warehouses/{id} - soft delete
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<bool>> {
    current.authorize(Operation::ManageWarehouses)?;
    catalog::delete_warehouse(&state, id, current.session.user_id).await?;
    Ok(ApiResponse::success(true))
}
