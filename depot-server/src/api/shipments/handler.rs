//! Shipment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{ListFilter, ShipmentCreate, ShipmentStatusUpdate, ShipmentView};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::shipments;
use crate::state::AppState;

/// POST /api/v1/shipments - assign a confirmed order to a courier
pub async fn create(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<ShipmentCreate>,
) -> AppResult<ApiResponse<ShipmentView>> {
    current.authorize(Operation::CreateShipment)?;
    let view = shipments::create(&state, payload, current.session.user_id).await?;
    Ok(ApiResponse::success(view))
}

/// GET /api/v1/shipments - couriers see their own, customers those of their orders
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<ApiResponse<Vec<ShipmentView>>> {
    let access = current.authorize(Operation::ViewShipments)?;
    let views = shipments::list(&state, &ListQuery::from(&filter), current.session, access).await?;
    Ok(ApiResponse::success(views))
}

/// GET /api/v1/shipments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ShipmentView>> {
    let access = current.authorize(Operation::ViewShipments)?;
    Ok(ApiResponse::success(
        shipments::get(&state, id, current.session, access).await?,
    ))
}

/// PUT /api/v1/shipments/{id}/status - close as delivered or failed
pub async fn update_status(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<ShipmentStatusUpdate>,
) -> AppResult<ApiResponse<ShipmentView>> {
    let access = current.authorize(Operation::UpdateShipmentStatus)?;
    let view =
        shipments::update_status(&state, id, payload, access, current.session.user_id).await?;
    Ok(ApiResponse::success(view))
}
