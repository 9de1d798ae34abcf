//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{ListFilter, OrderCreate, OrderView, PlacedOrder};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::{order_assembler, orders};
use crate::state::AppState;

/// POST /api/v1/orders - place an order for the calling customer
///
/// Returns the composed order together with its unpaid payment.
pub async fn create(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<OrderCreate>,
) -> AppResult<ApiResponse<PlacedOrder>> {
    current.authorize(Operation::PlaceOrder)?;
    let placed = order_assembler::place_order(&state, current.session.user_id, &payload).await?;
    Ok(ApiResponse::success(placed))
}

/// GET /api/v1/orders - customers see their own orders only
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<ApiResponse<Vec<OrderView>>> {
    let access = current.authorize(Operation::ViewOrders)?;
    let orders = orders::list_orders(&state, &ListQuery::from(&filter), access).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/v1/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<OrderView>> {
    let access = current.authorize(Operation::ViewOrders)?;
    Ok(ApiResponse::success(orders::get_order(&state, id, access).await?))
}

/// DELETE /api/v1/orders/{id} - soft delete with line items and payment
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<bool>> {
    current.authorize(Operation::DeleteOrder)?;
    orders::delete_order(&state, id, current.session.user_id).await?;
    Ok(ApiResponse::success(true))
}
