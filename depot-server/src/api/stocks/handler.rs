//! Stock API Handlers
//!
//! Writes go through the stock ledger, so every response already reflects
//! the recomputed product aggregate.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{ListFilter, StockCreate, StockUpdate, StockView};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::catalog;
use crate::state::AppState;

/// GET /api/v1/stocks
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<ApiResponse<Vec<StockView>>> {
    current.authorize(Operation::ViewStock)?;
    let stocks = catalog::list_stocks(&state, &ListQuery::from(&filter)).await?;
    Ok(ApiResponse::success(stocks))
}

/// GET /api/v1/stocks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<StockView>> {
    current.authorize(Operation::ViewStock)?;
    Ok(ApiResponse::success(catalog::get_stock(&state, id).await?))
}

/// POST /api/v1/stocks - 409 when the (warehouse, product) pair already has a row
pub async fn create(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<StockCreate>,
) -> AppResult<ApiResponse<StockView>> {
    current.authorize(Operation::ManageStock)?;
    let stock = catalog::add_stock(&state, payload, current.session.user_id).await?;
    Ok(ApiResponse::success(stock))
}

/// PUT /api/v1/stocks/{id} - overwrite the quantity on hand
pub async fn update(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockUpdate>,
) -> AppResult<ApiResponse<StockView>> {
    current.authorize(Operation::ManageStock)?;
    let stock = catalog::set_stock(&state, id, payload.stock, current.session.user_id).await?;
    Ok(ApiResponse::success(stock))
}
