//! Order line item API Handlers

use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppResult};
use shared::models::{LineItemView, ListFilter};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::orders;
use crate::state::AppState;

/// GET /api/v1/order-products
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<ApiResponse<Vec<LineItemView>>> {
    let access = current.authorize(Operation::ViewLineItems)?;
    let items = orders::list_line_items(&state, &ListQuery::from(&filter), access).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/v1/order-products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<LineItemView>> {
    let access = current.authorize(Operation::ViewLineItems)?;
    Ok(ApiResponse::success(
        orders::get_line_item(&state, id, access).await?,
    ))
}
