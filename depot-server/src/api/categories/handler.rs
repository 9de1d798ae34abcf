//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{Category, CategoryCreate, ListFilter};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::catalog;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<ApiResponse<Vec<Category>>> {
    current.authorize(Operation::ViewCategories)?;
    let categories = catalog::list_categories(&state, &ListQuery::from(&filter)).await?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Category>> {
    current.authorize(Operation::ViewCategories)?;
    Ok(ApiResponse::success(catalog::get_category(&state, id).await?))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<ApiResponse<Category>> {
    current.authorize(Operation::ManageCategories)?;
    let category = catalog::create_category(&state, payload, current.session.user_id).await?;
    Ok(ApiResponse::success(category))
}
