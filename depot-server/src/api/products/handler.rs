//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{ListFilter, ProductCreate, ProductUpdate, ProductView};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::catalog;
use crate::state::AppState;

/// GET /api/v1/products
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<ApiResponse<Vec<ProductView>>> {
    current.authorize(Operation::ViewProducts)?;
    let products = catalog::list_products(&state, &ListQuery::from(&filter)).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ProductView>> {
    current.authorize(Operation::ViewProducts)?;
    Ok(ApiResponse::success(catalog::get_product(&state, id).await?))
}

/// POST /api/v1/products - the calling supplier becomes the owner
pub async fn create(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(payload): Json<ProductCreate>,
) -> AppResult<ApiResponse<ProductView>> {
    current.authorize(Operation::CreateProduct)?;
    let product = catalog::create_product(&state, payload, current.session.user_id).await?;
    Ok(ApiResponse::success(product))
}

/// PUT /api/v1/products/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<ApiResponse<ProductView>> {
    let access = current.authorize(Operation::ManageProduct)?;
    let product =
        catalog::update_product(&state, id, payload, access, current.session.user_id).await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/v1/products/{id} - soft delete
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<bool>> {
    let access = current.authorize(Operation::ManageProduct)?;
    catalog::delete_product(&state, id, access, current.session.user_id).await?;
    Ok(ApiResponse::success(true))
}
