//! Payment API Handlers

use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppResult};
use shared::models::{ListFilter, PaymentView};
use uuid::Uuid;

use crate::auth::{CurrentSession, Operation};
use crate::db::ListQuery;
use crate::services::{orders, payments};
use crate::state::AppState;

/// GET /api/v1/payments
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(filter): Query<ListFilter>,
) -> AppResult<ApiResponse<Vec<PaymentView>>> {
    let access = current.authorize(Operation::ViewPayments)?;
    let payments = orders::list_payments(&state, &ListQuery::from(&filter), access).await?;
    Ok(ApiResponse::success(payments))
}

/// GET /api/v1/payments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<PaymentView>> {
    let access = current.authorize(Operation::ViewPayments)?;
    Ok(ApiResponse::success(
        orders::get_payment(&state, id, access).await?,
    ))
}

/// PUT /api/v1/payments/{id} - confirm payment, queue the receipt
///
/// A second confirmation answers 409 and sends nothing.
pub async fn confirm(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<PaymentView>> {
    let access = current.authorize(Operation::ConfirmPayment)?;
    let view = payments::confirm(&state, id, access, current.session.user_id).await?;
    Ok(ApiResponse::success(view))
}
