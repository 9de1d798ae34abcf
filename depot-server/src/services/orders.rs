//! Order, line item and payment reads, and order deletion
//!
//! Customers only ever see rows belonging to their own orders; the list
//! queries take the owner filter from [`Access::owner`].

use shared::error::{AppError, ErrorCode};
use shared::models::{LineItemView, OrderView, PaymentView};
use uuid::Uuid;

use super::{composer, with_deadline};
use crate::auth::Access;
use crate::db::{ListQuery, OrderRepo, Stamp};
use crate::error::ServiceResult;
use crate::state::AppState;

// ════════════════════════════════════════════════════════════════
// Orders
// ════════════════════════════════════════════════════════════════

pub async fn list_orders(
    state: &AppState,
    q: &ListQuery,
    access: Access,
) -> ServiceResult<Vec<OrderView>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let orders = tx.list_orders(q, access.owner()).await?;

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(composer::order_view(tx.as_mut(), order).await?);
        }
        Ok(views)
    })
    .await
}

pub async fn get_order(state: &AppState, id: Uuid, access: Access) -> ServiceResult<OrderView> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let order = tx
            .get_order(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        access.ensure_owns(order.customer_id, ErrorCode::OrderOwnershipMismatch)?;
        composer::order_view(tx.as_mut(), order).await
    })
    .await
}

/// Soft-delete an order with its line items and payment
///
/// Stock taken by the order is not returned to the warehouse.
pub async fn delete_order(state: &AppState, id: Uuid, actor_id: Uuid) -> ServiceResult<()> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let stamp = Stamp {
            by: actor_id,
            at: state.clock.now(),
        };
        if !tx.delete_order(id, stamp).await? {
            return Err(AppError::new(ErrorCode::OrderNotFound).into());
        }
        tx.commit().await?;

        tracing::info!(order_id = %id, actor_id = %actor_id, "Order deleted");
        Ok(())
    })
    .await
}

// ════════════════════════════════════════════════════════════════
// Line items
// ════════════════════════════════════════════════════════════════

pub async fn list_line_items(
    state: &AppState,
    q: &ListQuery,
    access: Access,
) -> ServiceResult<Vec<LineItemView>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let items = tx.list_all_line_items(q, access.owner()).await?;

        let mut views = Vec::with_capacity(items.len());
        for item in items {
            views.push(composer::line_item_view(tx.as_mut(), item).await?);
        }
        Ok(views)
    })
    .await
}

pub async fn get_line_item(
    state: &AppState,
    id: Uuid,
    access: Access,
) -> ServiceResult<LineItemView> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let item = tx
            .get_line_item(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::LineItemNotFound))?;
        let view = composer::line_item_view(tx.as_mut(), item).await?;
        access.ensure_owns(view.order.customer_id, ErrorCode::OrderOwnershipMismatch)?;
        Ok(view)
    })
    .await
}

// ════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════

pub async fn list_payments(
    state: &AppState,
    q: &ListQuery,
    access: Access,
) -> ServiceResult<Vec<PaymentView>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let payments = tx.list_payments(q, access.owner()).await?;

        let mut views = Vec::with_capacity(payments.len());
        for payment in payments {
            views.push(composer::payment_view(tx.as_mut(), payment).await?);
        }
        Ok(views)
    })
    .await
}

pub async fn get_payment(state: &AppState, id: Uuid, access: Access) -> ServiceResult<PaymentView> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let payment = tx
            .get_payment(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
        let view = composer::payment_view(tx.as_mut(), payment).await?;
        access.ensure_owns(
            view.order.order.customer_id,
            ErrorCode::OrderOwnershipMismatch,
        )?;
        Ok(view)
    })
    .await
}
