//! Courier shipments
//!
//! An admin assigns a confirmed order to a courier. The courier then closes
//! the shipment as delivered, which completes the order, or as failed, which
//! frees the order for another shipment. An order has at most one shipment
//! that is pending or delivered.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    OrderStatus, Role, Shipment, ShipmentCreate, ShipmentStatus, ShipmentStatusUpdate,
    ShipmentView,
};
use uuid::Uuid;

use super::{composer, with_deadline};
use crate::auth::{Access, Session};
use crate::db::{AccountRepo, ListQuery, OrderRepo, RepoError, ShipmentOwner, ShipmentRepo, Stamp};
use crate::error::ServiceResult;
use crate::state::AppState;

/// Owner filter for a caller limited to their own rows
fn owner_filter(role: Role, access: Access) -> ShipmentOwner {
    match (access, role) {
        (Access::Own(id), Role::Courier) => ShipmentOwner::Courier(id),
        (Access::Own(id), _) => ShipmentOwner::Customer(id),
        (Access::All, _) => ShipmentOwner::Any,
    }
}

fn already_shipped(order_id: Uuid) -> AppError {
    AppError::new(ErrorCode::ShipmentAlreadyExists).with_detail("order_id", order_id.to_string())
}

pub async fn create(
    state: &AppState,
    payload: ShipmentCreate,
    actor_id: Uuid,
) -> ServiceResult<ShipmentView> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;

        let order = tx
            .get_order(payload.order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        if order.status != OrderStatus::Confirmed {
            return Err(AppError::new(ErrorCode::OrderNotConfirmed)
                .with_detail("status", order.status.to_string())
                .into());
        }

        let courier = tx
            .get_courier(payload.courier_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::new(ErrorCode::CourierNotFound))?;

        if tx.active_shipment(order.id).await?.is_some() {
            return Err(already_shipped(order.id).into());
        }

        let shipment = Shipment {
            id: state.ids.next_id(),
            courier_id: courier.id,
            order_id: order.id,
            status: ShipmentStatus::Pending,
            is_delete: false,
            created_by: actor_id,
            created_at: state.clock.now(),
            updated_by: None,
            updated_at: None,
        };
        match tx.insert_shipment(&shipment).await {
            Ok(()) => {}
            Err(RepoError::Duplicate(_)) => return Err(already_shipped(order.id).into()),
            Err(e) => return Err(e.into()),
        }
        let view = composer::shipment_view(tx.as_mut(), shipment).await?;
        tx.commit().await?;

        tracing::info!(
            shipment_id = %view.shipment.id,
            order_id = %order.id,
            courier_id = %courier.id,
            "Shipment created"
        );
        Ok(view)
    })
    .await
}

/// Close a pending shipment
///
/// Couriers may only close their own shipments. Delivered completes the
/// order in the same transaction.
pub async fn update_status(
    state: &AppState,
    id: Uuid,
    payload: ShipmentStatusUpdate,
    access: Access,
    actor_id: Uuid,
) -> ServiceResult<ShipmentView> {
    with_deadline(state, async {
        if payload.status == ShipmentStatus::Pending {
            return Err(AppError::new(ErrorCode::InvalidShipmentStatus)
                .with_detail("status", payload.status.to_string())
                .into());
        }

        let mut tx = state.store.begin().await?;
        let shipment = tx
            .lock_shipment(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ShipmentNotFound))?;
        access.ensure_owns(shipment.courier_id, ErrorCode::ShipmentOwnershipMismatch)?;
        if shipment.status.is_closed() {
            return Err(AppError::new(ErrorCode::ShipmentClosed)
                .with_detail("status", shipment.status.to_string())
                .into());
        }

        let stamp = Stamp {
            by: actor_id,
            at: state.clock.now(),
        };
        if !tx.close_shipment(id, payload.status, stamp).await? {
            return Err(AppError::new(ErrorCode::ShipmentClosed).into());
        }
        if payload.status == ShipmentStatus::Delivered {
            tx.set_order_status(shipment.order_id, OrderStatus::Completed, stamp)
                .await?;
        }

        let shipment = tx
            .get_shipment(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ShipmentNotFound))?;
        let view = composer::shipment_view(tx.as_mut(), shipment).await?;
        tx.commit().await?;

        tracing::info!(
            shipment_id = %id,
            order_id = %view.order.order.id,
            status = %payload.status,
            actor_id = %actor_id,
            "Shipment closed"
        );
        Ok(view)
    })
    .await
}

pub async fn list(
    state: &AppState,
    q: &ListQuery,
    session: Session,
    access: Access,
) -> ServiceResult<Vec<ShipmentView>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let shipments = tx
            .list_shipments(q, owner_filter(session.role, access))
            .await?;

        let mut views = Vec::with_capacity(shipments.len());
        for shipment in shipments {
            views.push(composer::shipment_view(tx.as_mut(), shipment).await?);
        }
        Ok(views)
    })
    .await
}

pub async fn get(
    state: &AppState,
    id: Uuid,
    session: Session,
    access: Access,
) -> ServiceResult<ShipmentView> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let shipment = tx
            .get_shipment(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ShipmentNotFound))?;
        let view = composer::shipment_view(tx.as_mut(), shipment).await?;

        match owner_filter(session.role, access) {
            ShipmentOwner::Courier(_) => access.ensure_owns(
                view.shipment.courier_id,
                ErrorCode::ShipmentOwnershipMismatch,
            )?,
            ShipmentOwner::Customer(_) => access.ensure_owns(
                view.order.order.customer_id,
                ErrorCode::OrderOwnershipMismatch,
            )?,
            ShipmentOwner::Any => {}
        }
        Ok(view)
    })
    .await
}
