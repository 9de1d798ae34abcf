//! Payment initiator
//!
//! The pending payment is created by the order assembler; this module
//! confirms it. Confirmation flips the payment and its order in one
//! transaction and only then queues the receipt, so a rolled-back confirm
//! never mails anything.

use shared::error::{AppError, ErrorCode};
use shared::models::{OrderStatus, PaymentStatus, PaymentView};
use uuid::Uuid;

use super::{composer, with_deadline};
use crate::auth::Access;
use crate::db::{OrderRepo, Stamp};
use crate::error::ServiceResult;
use crate::notify::receipt::render_receipt;
use crate::state::AppState;

/// Mark a payment paid and its order confirmed
///
/// `access` is `Own(customer)` for customers; admins confirm any payment.
pub async fn confirm(
    state: &AppState,
    payment_id: Uuid,
    access: Access,
    actor_id: Uuid,
) -> ServiceResult<PaymentView> {
    let view = with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let stamp = Stamp {
            by: actor_id,
            at: state.clock.now(),
        };

        let payment = tx
            .lock_payment(payment_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
        let order = tx
            .get_order(payment.order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        access.ensure_owns(order.customer_id, ErrorCode::OrderOwnershipMismatch)?;

        if payment.status == PaymentStatus::Paid || !tx.mark_payment_paid(payment.id, stamp).await?
        {
            tracing::info!(payment_id = %payment_id, "Payment already confirmed");
            return Err(AppError::new(ErrorCode::PaymentAlreadyConfirmed).into());
        }
        tx.set_order_status(order.id, OrderStatus::Confirmed, stamp)
            .await?;

        let payment = shared::models::Payment {
            status: PaymentStatus::Paid,
            updated_by: Some(stamp.by),
            updated_at: Some(stamp.at),
            ..payment
        };
        let view = composer::payment_view(tx.as_mut(), payment).await?;
        tx.commit().await?;
        Ok(view)
    })
    .await?;

    tracing::info!(
        payment_id = %view.payment.id,
        order_id = %view.order.order.id,
        actor_id = %actor_id,
        "Payment confirmed"
    );
    state
        .notifier
        .submit(render_receipt(&view.order, &state.receipt_mailbox));

    Ok(view)
}
