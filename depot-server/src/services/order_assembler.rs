//! Order assembler
//!
//! Places an order in one store transaction:
//!
//! 1. nearest warehouse to the delivery point
//! 2. order row (`open`, delivery in three days)
//! 3. per product, in product-id order: ledger decrement, subtotal, line item
//! 4. total = Σ subtotals + delivery fee
//! 5. pending payment
//!
//! Any failure drops the transaction. Write conflicts reported by the store
//! replay the whole attempt, up to [`MAX_ATTEMPTS`] times.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Order, OrderCreate, OrderLineItem, OrderStatus, Payment, PaymentStatus, PlacedOrder,
};
use uuid::Uuid;

use super::{composer, stock_ledger, warehouse_selector, with_deadline};
use crate::db::{CatalogRepo, OrderRepo, Scope, Stamp};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, validate_coordinate, validate_quantity, validate_required_text,
};

pub const MAX_ATTEMPTS: u32 = 3;

/// Days between placement and the requested delivery time
pub const DELIVERY_LEAD_DAYS: i64 = 3;

/// Validate the request and merge duplicate product lines
///
/// The map's key order is the order in which product rows get locked.
pub fn merge_lines(request: &OrderCreate) -> Result<BTreeMap<Uuid, i32>, AppError> {
    validate_required_text(&request.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;
    validate_coordinate(request.latitude, request.longitude)?;

    if request.product.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let mut lines: BTreeMap<Uuid, i32> = BTreeMap::new();
    for line in &request.product {
        validate_quantity(line.quantity, "quantity")?;
        let entry = lines.entry(line.id).or_insert(0);
        *entry = entry.checked_add(line.quantity).ok_or_else(|| {
            AppError::with_message(ErrorCode::ValueOutOfRange, "quantity overflow")
        })?;
    }
    for quantity in lines.values() {
        validate_quantity(*quantity, "quantity")?;
    }
    Ok(lines)
}

/// Place an order for `customer_id`
pub async fn place_order(
    state: &AppState,
    customer_id: Uuid,
    request: &OrderCreate,
) -> ServiceResult<PlacedOrder> {
    let lines = merge_lines(request)?;

    with_deadline(state, async {
        let mut attempt = 1;
        loop {
            match try_place(state, customer_id, request, &lines).await {
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    let jitter = rand::thread_rng().gen_range(0..20);
                    let backoff = Duration::from_millis(25 * u64::from(attempt) + jitter);
                    tracing::warn!(
                        customer_id = %customer_id,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "Order placement hit a write conflict, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    })
    .await
}

fn money_overflow(field: &str) -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, format!("{field} overflow"))
        .with_detail("field", field)
}

async fn try_place(
    state: &AppState,
    customer_id: Uuid,
    request: &OrderCreate,
    lines: &BTreeMap<Uuid, i32>,
) -> ServiceResult<PlacedOrder> {
    let now = state.clock.now();
    let stamp = Stamp {
        by: customer_id,
        at: now,
    };

    let mut tx = state.store.begin().await?;

    let warehouse =
        warehouse_selector::nearest(tx.as_mut(), request.latitude, request.longitude).await?;

    let mut order = Order {
        id: state.ids.next_id(),
        customer_id,
        warehouse_id: warehouse.id,
        delivery_address: request.delivery_address.trim().to_string(),
        latitude: request.latitude,
        longitude: request.longitude,
        delivery_datetime: now + chrono::Duration::days(DELIVERY_LEAD_DAYS),
        status: OrderStatus::Open,
        total_price: Decimal::ZERO,
        is_delete: false,
        created_by: customer_id,
        created_at: now,
        updated_by: None,
        updated_at: None,
    };
    tx.insert_order(&order).await?;

    let mut items_total = Decimal::ZERO;
    for (&product_id, &quantity) in lines {
        stock_ledger::decrement(tx.as_mut(), warehouse.id, product_id, quantity, stamp).await?;

        let product = tx
            .get_product(product_id, Scope::Active)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
        let sub_total = product
            .price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| money_overflow("sub_total"))?;

        let item = OrderLineItem {
            id: state.ids.next_id(),
            order_id: order.id,
            product_id,
            quantity,
            sub_total,
            is_delete: false,
            created_by: customer_id,
            created_at: now,
            updated_by: None,
            updated_at: None,
        };
        tx.insert_line_item(&item).await?;
        items_total = items_total
            .checked_add(sub_total)
            .ok_or_else(|| money_overflow("total_price"))?;
    }

    let delivery_fee = tx.get_configuration().await?.delivery_fee;
    order.total_price = items_total
        .checked_add(delivery_fee)
        .ok_or_else(|| money_overflow("total_price"))?;
    tx.set_order_total(order.id, order.total_price).await?;

    let payment = Payment {
        id: state.ids.next_id(),
        order_id: order.id,
        status: PaymentStatus::Unpaid,
        is_delete: false,
        created_by: customer_id,
        created_at: now,
        updated_by: None,
        updated_at: None,
    };
    tx.insert_payment(&payment).await?;

    let view = composer::order_view(tx.as_mut(), order).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = %view.order.id,
        customer_id = %customer_id,
        warehouse_id = %warehouse.id,
        total = %view.order.total_price,
        "Order placed"
    );

    Ok(PlacedOrder {
        order: view,
        payment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderLineRequest;

    fn request(lines: &[(Uuid, i32)]) -> OrderCreate {
        OrderCreate {
            delivery_address: "1 Jalan Ampang".into(),
            latitude: Decimal::new(306, 2),
            longitude: Decimal::new(10156, 2),
            product: lines
                .iter()
                .map(|&(id, quantity)| OrderLineRequest { id, quantity })
                .collect(),
        }
    }

    #[test]
    fn test_duplicate_lines_are_merged_in_id_order() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let merged = merge_lines(&request(&[(b, 1), (a, 2), (b, 3)])).unwrap();
        assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![(a, 2), (b, 4)]);
    }

    #[test]
    fn test_empty_and_invalid_requests() {
        assert_eq!(
            merge_lines(&request(&[])).unwrap_err().code,
            ErrorCode::OrderEmpty
        );
        assert_eq!(
            merge_lines(&request(&[(Uuid::new_v4(), 0)])).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );

        let mut blank = request(&[(Uuid::new_v4(), 1)]);
        blank.delivery_address = "  ".into();
        assert_eq!(merge_lines(&blank).unwrap_err().code, ErrorCode::RequiredField);
    }
}
