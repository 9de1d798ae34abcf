//! Response composer
//!
//! Expands foreign keys into embedded entities. References are resolved
//! including soft-deleted rows, so a historical order still shows the
//! product it was priced from. A reference that cannot be resolved at all
//! fails the whole response with `CompositionError`.

use shared::error::AppError;
use shared::models::{
    LineItemView, Order, OrderItemView, OrderLineItem, OrderView, Payment, PaymentView, Product,
    ProductView, Shipment, ShipmentView, Stock, StockView,
};
use uuid::Uuid;

use crate::db::{AccountRepo, CatalogRepo, OrderRepo, Scope, StoreTx};
use crate::error::ServiceResult;

fn missing(kind: &str, id: Uuid) -> AppError {
    tracing::error!(kind = kind, id = %id, "Dangling reference while composing response");
    AppError::composition(format!("{kind} {id}"))
}

async fn product(tx: &mut dyn StoreTx, id: Uuid) -> ServiceResult<Product> {
    Ok(tx
        .get_product(id, Scope::IncludeDeleted)
        .await?
        .ok_or_else(|| missing("product", id))?)
}

async fn order(tx: &mut dyn StoreTx, id: Uuid) -> ServiceResult<Order> {
    Ok(tx.get_order(id).await?.ok_or_else(|| missing("order", id))?)
}

pub async fn order_view(tx: &mut dyn StoreTx, order: Order) -> ServiceResult<OrderView> {
    let customer = tx
        .get_customer(order.customer_id)
        .await?
        .ok_or_else(|| missing("customer", order.customer_id))?;
    let warehouse = tx
        .get_warehouse(order.warehouse_id, Scope::IncludeDeleted)
        .await?
        .ok_or_else(|| missing("warehouse", order.warehouse_id))?;

    let lines = tx.list_line_items(order.id).await?;
    let mut items = Vec::with_capacity(lines.len());
    for item in lines {
        let product = product(tx, item.product_id).await?;
        items.push(OrderItemView { item, product });
    }

    Ok(OrderView {
        order,
        customer,
        warehouse,
        items,
    })
}

pub async fn line_item_view(
    tx: &mut dyn StoreTx,
    item: OrderLineItem,
) -> ServiceResult<LineItemView> {
    let order = order(tx, item.order_id).await?;
    let product = product(tx, item.product_id).await?;
    Ok(LineItemView {
        item,
        order,
        product,
    })
}

pub async fn payment_view(tx: &mut dyn StoreTx, payment: Payment) -> ServiceResult<PaymentView> {
    let order = order(tx, payment.order_id).await?;
    let order = order_view(tx, order).await?;
    Ok(PaymentView { payment, order })
}

pub async fn shipment_view(
    tx: &mut dyn StoreTx,
    shipment: Shipment,
) -> ServiceResult<ShipmentView> {
    let courier = tx
        .get_courier(shipment.courier_id)
        .await?
        .ok_or_else(|| missing("courier", shipment.courier_id))?;
    let order = order(tx, shipment.order_id).await?;
    let order = order_view(tx, order).await?;
    Ok(ShipmentView {
        shipment,
        courier,
        order,
    })
}

pub async fn stock_view(tx: &mut dyn StoreTx, stock: Stock) -> ServiceResult<StockView> {
    let product = product(tx, stock.product_id).await?;
    let warehouse = tx
        .get_warehouse(stock.warehouse_id, Scope::IncludeDeleted)
        .await?
        .ok_or_else(|| missing("warehouse", stock.warehouse_id))?;
    Ok(StockView {
        stock,
        product,
        warehouse,
    })
}

pub async fn product_view(tx: &mut dyn StoreTx, product: Product) -> ServiceResult<ProductView> {
    let category = tx
        .get_category(product.category_id, Scope::IncludeDeleted)
        .await?
        .ok_or_else(|| missing("category", product.category_id))?;
    let supplier = tx
        .get_supplier(product.supplier_id)
        .await?
        .ok_or_else(|| missing("supplier", product.supplier_id))?;
    Ok(ProductView {
        product,
        category,
        supplier,
    })
}
