//! Nested read models
//!
//! Built by the response composer; each embeds the entities its row
//! references instead of bare IDs.

use serde::{Deserialize, Serialize};

use super::{
    Category, Courier, Customer, Order, OrderLineItem, Payment, Product, Shipment, Stock,
    Supplier, Warehouse,
};

/// Line item with its product, as listed inside an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    #[serde(flatten)]
    pub item: OrderLineItem,
    pub product: Product,
}

/// Order with customer, fulfilling warehouse and priced line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Customer,
    pub warehouse: Warehouse,
    pub items: Vec<OrderItemView>,
}

/// Standalone line item (`/order-products`) with its order and product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemView {
    #[serde(flatten)]
    pub item: OrderLineItem,
    pub order: Order,
    pub product: Product,
}

/// Payment with its composed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,
    pub order: OrderView,
}

/// Shipment with its courier and composed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentView {
    #[serde(flatten)]
    pub shipment: Shipment,
    pub courier: Courier,
    pub order: OrderView,
}

/// Stock row with product and warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockView {
    #[serde(flatten)]
    pub stock: Stock,
    pub product: Product,
    pub warehouse: Warehouse,
}

/// Product with category and supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
    pub supplier: Supplier,
}

/// Result of placing an order: the composed order plus its pending payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    #[serde(flatten)]
    pub order: OrderView,
    pub payment: Payment,
}
