//! Database access layer
//!
//! Services talk to persistence through [`Store`] and the transaction it
//! hands out ([`StoreTx`]). Every read and write happens inside a
//! transaction; dropping a `StoreTx` without calling `commit` rolls it back.
//!
//! Two backends:
//! - [`postgres::PgStore`]: sqlx / PostgreSQL, row locks + conditional updates
//! - [`memory::MemoryStore`]: in-process tables, one transaction at a time

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{
    Admin, Category, Configuration, Courier, Customer, ListFilter, Order, OrderLineItem,
    OrderStatus, Payment, Product, Role, Shipment, ShipmentStatus, SortDir, Stock, Supplier,
    Warehouse, WarehouseDistance,
};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Serialization failure or deadlock; the whole transaction may be retried
    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepoError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepoError::Conflict(_))
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // serialization_failure, deadlock_detected
                Some("40001") | Some("40P01") => RepoError::Conflict(db.message().to_string()),
                // unique_violation
                Some("23505") => RepoError::Duplicate(
                    db.constraint().unwrap_or("unique constraint").to_string(),
                ),
                _ => RepoError::Database(err.to_string()),
            },
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Whether point lookups see soft-deleted rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Exclude soft-deleted rows (default for API lookups)
    Active,
    /// Include soft-deleted rows (composing historical orders)
    IncludeDeleted,
}

/// Normalized list parameters
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub limit: i64,
    pub offset: i64,
    pub search: Option<String>,
    pub dir: SortDir,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::from(&ListFilter::default())
    }
}

impl From<&ListFilter> for ListQuery {
    fn from(filter: &ListFilter) -> Self {
        Self {
            limit: filter.limit(),
            offset: filter.offset(),
            search: filter.search().map(str::to_lowercase),
            dir: filter.dir(),
        }
    }
}

/// Whose shipments a list query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentOwner {
    Any,
    Courier(Uuid),
    /// Shipments of this customer's orders
    Customer(Uuid),
}

/// Who changed a row, and when
#[derive(Debug, Clone, Copy)]
pub struct Stamp {
    pub by: Uuid,
    pub at: DateTime<Utc>,
}

/// Entry point for persistence
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>>;
}

/// One open transaction
#[async_trait]
pub trait StoreTx:
    CatalogRepo + InventoryRepo + OrderRepo + ShipmentRepo + AccountRepo + Send
{
    /// Make every write of this transaction visible at once
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

/// Warehouses, categories, products
#[async_trait]
pub trait CatalogRepo: Send {
    async fn get_warehouse(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Warehouse>>;
    async fn list_warehouses(&mut self, q: &ListQuery) -> RepoResult<Vec<Warehouse>>;
    /// Active warehouses ranked by planar distance to (lat, lon), ties by id
    async fn warehouses_by_distance(
        &mut self,
        latitude: Decimal,
        longitude: Decimal,
        q: &ListQuery,
    ) -> RepoResult<Vec<WarehouseDistance>>;
    async fn insert_warehouse(&mut self, warehouse: &Warehouse) -> RepoResult<()>;
    async fn update_warehouse(&mut self, warehouse: &Warehouse) -> RepoResult<()>;
    async fn delete_warehouse(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool>;

    async fn get_category(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Category>>;
    async fn list_categories(&mut self, q: &ListQuery) -> RepoResult<Vec<Category>>;
    async fn insert_category(&mut self, category: &Category) -> RepoResult<()>;

    async fn get_product(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Product>>;
    async fn list_products(&mut self, q: &ListQuery) -> RepoResult<Vec<Product>>;
    async fn insert_product(&mut self, product: &Product) -> RepoResult<()>;
    /// Writes the descriptive fields only; aggregate stock is left alone
    async fn update_product(&mut self, product: &Product) -> RepoResult<()>;
    async fn delete_product(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool>;
    /// Take the product row lock that serializes aggregate recomputation
    async fn lock_product(&mut self, id: Uuid) -> RepoResult<bool>;
    async fn set_product_stock(&mut self, id: Uuid, aggregate: i32, stamp: Stamp)
    -> RepoResult<()>;
}

/// Per-warehouse stock rows
#[async_trait]
pub trait InventoryRepo: Send {
    async fn get_stock(&mut self, id: Uuid) -> RepoResult<Option<Stock>>;
    /// Active row for the pair, locked for the rest of the transaction
    async fn find_stock(&mut self, warehouse_id: Uuid, product_id: Uuid)
    -> RepoResult<Option<Stock>>;
    async fn list_stocks(&mut self, q: &ListQuery) -> RepoResult<Vec<Stock>>;
    async fn insert_stock(&mut self, stock: &Stock) -> RepoResult<()>;
    async fn set_stock_quantity(&mut self, id: Uuid, quantity: i32, stamp: Stamp)
    -> RepoResult<bool>;
    /// Subtract `quantity` only if enough is on hand; `None` when it is not
    async fn decrement_stock(&mut self, id: Uuid, quantity: i32, stamp: Stamp)
    -> RepoResult<Option<i32>>;
    /// Sum of active stock rows for the product, widened so it cannot overflow
    async fn sum_stock(&mut self, product_id: Uuid) -> RepoResult<i64>;
}

/// Orders, line items, payments, configuration
#[async_trait]
pub trait OrderRepo: Send {
    async fn insert_order(&mut self, order: &Order) -> RepoResult<()>;
    async fn get_order(&mut self, id: Uuid) -> RepoResult<Option<Order>>;
    async fn list_orders(&mut self, q: &ListQuery, customer: Option<Uuid>)
    -> RepoResult<Vec<Order>>;
    async fn set_order_total(&mut self, id: Uuid, total: Decimal) -> RepoResult<()>;
    async fn set_order_status(&mut self, id: Uuid, status: OrderStatus, stamp: Stamp)
    -> RepoResult<()>;
    /// Soft-deletes the order together with its line items and payment
    async fn delete_order(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool>;

    async fn insert_line_item(&mut self, item: &OrderLineItem) -> RepoResult<()>;
    async fn get_line_item(&mut self, id: Uuid) -> RepoResult<Option<OrderLineItem>>;
    async fn list_line_items(&mut self, order_id: Uuid) -> RepoResult<Vec<OrderLineItem>>;
    async fn list_all_line_items(
        &mut self,
        q: &ListQuery,
        customer: Option<Uuid>,
    ) -> RepoResult<Vec<OrderLineItem>>;

    async fn insert_payment(&mut self, payment: &Payment) -> RepoResult<()>;
    async fn get_payment(&mut self, id: Uuid) -> RepoResult<Option<Payment>>;
    /// Payment row, locked for the rest of the transaction
    async fn lock_payment(&mut self, id: Uuid) -> RepoResult<Option<Payment>>;
    async fn list_payments(&mut self, q: &ListQuery, customer: Option<Uuid>)
    -> RepoResult<Vec<Payment>>;
    /// Unpaid → Paid; `false` if the payment was not unpaid
    async fn mark_payment_paid(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool>;

    async fn get_configuration(&mut self) -> RepoResult<Configuration>;
    async fn set_delivery_fee(&mut self, fee: Decimal, stamp: Stamp) -> RepoResult<Configuration>;
}

/// Courier deliveries of confirmed orders
#[async_trait]
pub trait ShipmentRepo: Send {
    async fn insert_shipment(&mut self, shipment: &Shipment) -> RepoResult<()>;
    async fn get_shipment(&mut self, id: Uuid) -> RepoResult<Option<Shipment>>;
    /// Shipment row, locked for the rest of the transaction
    async fn lock_shipment(&mut self, id: Uuid) -> RepoResult<Option<Shipment>>;
    /// Pending or delivered shipment of the order
    async fn active_shipment(&mut self, order_id: Uuid) -> RepoResult<Option<Shipment>>;
    async fn list_shipments(&mut self, q: &ListQuery, owner: ShipmentOwner)
    -> RepoResult<Vec<Shipment>>;
    /// Pending → `status`; `false` if the shipment was no longer pending
    async fn close_shipment(&mut self, id: Uuid, status: ShipmentStatus, stamp: Stamp)
    -> RepoResult<bool>;
}

/// Customers, suppliers, couriers, admins
#[async_trait]
pub trait AccountRepo: Send {
    async fn get_customer(&mut self, id: Uuid) -> RepoResult<Option<Customer>>;
    async fn find_customer_by_email(&mut self, email: &str) -> RepoResult<Option<Customer>>;
    async fn insert_customer(&mut self, customer: &Customer) -> RepoResult<()>;

    async fn get_supplier(&mut self, id: Uuid) -> RepoResult<Option<Supplier>>;
    async fn find_supplier_by_email(&mut self, email: &str) -> RepoResult<Option<Supplier>>;
    async fn insert_supplier(&mut self, supplier: &Supplier) -> RepoResult<()>;

    async fn get_courier(&mut self, id: Uuid) -> RepoResult<Option<Courier>>;
    async fn find_courier_by_email(&mut self, email: &str) -> RepoResult<Option<Courier>>;
    async fn list_couriers(&mut self, q: &ListQuery) -> RepoResult<Vec<Courier>>;
    async fn insert_courier(&mut self, courier: &Courier) -> RepoResult<()>;

    async fn get_admin(&mut self, id: Uuid) -> RepoResult<Option<Admin>>;
    async fn find_admin_by_username(&mut self, username: &str) -> RepoResult<Option<Admin>>;
    async fn insert_admin(&mut self, admin: &Admin) -> RepoResult<()>;

    /// Replace the password hash of account `id` in `role`'s table
    async fn set_password_hash(
        &mut self,
        role: Role,
        id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> RepoResult<bool>;
}
