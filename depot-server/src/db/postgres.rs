//! PostgreSQL store
//!
//! One `PgTx` wraps one `sqlx::Transaction`. Rows that a workflow later
//! updates are read with `FOR UPDATE`; stock decrements are conditional
//! updates that never take a quantity below zero.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::models::{
    Admin, Category, Configuration, Courier, Customer, Order, OrderLineItem, OrderStatus, Payment,
    Product, Role, Shipment, ShipmentStatus, SortDir, Stock, Supplier, Warehouse,
    WarehouseDistance,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    AccountRepo, CatalogRepo, InventoryRepo, ListQuery, OrderRepo, RepoResult, Scope,
    ShipmentOwner, ShipmentRepo, Stamp, Store, StoreTx,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// sqlx-backed [`Store`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and run pending migrations
    pub async fn connect(database_url: &str) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let PgTx { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}

fn dir_sql(dir: SortDir) -> &'static str {
    match dir {
        SortDir::Asc => "ASC",
        SortDir::Desc => "DESC",
    }
}

fn include_deleted(scope: Scope) -> bool {
    scope == Scope::IncludeDeleted
}

#[derive(sqlx::FromRow)]
struct DistanceRow {
    #[sqlx(flatten)]
    warehouse: Warehouse,
    distance: f64,
}

// ════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════

#[async_trait]
impl CatalogRepo for PgTx {
    async fn get_warehouse(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Warehouse>> {
        let row = sqlx::query_as::<_, Warehouse>(
            "SELECT * FROM warehouse WHERE id = $1 AND ($2 OR is_delete = FALSE)",
        )
        .bind(id)
        .bind(include_deleted(scope))
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_warehouses(&mut self, q: &ListQuery) -> RepoResult<Vec<Warehouse>> {
        let sql = format!(
            r#"
            SELECT * FROM warehouse
            WHERE is_delete = FALSE
              AND ($1::TEXT IS NULL OR LOWER(name) LIKE '%' || $1 || '%')
            ORDER BY LOWER(name) {dir}, id {dir}
            LIMIT $2 OFFSET $3
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, Warehouse>(&sql)
            .bind(q.search.as_deref())
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn warehouses_by_distance(
        &mut self,
        latitude: Decimal,
        longitude: Decimal,
        q: &ListQuery,
    ) -> RepoResult<Vec<WarehouseDistance>> {
        let rows = sqlx::query_as::<_, DistanceRow>(
            r#"
            SELECT *,
                SQRT(
                    POW(69.1 * (latitude::FLOAT8 - $1), 2) +
                    POW(69.1 * ($2 - longitude::FLOAT8) * COS(latitude::FLOAT8 / 57.3), 2)
                ) AS distance
            FROM warehouse
            WHERE is_delete = FALSE
              AND ($3::TEXT IS NULL OR LOWER(name) LIKE '%' || $3 || '%')
            ORDER BY distance ASC, id ASC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(latitude.to_f64().unwrap_or_default())
        .bind(longitude.to_f64().unwrap_or_default())
        .bind(q.search.as_deref())
        .bind(q.limit)
        .bind(q.offset)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| WarehouseDistance {
                warehouse: r.warehouse,
                distance: r.distance,
            })
            .collect())
    }

    async fn insert_warehouse(&mut self, w: &Warehouse) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO warehouse (
                id, name, address, latitude, longitude, phone_no,
                is_delete, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8)
            "#,
        )
        .bind(w.id)
        .bind(&w.name)
        .bind(&w.address)
        .bind(w.latitude)
        .bind(w.longitude)
        .bind(&w.phone_no)
        .bind(w.created_by)
        .bind(w.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn update_warehouse(&mut self, w: &Warehouse) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE warehouse
            SET name = $2, address = $3, latitude = $4, longitude = $5, phone_no = $6,
                updated_by = $7, updated_at = $8
            WHERE id = $1 AND is_delete = FALSE
            "#,
        )
        .bind(w.id)
        .bind(&w.name)
        .bind(&w.address)
        .bind(w.latitude)
        .bind(w.longitude)
        .bind(&w.phone_no)
        .bind(w.updated_by)
        .bind(w.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn delete_warehouse(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE warehouse SET is_delete = TRUE, updated_by = $2, updated_at = $3
            WHERE id = $1 AND is_delete = FALSE
            "#,
        )
        .bind(id)
        .bind(stamp.by)
        .bind(stamp.at)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();
        Ok(rows > 0)
    }

    async fn get_category(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT * FROM category WHERE id = $1 AND ($2 OR is_delete = FALSE)",
        )
        .bind(id)
        .bind(include_deleted(scope))
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_categories(&mut self, q: &ListQuery) -> RepoResult<Vec<Category>> {
        let sql = format!(
            r#"
            SELECT * FROM category
            WHERE is_delete = FALSE
              AND ($1::TEXT IS NULL OR LOWER(name) LIKE '%' || $1 || '%')
            ORDER BY LOWER(name) {dir}, id {dir}
            LIMIT $2 OFFSET $3
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, Category>(&sql)
            .bind(q.search.as_deref())
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn insert_category(&mut self, c: &Category) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO category (id, name, is_delete, created_by, created_at)
            VALUES ($1, $2, FALSE, $3, $4)
            "#,
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(c.created_by)
        .bind(c.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn get_product(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            "SELECT * FROM product WHERE id = $1 AND ($2 OR is_delete = FALSE)",
        )
        .bind(id)
        .bind(include_deleted(scope))
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_products(&mut self, q: &ListQuery) -> RepoResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT * FROM product
            WHERE is_delete = FALSE
              AND ($1::TEXT IS NULL OR LOWER(name) LIKE '%' || $1 || '%')
            ORDER BY LOWER(name) {dir}, id {dir}
            LIMIT $2 OFFSET $3
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, Product>(&sql)
            .bind(q.search.as_deref())
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn insert_product(&mut self, p: &Product) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO product (
                id, name, description, price, category_id, supplier_id, stock,
                is_delete, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $9)
            "#,
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.price)
        .bind(p.category_id)
        .bind(p.supplier_id)
        .bind(p.stock)
        .bind(p.created_by)
        .bind(p.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn update_product(&mut self, p: &Product) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE product
            SET name = $2, description = $3, price = $4, category_id = $5,
                updated_by = $6, updated_at = $7
            WHERE id = $1 AND is_delete = FALSE
            "#,
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.price)
        .bind(p.category_id)
        .bind(p.updated_by)
        .bind(p.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn delete_product(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE product SET is_delete = TRUE, updated_by = $2, updated_at = $3
            WHERE id = $1 AND is_delete = FALSE
            "#,
        )
        .bind(id)
        .bind(stamp.by)
        .bind(stamp.at)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();
        Ok(rows > 0)
    }

    async fn lock_product(&mut self, id: Uuid) -> RepoResult<bool> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM product WHERE id = $1 AND is_delete = FALSE FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row.is_some())
    }

    async fn set_product_stock(
        &mut self,
        id: Uuid,
        aggregate: i32,
        stamp: Stamp,
    ) -> RepoResult<()> {
        sqlx::query("UPDATE product SET stock = $2, updated_by = $3, updated_at = $4 WHERE id = $1")
            .bind(id)
            .bind(aggregate)
            .bind(stamp.by)
            .bind(stamp.at)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════
// Inventory
// ════════════════════════════════════════════════════════════════

#[async_trait]
impl InventoryRepo for PgTx {
    async fn get_stock(&mut self, id: Uuid) -> RepoResult<Option<Stock>> {
        let row =
            sqlx::query_as::<_, Stock>("SELECT * FROM stock WHERE id = $1 AND is_delete = FALSE")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row)
    }

    async fn find_stock(
        &mut self,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> RepoResult<Option<Stock>> {
        let row = sqlx::query_as::<_, Stock>(
            r#"
            SELECT * FROM stock
            WHERE warehouse_id = $1 AND product_id = $2 AND is_delete = FALSE
            FOR UPDATE
            "#,
        )
        .bind(warehouse_id)
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_stocks(&mut self, q: &ListQuery) -> RepoResult<Vec<Stock>> {
        let sql = format!(
            r#"
            SELECT * FROM stock
            WHERE is_delete = FALSE
            ORDER BY created_at {dir}, id {dir}
            LIMIT $1 OFFSET $2
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, Stock>(&sql)
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn insert_stock(&mut self, s: &Stock) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stock (
                id, warehouse_id, product_id, stock, is_delete, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, FALSE, $5, $6)
            "#,
        )
        .bind(s.id)
        .bind(s.warehouse_id)
        .bind(s.product_id)
        .bind(s.stock)
        .bind(s.created_by)
        .bind(s.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn set_stock_quantity(
        &mut self,
        id: Uuid,
        quantity: i32,
        stamp: Stamp,
    ) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE stock SET stock = $2, updated_by = $3, updated_at = $4
            WHERE id = $1 AND is_delete = FALSE
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(stamp.by)
        .bind(stamp.at)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();
        Ok(rows > 0)
    }

    async fn decrement_stock(
        &mut self,
        id: Uuid,
        quantity: i32,
        stamp: Stamp,
    ) -> RepoResult<Option<i32>> {
        let remaining = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE stock SET stock = stock - $2, updated_by = $3, updated_at = $4
            WHERE id = $1 AND is_delete = FALSE AND stock >= $2
            RETURNING stock
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(stamp.by)
        .bind(stamp.at)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(remaining)
    }

    async fn sum_stock(&mut self, product_id: Uuid) -> RepoResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(stock), 0)::INT8 FROM stock
            WHERE product_id = $1 AND is_delete = FALSE
            "#,
        )
        .bind(product_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(total)
    }
}

// ════════════════════════════════════════════════════════════════
// Orders, line items, payments
// ════════════════════════════════════════════════════════════════

#[async_trait]
impl OrderRepo for PgTx {
    async fn insert_order(&mut self, o: &Order) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_id, warehouse_id, delivery_address, latitude, longitude,
                delivery_datetime, status, total_price, is_delete, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $11)
            "#,
        )
        .bind(o.id)
        .bind(o.customer_id)
        .bind(o.warehouse_id)
        .bind(&o.delivery_address)
        .bind(o.latitude)
        .bind(o.longitude)
        .bind(o.delivery_datetime)
        .bind(o.status)
        .bind(o.total_price)
        .bind(o.created_by)
        .bind(o.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn get_order(&mut self, id: Uuid) -> RepoResult<Option<Order>> {
        let row =
            sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND is_delete = FALSE")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row)
    }

    async fn list_orders(
        &mut self,
        q: &ListQuery,
        customer: Option<Uuid>,
    ) -> RepoResult<Vec<Order>> {
        let sql = format!(
            r#"
            SELECT * FROM orders
            WHERE is_delete = FALSE AND ($1::UUID IS NULL OR customer_id = $1)
            ORDER BY created_at {dir}, id {dir}
            LIMIT $2 OFFSET $3
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, Order>(&sql)
            .bind(customer)
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn set_order_total(&mut self, id: Uuid, total: Decimal) -> RepoResult<()> {
        sqlx::query("UPDATE orders SET total_price = $2 WHERE id = $1")
            .bind(id)
            .bind(total)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn set_order_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
        stamp: Stamp,
    ) -> RepoResult<()> {
        sqlx::query("UPDATE orders SET status = $2, updated_by = $3, updated_at = $4 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(stamp.by)
            .bind(stamp.at)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_order(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE orders SET is_delete = TRUE, updated_by = $2, updated_at = $3
            WHERE id = $1 AND is_delete = FALSE
            "#,
        )
        .bind(id)
        .bind(stamp.by)
        .bind(stamp.at)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Ok(false);
        }

        for table in ["order_product", "payment"] {
            let sql = format!(
                "UPDATE {table} SET is_delete = TRUE, updated_by = $2, updated_at = $3 \
                 WHERE order_id = $1 AND is_delete = FALSE"
            );
            sqlx::query(&sql)
                .bind(id)
                .bind(stamp.by)
                .bind(stamp.at)
                .execute(&mut *self.tx)
                .await?;
        }
        Ok(true)
    }

    async fn insert_line_item(&mut self, i: &OrderLineItem) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO order_product (
                id, order_id, product_id, quantity, sub_total, is_delete, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            "#,
        )
        .bind(i.id)
        .bind(i.order_id)
        .bind(i.product_id)
        .bind(i.quantity)
        .bind(i.sub_total)
        .bind(i.created_by)
        .bind(i.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn get_line_item(&mut self, id: Uuid) -> RepoResult<Option<OrderLineItem>> {
        let row = sqlx::query_as::<_, OrderLineItem>(
            "SELECT * FROM order_product WHERE id = $1 AND is_delete = FALSE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_line_items(&mut self, order_id: Uuid) -> RepoResult<Vec<OrderLineItem>> {
        let rows = sqlx::query_as::<_, OrderLineItem>(
            r#"
            SELECT * FROM order_product
            WHERE order_id = $1 AND is_delete = FALSE
            ORDER BY created_at, product_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn list_all_line_items(
        &mut self,
        q: &ListQuery,
        customer: Option<Uuid>,
    ) -> RepoResult<Vec<OrderLineItem>> {
        let sql = format!(
            r#"
            SELECT op.* FROM order_product op
            JOIN orders o ON o.id = op.order_id
            WHERE op.is_delete = FALSE AND ($1::UUID IS NULL OR o.customer_id = $1)
            ORDER BY op.created_at {dir}, op.id {dir}
            LIMIT $2 OFFSET $3
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, OrderLineItem>(&sql)
            .bind(customer)
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn insert_payment(&mut self, p: &Payment) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payment (id, order_id, status, is_delete, created_by, created_at)
            VALUES ($1, $2, $3, FALSE, $4, $5)
            "#,
        )
        .bind(p.id)
        .bind(p.order_id)
        .bind(p.status)
        .bind(p.created_by)
        .bind(p.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn get_payment(&mut self, id: Uuid) -> RepoResult<Option<Payment>> {
        let row =
            sqlx::query_as::<_, Payment>("SELECT * FROM payment WHERE id = $1 AND is_delete = FALSE")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row)
    }

    async fn lock_payment(&mut self, id: Uuid) -> RepoResult<Option<Payment>> {
        let row = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payment WHERE id = $1 AND is_delete = FALSE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_payments(
        &mut self,
        q: &ListQuery,
        customer: Option<Uuid>,
    ) -> RepoResult<Vec<Payment>> {
        let sql = format!(
            r#"
            SELECT p.* FROM payment p
            JOIN orders o ON o.id = p.order_id
            WHERE p.is_delete = FALSE AND ($1::UUID IS NULL OR o.customer_id = $1)
            ORDER BY p.created_at {dir}, p.id {dir}
            LIMIT $2 OFFSET $3
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, Payment>(&sql)
            .bind(customer)
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn mark_payment_paid(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE payment SET status = 'paid', updated_by = $2, updated_at = $3
            WHERE id = $1 AND is_delete = FALSE AND status = 'unpaid'
            "#,
        )
        .bind(id)
        .bind(stamp.by)
        .bind(stamp.at)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();
        Ok(rows > 0)
    }

    async fn get_configuration(&mut self) -> RepoResult<Configuration> {
        let row = sqlx::query_as::<_, Configuration>(
            "SELECT delivery_fee, updated_by, updated_at FROM configuration WHERE id = 1",
        )
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn set_delivery_fee(&mut self, fee: Decimal, stamp: Stamp) -> RepoResult<Configuration> {
        let row = sqlx::query_as::<_, Configuration>(
            r#"
            UPDATE configuration SET delivery_fee = $1, updated_by = $2, updated_at = $3
            WHERE id = 1
            RETURNING delivery_fee, updated_by, updated_at
            "#,
        )
        .bind(fee)
        .bind(stamp.by)
        .bind(stamp.at)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }
}

// ════════════════════════════════════════════════════════════════
// Shipments
// ════════════════════════════════════════════════════════════════

#[async_trait]
impl ShipmentRepo for PgTx {
    async fn insert_shipment(&mut self, s: &Shipment) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shipment (id, courier_id, order_id, status, is_delete, created_by, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5, $6)
            "#,
        )
        .bind(s.id)
        .bind(s.courier_id)
        .bind(s.order_id)
        .bind(s.status)
        .bind(s.created_by)
        .bind(s.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn get_shipment(&mut self, id: Uuid) -> RepoResult<Option<Shipment>> {
        let row = sqlx::query_as::<_, Shipment>(
            "SELECT * FROM shipment WHERE id = $1 AND is_delete = FALSE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn lock_shipment(&mut self, id: Uuid) -> RepoResult<Option<Shipment>> {
        let row = sqlx::query_as::<_, Shipment>(
            "SELECT * FROM shipment WHERE id = $1 AND is_delete = FALSE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn active_shipment(&mut self, order_id: Uuid) -> RepoResult<Option<Shipment>> {
        let row = sqlx::query_as::<_, Shipment>(
            r#"
            SELECT * FROM shipment
            WHERE order_id = $1 AND is_delete = FALSE AND status <> 'failed'
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn list_shipments(
        &mut self,
        q: &ListQuery,
        owner: ShipmentOwner,
    ) -> RepoResult<Vec<Shipment>> {
        let (courier, customer) = match owner {
            ShipmentOwner::Any => (None, None),
            ShipmentOwner::Courier(id) => (Some(id), None),
            ShipmentOwner::Customer(id) => (None, Some(id)),
        };
        let sql = format!(
            r#"
            SELECT s.* FROM shipment s
            JOIN orders o ON o.id = s.order_id
            WHERE s.is_delete = FALSE
              AND ($1::UUID IS NULL OR s.courier_id = $1)
              AND ($2::UUID IS NULL OR o.customer_id = $2)
            ORDER BY s.created_at {dir}, s.id {dir}
            LIMIT $3 OFFSET $4
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, Shipment>(&sql)
            .bind(courier)
            .bind(customer)
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn close_shipment(
        &mut self,
        id: Uuid,
        status: ShipmentStatus,
        stamp: Stamp,
    ) -> RepoResult<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE shipment SET status = $2, updated_by = $3, updated_at = $4
            WHERE id = $1 AND is_delete = FALSE AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(stamp.by)
        .bind(stamp.at)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();
        Ok(rows > 0)
    }
}

// ════════════════════════════════════════════════════════════════
// Accounts
// ════════════════════════════════════════════════════════════════

#[async_trait]
impl AccountRepo for PgTx {
    async fn get_customer(&mut self, id: Uuid) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, Customer>("SELECT * FROM customer WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn find_customer_by_email(&mut self, email: &str) -> RepoResult<Option<Customer>> {
        let row =
            sqlx::query_as::<_, Customer>("SELECT * FROM customer WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row)
    }

    async fn insert_customer(&mut self, c: &Customer) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customer (
                id, name, gender, date_of_birth, address, phone_no, email,
                password_hash, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(c.gender)
        .bind(c.date_of_birth)
        .bind(&c.address)
        .bind(&c.phone_no)
        .bind(&c.email)
        .bind(&c.password_hash)
        .bind(c.is_active)
        .bind(c.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn get_supplier(&mut self, id: Uuid) -> RepoResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, Supplier>("SELECT * FROM supplier WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn find_supplier_by_email(&mut self, email: &str) -> RepoResult<Option<Supplier>> {
        let row =
            sqlx::query_as::<_, Supplier>("SELECT * FROM supplier WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row)
    }

    async fn insert_supplier(&mut self, s: &Supplier) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO supplier (
                id, name, phone_no, email, password_hash, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(s.id)
        .bind(&s.name)
        .bind(&s.phone_no)
        .bind(&s.email)
        .bind(&s.password_hash)
        .bind(s.is_active)
        .bind(s.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn get_courier(&mut self, id: Uuid) -> RepoResult<Option<Courier>> {
        let row = sqlx::query_as::<_, Courier>("SELECT * FROM courier WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn find_courier_by_email(&mut self, email: &str) -> RepoResult<Option<Courier>> {
        let row =
            sqlx::query_as::<_, Courier>("SELECT * FROM courier WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row)
    }

    async fn list_couriers(&mut self, q: &ListQuery) -> RepoResult<Vec<Courier>> {
        let sql = format!(
            r#"
            SELECT * FROM courier
            WHERE ($1::TEXT IS NULL OR LOWER(name) LIKE '%' || $1 || '%')
            ORDER BY LOWER(name) {dir}, id {dir}
            LIMIT $2 OFFSET $3
            "#,
            dir = dir_sql(q.dir)
        );
        let rows = sqlx::query_as::<_, Courier>(&sql)
            .bind(q.search.as_deref())
            .bind(q.limit)
            .bind(q.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn insert_courier(&mut self, c: &Courier) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courier (
                id, name, phone_no, email, password_hash, is_active, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(&c.phone_no)
        .bind(&c.email)
        .bind(&c.password_hash)
        .bind(c.is_active)
        .bind(c.created_by)
        .bind(c.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn get_admin(&mut self, id: Uuid) -> RepoResult<Option<Admin>> {
        let row = sqlx::query_as::<_, Admin>(
            "SELECT id, username, password_hash, created_at FROM admin WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn find_admin_by_username(&mut self, username: &str) -> RepoResult<Option<Admin>> {
        let row = sqlx::query_as::<_, Admin>("SELECT * FROM admin WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn insert_admin(&mut self, a: &Admin) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(a.id)
        .bind(&a.username)
        .bind(&a.password_hash)
        .bind(a.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn set_password_hash(
        &mut self,
        role: Role,
        id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let table = match role {
            Role::Customer => "customer",
            Role::Supplier => "supplier",
            Role::Courier => "courier",
            Role::Admin => "admin",
        };
        let sql = format!("UPDATE {table} SET password_hash = $2, updated_at = $3 WHERE id = $1");
        let rows = sqlx::query(&sql)
            .bind(id)
            .bind(password_hash)
            .bind(at)
            .execute(&mut *self.tx)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
