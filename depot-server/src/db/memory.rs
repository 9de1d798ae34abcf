//! In-process store
//!
//! All tables live behind one async mutex. A transaction holds the lock for
//! its whole lifetime and works on a copy; `commit` swaps the copy in, drop
//! discards it. Transactions therefore run one at a time, which gives the
//! same all-or-nothing and no-lost-update guarantees as the PostgreSQL store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::models::{
    Admin, Category, Configuration, Courier, Customer, Order, OrderLineItem, OrderStatus, Payment,
    PaymentStatus, Product, Role, Shipment, ShipmentStatus, SortDir, Stock, Supplier, Warehouse,
    WarehouseDistance,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{
    AccountRepo, CatalogRepo, InventoryRepo, ListQuery, OrderRepo, RepoError, RepoResult, Scope,
    ShipmentOwner, ShipmentRepo, Stamp, Store, StoreTx,
};
use crate::services::warehouse_selector::planar_distance;

#[derive(Debug, Clone)]
struct Tables {
    warehouses: BTreeMap<Uuid, Warehouse>,
    categories: BTreeMap<Uuid, Category>,
    products: BTreeMap<Uuid, Product>,
    stocks: BTreeMap<Uuid, Stock>,
    orders: BTreeMap<Uuid, Order>,
    line_items: BTreeMap<Uuid, OrderLineItem>,
    payments: BTreeMap<Uuid, Payment>,
    shipments: BTreeMap<Uuid, Shipment>,
    customers: BTreeMap<Uuid, Customer>,
    suppliers: BTreeMap<Uuid, Supplier>,
    couriers: BTreeMap<Uuid, Courier>,
    admins: BTreeMap<Uuid, Admin>,
    configuration: Configuration,
}

impl Tables {
    fn new(delivery_fee: Decimal) -> Self {
        Self {
            warehouses: BTreeMap::new(),
            categories: BTreeMap::new(),
            products: BTreeMap::new(),
            stocks: BTreeMap::new(),
            orders: BTreeMap::new(),
            line_items: BTreeMap::new(),
            payments: BTreeMap::new(),
            shipments: BTreeMap::new(),
            customers: BTreeMap::new(),
            suppliers: BTreeMap::new(),
            couriers: BTreeMap::new(),
            admins: BTreeMap::new(),
            configuration: Configuration {
                delivery_fee,
                updated_by: None,
                updated_at: None,
            },
        }
    }

    fn order_owned_by(&self, order_id: Uuid, customer: Option<Uuid>) -> bool {
        match customer {
            None => true,
            Some(c) => self
                .orders
                .get(&order_id)
                .is_some_and(|o| o.customer_id == c),
        }
    }
}

/// In-process [`Store`] for development and tests
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_delivery_fee(Decimal::ZERO)
    }

    pub fn with_delivery_fee(delivery_fee: Decimal) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::new(delivery_fee))),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx { guard, work }))
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let MemoryTx { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }
}

fn visible(is_delete: bool, scope: Scope) -> bool {
    scope == Scope::IncludeDeleted || !is_delete
}

fn matches_search(q: &ListQuery, text: &str) -> bool {
    q.search
        .as_deref()
        .is_none_or(|s| text.to_lowercase().contains(s))
}

/// Sort by `key`, apply direction, then offset/limit
fn paginate<T, K: Ord>(mut rows: Vec<T>, q: &ListQuery, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by_key(|r| key(r));
    if q.dir == SortDir::Desc {
        rows.reverse();
    }
    rows.into_iter()
        .skip(q.offset.max(0) as usize)
        .take(q.limit.max(0) as usize)
        .collect()
}

fn missing(what: &str, id: Uuid) -> RepoError {
    RepoError::NotFound(format!("{what} {id}"))
}

#[async_trait]
impl CatalogRepo for MemoryTx {
    async fn get_warehouse(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Warehouse>> {
        Ok(self
            .work
            .warehouses
            .get(&id)
            .filter(|w| visible(w.is_delete, scope))
            .cloned())
    }

    async fn list_warehouses(&mut self, q: &ListQuery) -> RepoResult<Vec<Warehouse>> {
        let rows = self
            .work
            .warehouses
            .values()
            .filter(|w| !w.is_delete && matches_search(q, &w.name))
            .cloned()
            .collect();
        Ok(paginate(rows, q, |w: &Warehouse| (w.name.to_lowercase(), w.id)))
    }

    async fn warehouses_by_distance(
        &mut self,
        latitude: Decimal,
        longitude: Decimal,
        q: &ListQuery,
    ) -> RepoResult<Vec<WarehouseDistance>> {
        let lat = latitude.to_f64().unwrap_or_default();
        let lon = longitude.to_f64().unwrap_or_default();

        let mut ranked: Vec<WarehouseDistance> = self
            .work
            .warehouses
            .values()
            .filter(|w| !w.is_delete && matches_search(q, &w.name))
            .map(|w| WarehouseDistance {
                distance: planar_distance(
                    w.latitude.to_f64().unwrap_or_default(),
                    w.longitude.to_f64().unwrap_or_default(),
                    lat,
                    lon,
                ),
                warehouse: w.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.warehouse.id.cmp(&b.warehouse.id))
        });

        Ok(ranked
            .into_iter()
            .skip(q.offset.max(0) as usize)
            .take(q.limit.max(0) as usize)
            .collect())
    }

    async fn insert_warehouse(&mut self, warehouse: &Warehouse) -> RepoResult<()> {
        self.work.warehouses.insert(warehouse.id, warehouse.clone());
        Ok(())
    }

    async fn update_warehouse(&mut self, warehouse: &Warehouse) -> RepoResult<()> {
        match self.work.warehouses.get_mut(&warehouse.id) {
            Some(row) if !row.is_delete => {
                *row = warehouse.clone();
                Ok(())
            }
            _ => Err(missing("warehouse", warehouse.id)),
        }
    }

    async fn delete_warehouse(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool> {
        Ok(match self.work.warehouses.get_mut(&id) {
            Some(w) if !w.is_delete => {
                w.is_delete = true;
                w.updated_by = Some(stamp.by);
                w.updated_at = Some(stamp.at);
                true
            }
            _ => false,
        })
    }

    async fn get_category(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Category>> {
        Ok(self
            .work
            .categories
            .get(&id)
            .filter(|c| visible(c.is_delete, scope))
            .cloned())
    }

    async fn list_categories(&mut self, q: &ListQuery) -> RepoResult<Vec<Category>> {
        let rows = self
            .work
            .categories
            .values()
            .filter(|c| !c.is_delete && matches_search(q, &c.name))
            .cloned()
            .collect();
        Ok(paginate(rows, q, |c: &Category| (c.name.to_lowercase(), c.id)))
    }

    async fn insert_category(&mut self, category: &Category) -> RepoResult<()> {
        let taken = self
            .work
            .categories
            .values()
            .any(|c| !c.is_delete && c.name.eq_ignore_ascii_case(&category.name));
        if taken {
            return Err(RepoError::Duplicate("category_name_key".into()));
        }
        self.work.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn get_product(&mut self, id: Uuid, scope: Scope) -> RepoResult<Option<Product>> {
        Ok(self
            .work
            .products
            .get(&id)
            .filter(|p| visible(p.is_delete, scope))
            .cloned())
    }

    async fn list_products(&mut self, q: &ListQuery) -> RepoResult<Vec<Product>> {
        let rows = self
            .work
            .products
            .values()
            .filter(|p| !p.is_delete && matches_search(q, &p.name))
            .cloned()
            .collect();
        Ok(paginate(rows, q, |p: &Product| (p.name.to_lowercase(), p.id)))
    }

    async fn insert_product(&mut self, product: &Product) -> RepoResult<()> {
        self.work.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update_product(&mut self, product: &Product) -> RepoResult<()> {
        match self.work.products.get_mut(&product.id) {
            Some(row) if !row.is_delete => {
                row.name = product.name.clone();
                row.description = product.description.clone();
                row.price = product.price;
                row.category_id = product.category_id;
                row.updated_by = product.updated_by;
                row.updated_at = product.updated_at;
                Ok(())
            }
            _ => Err(missing("product", product.id)),
        }
    }

    async fn delete_product(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool> {
        Ok(match self.work.products.get_mut(&id) {
            Some(p) if !p.is_delete => {
                p.is_delete = true;
                p.updated_by = Some(stamp.by);
                p.updated_at = Some(stamp.at);
                true
            }
            _ => false,
        })
    }

    async fn lock_product(&mut self, id: Uuid) -> RepoResult<bool> {
        Ok(self.work.products.get(&id).is_some_and(|p| !p.is_delete))
    }

    async fn set_product_stock(
        &mut self,
        id: Uuid,
        aggregate: i32,
        stamp: Stamp,
    ) -> RepoResult<()> {
        let product = self
            .work
            .products
            .get_mut(&id)
            .ok_or_else(|| missing("product", id))?;
        product.stock = aggregate;
        product.updated_by = Some(stamp.by);
        product.updated_at = Some(stamp.at);
        Ok(())
    }
}

#[async_trait]
impl InventoryRepo for MemoryTx {
    async fn get_stock(&mut self, id: Uuid) -> RepoResult<Option<Stock>> {
        Ok(self
            .work
            .stocks
            .get(&id)
            .filter(|s| !s.is_delete)
            .cloned())
    }

    async fn find_stock(
        &mut self,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> RepoResult<Option<Stock>> {
        Ok(self
            .work
            .stocks
            .values()
            .find(|s| !s.is_delete && s.warehouse_id == warehouse_id && s.product_id == product_id)
            .cloned())
    }

    async fn list_stocks(&mut self, q: &ListQuery) -> RepoResult<Vec<Stock>> {
        let rows = self
            .work
            .stocks
            .values()
            .filter(|s| !s.is_delete)
            .cloned()
            .collect();
        Ok(paginate(rows, q, |s: &Stock| (s.created_at, s.id)))
    }

    async fn insert_stock(&mut self, stock: &Stock) -> RepoResult<()> {
        let taken = self.work.stocks.values().any(|s| {
            !s.is_delete && s.warehouse_id == stock.warehouse_id && s.product_id == stock.product_id
        });
        if taken {
            return Err(RepoError::Duplicate("stock_warehouse_product_key".into()));
        }
        self.work.stocks.insert(stock.id, stock.clone());
        Ok(())
    }

    async fn set_stock_quantity(
        &mut self,
        id: Uuid,
        quantity: i32,
        stamp: Stamp,
    ) -> RepoResult<bool> {
        Ok(match self.work.stocks.get_mut(&id) {
            Some(s) if !s.is_delete => {
                s.stock = quantity;
                s.updated_by = Some(stamp.by);
                s.updated_at = Some(stamp.at);
                true
            }
            _ => false,
        })
    }

    async fn decrement_stock(
        &mut self,
        id: Uuid,
        quantity: i32,
        stamp: Stamp,
    ) -> RepoResult<Option<i32>> {
        let stock = self
            .work
            .stocks
            .get_mut(&id)
            .filter(|s| !s.is_delete)
            .ok_or_else(|| missing("stock", id))?;
        if stock.stock < quantity {
            return Ok(None);
        }
        stock.stock -= quantity;
        stock.updated_by = Some(stamp.by);
        stock.updated_at = Some(stamp.at);
        Ok(Some(stock.stock))
    }

    async fn sum_stock(&mut self, product_id: Uuid) -> RepoResult<i64> {
        Ok(self
            .work
            .stocks
            .values()
            .filter(|s| !s.is_delete && s.product_id == product_id)
            .map(|s| i64::from(s.stock))
            .sum())
    }
}

#[async_trait]
impl OrderRepo for MemoryTx {
    async fn insert_order(&mut self, order: &Order) -> RepoResult<()> {
        self.work.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get_order(&mut self, id: Uuid) -> RepoResult<Option<Order>> {
        Ok(self
            .work
            .orders
            .get(&id)
            .filter(|o| !o.is_delete)
            .cloned())
    }

    async fn list_orders(
        &mut self,
        q: &ListQuery,
        customer: Option<Uuid>,
    ) -> RepoResult<Vec<Order>> {
        let rows = self
            .work
            .orders
            .values()
            .filter(|o| !o.is_delete && customer.is_none_or(|c| o.customer_id == c))
            .cloned()
            .collect();
        Ok(paginate(rows, q, |o: &Order| (o.created_at, o.id)))
    }

    async fn set_order_total(&mut self, id: Uuid, total: Decimal) -> RepoResult<()> {
        let order = self
            .work
            .orders
            .get_mut(&id)
            .ok_or_else(|| missing("order", id))?;
        order.total_price = total;
        Ok(())
    }

    async fn set_order_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
        stamp: Stamp,
    ) -> RepoResult<()> {
        let order = self
            .work
            .orders
            .get_mut(&id)
            .ok_or_else(|| missing("order", id))?;
        order.status = status;
        order.updated_by = Some(stamp.by);
        order.updated_at = Some(stamp.at);
        Ok(())
    }

    async fn delete_order(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool> {
        match self.work.orders.get_mut(&id) {
            Some(o) if !o.is_delete => {
                o.is_delete = true;
                o.updated_by = Some(stamp.by);
                o.updated_at = Some(stamp.at);
            }
            _ => return Ok(false),
        }
        for item in self.work.line_items.values_mut().filter(|i| i.order_id == id) {
            item.is_delete = true;
            item.updated_by = Some(stamp.by);
            item.updated_at = Some(stamp.at);
        }
        for payment in self.work.payments.values_mut().filter(|p| p.order_id == id) {
            payment.is_delete = true;
            payment.updated_by = Some(stamp.by);
            payment.updated_at = Some(stamp.at);
        }
        Ok(true)
    }

    async fn insert_line_item(&mut self, item: &OrderLineItem) -> RepoResult<()> {
        self.work.line_items.insert(item.id, item.clone());
        Ok(())
    }

    async fn get_line_item(&mut self, id: Uuid) -> RepoResult<Option<OrderLineItem>> {
        Ok(self
            .work
            .line_items
            .get(&id)
            .filter(|i| !i.is_delete)
            .cloned())
    }

    async fn list_line_items(&mut self, order_id: Uuid) -> RepoResult<Vec<OrderLineItem>> {
        let mut items: Vec<OrderLineItem> = self
            .work
            .line_items
            .values()
            .filter(|i| !i.is_delete && i.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.created_at, i.product_id));
        Ok(items)
    }

    async fn list_all_line_items(
        &mut self,
        q: &ListQuery,
        customer: Option<Uuid>,
    ) -> RepoResult<Vec<OrderLineItem>> {
        let rows = self
            .work
            .line_items
            .values()
            .filter(|i| !i.is_delete && self.work.order_owned_by(i.order_id, customer))
            .cloned()
            .collect();
        Ok(paginate(rows, q, |i: &OrderLineItem| (i.created_at, i.id)))
    }

    async fn insert_payment(&mut self, payment: &Payment) -> RepoResult<()> {
        self.work.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn get_payment(&mut self, id: Uuid) -> RepoResult<Option<Payment>> {
        Ok(self
            .work
            .payments
            .get(&id)
            .filter(|p| !p.is_delete)
            .cloned())
    }

    async fn lock_payment(&mut self, id: Uuid) -> RepoResult<Option<Payment>> {
        self.get_payment(id).await
    }

    async fn list_payments(
        &mut self,
        q: &ListQuery,
        customer: Option<Uuid>,
    ) -> RepoResult<Vec<Payment>> {
        let rows = self
            .work
            .payments
            .values()
            .filter(|p| !p.is_delete && self.work.order_owned_by(p.order_id, customer))
            .cloned()
            .collect();
        Ok(paginate(rows, q, |p: &Payment| (p.created_at, p.id)))
    }

    async fn mark_payment_paid(&mut self, id: Uuid, stamp: Stamp) -> RepoResult<bool> {
        Ok(match self.work.payments.get_mut(&id) {
            Some(p) if !p.is_delete && p.status == PaymentStatus::Unpaid => {
                p.status = PaymentStatus::Paid;
                p.updated_by = Some(stamp.by);
                p.updated_at = Some(stamp.at);
                true
            }
            _ => false,
        })
    }

    async fn get_configuration(&mut self) -> RepoResult<Configuration> {
        Ok(self.work.configuration.clone())
    }

    async fn set_delivery_fee(&mut self, fee: Decimal, stamp: Stamp) -> RepoResult<Configuration> {
        let config = &mut self.work.configuration;
        config.delivery_fee = fee;
        config.updated_by = Some(stamp.by);
        config.updated_at = Some(stamp.at);
        Ok(config.clone())
    }
}

#[async_trait]
impl ShipmentRepo for MemoryTx {
    async fn insert_shipment(&mut self, shipment: &Shipment) -> RepoResult<()> {
        let taken = self.work.shipments.values().any(|s| {
            !s.is_delete && s.order_id == shipment.order_id && s.status != ShipmentStatus::Failed
        });
        if taken {
            return Err(RepoError::Duplicate("shipment_order_active_key".into()));
        }
        self.work.shipments.insert(shipment.id, shipment.clone());
        Ok(())
    }

    async fn get_shipment(&mut self, id: Uuid) -> RepoResult<Option<Shipment>> {
        Ok(self
            .work
            .shipments
            .get(&id)
            .filter(|s| !s.is_delete)
            .cloned())
    }

    async fn lock_shipment(&mut self, id: Uuid) -> RepoResult<Option<Shipment>> {
        self.get_shipment(id).await
    }

    async fn active_shipment(&mut self, order_id: Uuid) -> RepoResult<Option<Shipment>> {
        Ok(self
            .work
            .shipments
            .values()
            .find(|s| {
                !s.is_delete && s.order_id == order_id && s.status != ShipmentStatus::Failed
            })
            .cloned())
    }

    async fn list_shipments(
        &mut self,
        q: &ListQuery,
        owner: ShipmentOwner,
    ) -> RepoResult<Vec<Shipment>> {
        let rows = self
            .work
            .shipments
            .values()
            .filter(|s| {
                !s.is_delete
                    && match owner {
                        ShipmentOwner::Any => true,
                        ShipmentOwner::Courier(c) => s.courier_id == c,
                        ShipmentOwner::Customer(c) => self.work.order_owned_by(s.order_id, Some(c)),
                    }
            })
            .cloned()
            .collect();
        Ok(paginate(rows, q, |s: &Shipment| (s.created_at, s.id)))
    }

    async fn close_shipment(
        &mut self,
        id: Uuid,
        status: ShipmentStatus,
        stamp: Stamp,
    ) -> RepoResult<bool> {
        Ok(match self.work.shipments.get_mut(&id) {
            Some(s) if !s.is_delete && s.status == ShipmentStatus::Pending => {
                s.status = status;
                s.updated_by = Some(stamp.by);
                s.updated_at = Some(stamp.at);
                true
            }
            _ => false,
        })
    }
}

#[async_trait]
impl AccountRepo for MemoryTx {
    async fn get_customer(&mut self, id: Uuid) -> RepoResult<Option<Customer>> {
        Ok(self.work.customers.get(&id).cloned())
    }

    async fn find_customer_by_email(&mut self, email: &str) -> RepoResult<Option<Customer>> {
        Ok(self
            .work
            .customers
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_customer(&mut self, customer: &Customer) -> RepoResult<()> {
        if self
            .work
            .customers
            .values()
            .any(|c| c.email.eq_ignore_ascii_case(&customer.email))
        {
            return Err(RepoError::Duplicate("customer_email_key".into()));
        }
        self.work.customers.insert(customer.id, customer.clone());
        Ok(())
    }

    async fn get_supplier(&mut self, id: Uuid) -> RepoResult<Option<Supplier>> {
        Ok(self.work.suppliers.get(&id).cloned())
    }

    async fn find_supplier_by_email(&mut self, email: &str) -> RepoResult<Option<Supplier>> {
        Ok(self
            .work
            .suppliers
            .values()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_supplier(&mut self, supplier: &Supplier) -> RepoResult<()> {
        if self
            .work
            .suppliers
            .values()
            .any(|s| s.email.eq_ignore_ascii_case(&supplier.email))
        {
            return Err(RepoError::Duplicate("supplier_email_key".into()));
        }
        self.work.suppliers.insert(supplier.id, supplier.clone());
        Ok(())
    }

    async fn get_courier(&mut self, id: Uuid) -> RepoResult<Option<Courier>> {
        Ok(self.work.couriers.get(&id).cloned())
    }

    async fn find_courier_by_email(&mut self, email: &str) -> RepoResult<Option<Courier>> {
        Ok(self
            .work
            .couriers
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_couriers(&mut self, q: &ListQuery) -> RepoResult<Vec<Courier>> {
        let rows = self
            .work
            .couriers
            .values()
            .filter(|c| matches_search(q, &c.name))
            .cloned()
            .collect();
        Ok(paginate(rows, q, |c: &Courier| (c.name.to_lowercase(), c.id)))
    }

    async fn insert_courier(&mut self, courier: &Courier) -> RepoResult<()> {
        if self
            .work
            .couriers
            .values()
            .any(|c| c.email.eq_ignore_ascii_case(&courier.email))
        {
            return Err(RepoError::Duplicate("courier_email_key".into()));
        }
        self.work.couriers.insert(courier.id, courier.clone());
        Ok(())
    }

    async fn get_admin(&mut self, id: Uuid) -> RepoResult<Option<Admin>> {
        Ok(self.work.admins.get(&id).cloned())
    }

    async fn find_admin_by_username(&mut self, username: &str) -> RepoResult<Option<Admin>> {
        Ok(self
            .work
            .admins
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn insert_admin(&mut self, admin: &Admin) -> RepoResult<()> {
        if self.work.admins.values().any(|a| a.username == admin.username) {
            return Err(RepoError::Duplicate("admin_username_key".into()));
        }
        self.work.admins.insert(admin.id, admin.clone());
        Ok(())
    }

    async fn set_password_hash(
        &mut self,
        role: Role,
        id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let hash = password_hash.to_string();
        let updated = match role {
            Role::Customer => self.work.customers.get_mut(&id).map(|c| {
                c.password_hash = hash;
                c.updated_at = Some(at);
            }),
            Role::Supplier => self.work.suppliers.get_mut(&id).map(|s| {
                s.password_hash = hash;
                s.updated_at = Some(at);
            }),
            Role::Courier => self.work.couriers.get_mut(&id).map(|c| {
                c.password_hash = hash;
                c.updated_at = Some(at);
            }),
            Role::Admin => self.work.admins.get_mut(&id).map(|a| {
                a.password_hash = hash;
            }),
        };
        Ok(updated.is_some())
    }
}
