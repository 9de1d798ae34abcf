//! PostgreSQL store integration tests
//!
//! Run with: cargo test -p depot-server --test postgres_store -- --ignored
//!
//! Uses the server in `DEPOT_TEST_DATABASE_URL` when set, otherwise starts
//! PostgreSQL in a container with testcontainers. Every test migrates into a
//! schema of its own, so a shared server needs no cleanup.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use depot_server::auth::Access;
use depot_server::db::{
    AccountRepo, CatalogRepo, InventoryRepo, ListQuery, OrderRepo, PgStore, RepoError, Scope,
    ShipmentRepo, Stamp, Store,
};
use depot_server::error::ServiceError;
use depot_server::notify::Notification;
use depot_server::services::{order_assembler, orders, payments, stock_ledger, warehouse_selector};
use depot_server::utils::{FixedClock, RandomIds};
use depot_server::{AppState, Config};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, Courier, Customer, Gender, ListFilter, OrderCreate, OrderLineRequest, Product, Role,
    Shipment, ShipmentStatus, Stock, Supplier, Warehouse,
};
use sqlx::PgPool;
use testcontainers::{
    ContainerAsync, GenericImage, ImageExt,
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
};
use tokio::sync::mpsc;
use uuid::Uuid;

const NEAR_B: (&str, &str) = ("3.06", "101.56");

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn stamp() -> Stamp {
    Stamp {
        by: Uuid::nil(),
        at: Utc::now(),
    }
}

fn code(err: ServiceError) -> ErrorCode {
    AppError::from(err).code
}

/// Start PostgreSQL in a container; returns the container and its URL
async fn start_postgres() -> (ContainerAsync<GenericImage>, String) {
    let container = GenericImage::new("postgres", "16")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stdout(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_USER", "depot")
        .with_env_var("POSTGRES_PASSWORD", "depot")
        .with_env_var("POSTGRES_DB", "depot")
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .expect("Failed to start postgres container");

    // The ready message is printed once during init as well
    tokio::time::sleep(Duration::from_secs(1)).await;

    let host = container.get_host().await.expect("container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("mapped port");
    (container, format!("postgres://depot:depot@{host}:{port}/depot"))
}

struct TestDb {
    _container: Option<ContainerAsync<GenericImage>>,
    /// Connection URL pinned to this test's schema
    url: String,
    store: PgStore,
    state: AppState,
    _receipts: mpsc::Receiver<Notification>,
}

impl TestDb {
    async fn start() -> Self {
        let (container, base_url) = match std::env::var("DEPOT_TEST_DATABASE_URL") {
            Ok(url) => (None, url),
            Err(_) => {
                let (container, url) = start_postgres().await;
                (Some(container), url)
            }
        };

        let schema = format!("t_{}", Uuid::new_v4().simple());
        let admin = PgPool::connect(&base_url).await.expect("connect");
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("create schema");
        admin.close().await;

        let separator = if base_url.contains('?') { '&' } else { '?' };
        let url = format!("{base_url}{separator}options=-c%20search_path%3D{schema}");
        let store = PgStore::connect(&url).await.expect("connect and migrate");
        let (state, receipts) = AppState::from_parts(
            &Config::for_tests(),
            Arc::new(store.clone()),
            Arc::new(FixedClock::new(Utc::now())),
            Arc::new(RandomIds),
        );

        Self {
            _container: container,
            url,
            store,
            state,
            _receipts: receipts,
        }
    }

    async fn customer(&self) -> Uuid {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: "Aisyah".into(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            address: "1 Jalan Ampang".into(),
            phone_no: "0123456789".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: String::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        let mut tx = self.store.begin().await.unwrap();
        tx.insert_customer(&customer).await.unwrap();
        tx.commit().await.unwrap();
        customer.id
    }

    async fn warehouse(&self, id: Uuid, lat: &str, lon: &str) -> Uuid {
        let warehouse = Warehouse {
            id,
            name: format!("W{}", id.as_u128()),
            address: "Jalan Gudang".into(),
            latitude: dec(lat),
            longitude: dec(lon),
            phone_no: "0300000000".into(),
            is_delete: false,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        };
        let mut tx = self.store.begin().await.unwrap();
        tx.insert_warehouse(&warehouse).await.unwrap();
        tx.commit().await.unwrap();
        id
    }

    async fn product(&self, id: Uuid, price: &str) -> Uuid {
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: "Kedai Runcit".into(),
            phone_no: "0387654321".into(),
            email: format!("{}@supplier.example.com", Uuid::new_v4()),
            password_hash: String::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        let category = Category {
            id: Uuid::new_v4(),
            name: format!("category {}", Uuid::new_v4()),
            is_delete: false,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        };
        let product = Product {
            id,
            name: format!("product {}", id.as_u128()),
            description: "description".into(),
            price: dec(price),
            category_id: category.id,
            supplier_id: supplier.id,
            stock: 0,
            is_delete: false,
            created_by: supplier.id,
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        };
        let mut tx = self.store.begin().await.unwrap();
        tx.insert_supplier(&supplier).await.unwrap();
        tx.insert_category(&category).await.unwrap();
        tx.insert_product(&product).await.unwrap();
        tx.commit().await.unwrap();
        id
    }

    async fn stock(&self, warehouse: Uuid, product: Uuid, quantity: i32) -> Uuid {
        let mut tx = self.store.begin().await.unwrap();
        let stock = stock_ledger::add(
            tx.as_mut(),
            Uuid::new_v4(),
            warehouse,
            product,
            quantity,
            stamp(),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
        stock.id
    }

    async fn stock_level(&self, stock: Uuid) -> i32 {
        let mut tx = self.store.begin().await.unwrap();
        tx.get_stock(stock).await.unwrap().unwrap().stock
    }

    async fn product_stock(&self, product: Uuid) -> i32 {
        let mut tx = self.store.begin().await.unwrap();
        tx.get_product(product, Scope::Active)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    async fn order_count(&self) -> usize {
        orders::list_orders(
            &self.state,
            &ListQuery::from(&ListFilter::default()),
            Access::All,
        )
        .await
        .unwrap()
        .len()
    }
}

fn order(lines: &[(Uuid, i32)]) -> OrderCreate {
    OrderCreate {
        delivery_address: "8 Jalan Bukit Bintang".into(),
        latitude: dec(NEAR_B.0),
        longitude: dec(NEAR_B.1),
        product: lines
            .iter()
            .map(|&(id, quantity)| OrderLineRequest { id, quantity })
            .collect(),
    }
}

#[tokio::test]
#[ignore = "needs Docker or DEPOT_TEST_DATABASE_URL"]
async fn test_concurrent_orders_never_oversell() {
    let db = TestDb::start().await;
    let warehouse = db.warehouse(Uuid::new_v4(), "3.05", "101.55").await;
    let product = db.product(Uuid::new_v4(), "10.00").await;
    let stock = db.stock(warehouse, product, 5).await;
    let customer = db.customer().await;

    let mut handles = Vec::new();
    for _ in 0..12 {
        let state = db.state.clone();
        handles.push(tokio::spawn(async move {
            order_assembler::place_order(&state, customer, &order(&[(product, 1)])).await
        }));
    }

    let mut placed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(e) => assert_eq!(code(e), ErrorCode::InsufficientStock),
        }
    }

    assert_eq!(placed, 5);
    assert_eq!(db.stock_level(stock).await, 0);
    assert_eq!(db.product_stock(product).await, 0);
    assert_eq!(db.order_count().await, 5);
}

#[tokio::test]
#[ignore = "needs Docker or DEPOT_TEST_DATABASE_URL"]
async fn test_insufficient_stock_rolls_back_every_line() {
    let db = TestDb::start().await;
    let warehouse = db.warehouse(Uuid::new_v4(), "3.05", "101.55").await;
    // Fixed ids: the short line is locked and decremented after the one that fits
    let fits = db.product(Uuid::from_u128(1), "10.00").await;
    let short = db.product(Uuid::from_u128(2), "4.00").await;
    let fits_stock = db.stock(warehouse, fits, 10).await;
    let short_stock = db.stock(warehouse, short, 1).await;
    let customer = db.customer().await;

    let err = order_assembler::place_order(&db.state, customer, &order(&[(short, 2), (fits, 1)]))
        .await
        .unwrap_err();
    assert_eq!(code(err), ErrorCode::InsufficientStock);

    assert_eq!(db.stock_level(fits_stock).await, 10);
    assert_eq!(db.stock_level(short_stock).await, 1);
    assert_eq!(db.product_stock(fits).await, 10);
    assert_eq!(db.order_count().await, 0);
}

#[tokio::test]
#[ignore = "needs Docker or DEPOT_TEST_DATABASE_URL"]
async fn test_nearest_warehouse_breaks_ties_by_id() {
    let db = TestDb::start().await;
    db.warehouse(Uuid::from_u128(1), "3.1", "101.6").await;
    db.warehouse(Uuid::from_u128(30), "3.05", "101.55").await;
    db.warehouse(Uuid::from_u128(20), "3.05", "101.55").await;

    let mut tx = db.store.begin().await.unwrap();
    let nearest = warehouse_selector::nearest(tx.as_mut(), dec(NEAR_B.0), dec(NEAR_B.1))
        .await
        .unwrap();
    assert_eq!(nearest.id, Uuid::from_u128(20));

    // Near A instead
    let nearest = warehouse_selector::nearest(tx.as_mut(), dec("3.11"), dec("101.61"))
        .await
        .unwrap();
    assert_eq!(nearest.id, Uuid::from_u128(1));

    tx.delete_warehouse(Uuid::from_u128(20), stamp()).await.unwrap();
    let nearest = warehouse_selector::nearest(tx.as_mut(), dec(NEAR_B.0), dec(NEAR_B.1))
        .await
        .unwrap();
    assert_eq!(nearest.id, Uuid::from_u128(30));
}

#[tokio::test]
#[ignore = "needs Docker or DEPOT_TEST_DATABASE_URL"]
async fn test_serialization_failure_is_a_retryable_conflict() {
    let db = TestDb::start().await;
    let pool = PgPool::connect(&db.url).await.unwrap();

    let mut first = pool.begin().await.unwrap();
    let mut second = pool.begin().await.unwrap();
    for tx in [&mut first, &mut second] {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .unwrap();
        sqlx::query("SELECT delivery_fee FROM configuration WHERE id = 1")
            .execute(&mut **tx)
            .await
            .unwrap();
    }

    sqlx::query("UPDATE configuration SET delivery_fee = 1 WHERE id = 1")
        .execute(&mut *first)
        .await
        .unwrap();
    first.commit().await.unwrap();

    let err = sqlx::query("UPDATE configuration SET delivery_fee = 2 WHERE id = 1")
        .execute(&mut *second)
        .await
        .unwrap_err();
    let err = RepoError::from(err);
    assert!(matches!(err, RepoError::Conflict(_)), "{err:?}");
    assert!(err.is_retryable());

    let err = ServiceError::from(err);
    assert!(err.is_retryable());
    assert_eq!(code(err), ErrorCode::StoreBusy);
}

#[tokio::test]
#[ignore = "needs Docker or DEPOT_TEST_DATABASE_URL"]
async fn test_payment_reads_do_not_wait_for_the_row_lock() {
    let db = TestDb::start().await;
    let warehouse = db.warehouse(Uuid::new_v4(), "3.05", "101.55").await;
    let product = db.product(Uuid::new_v4(), "10.00").await;
    db.stock(warehouse, product, 5).await;
    let customer = db.customer().await;
    let placed = order_assembler::place_order(&db.state, customer, &order(&[(product, 1)]))
        .await
        .unwrap();
    let payment_id = placed.payment.id;

    let mut holder = db.store.begin().await.unwrap();
    assert!(holder.lock_payment(payment_id).await.unwrap().is_some());

    let mut reader = db.store.begin().await.unwrap();
    let read = tokio::time::timeout(Duration::from_secs(2), reader.get_payment(payment_id))
        .await
        .expect("plain read blocked on the row lock")
        .unwrap();
    assert_eq!(read.map(|p| p.id), Some(payment_id));

    let locked =
        tokio::time::timeout(Duration::from_millis(300), reader.lock_payment(payment_id)).await;
    assert!(locked.is_err());
    drop(reader);
    drop(holder);

    // Once released, confirmation goes through
    let view = payments::confirm(&db.state, payment_id, Access::All, Uuid::nil())
        .await
        .unwrap();
    assert_eq!(view.order.order.id, placed.order.order.id);
}

#[tokio::test]
#[ignore = "needs Docker or DEPOT_TEST_DATABASE_URL"]
async fn test_stock_sum_is_widened() {
    let db = TestDb::start().await;
    let a = db.warehouse(Uuid::new_v4(), "3.1", "101.6").await;
    let b = db.warehouse(Uuid::new_v4(), "3.05", "101.55").await;
    let product = db.product(Uuid::new_v4(), "1.00").await;

    let mut tx = db.store.begin().await.unwrap();
    for warehouse_id in [a, b] {
        tx.insert_stock(&Stock {
            id: Uuid::new_v4(),
            warehouse_id,
            product_id: product,
            stock: i32::MAX,
            is_delete: false,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        })
        .await
        .unwrap();
    }
    assert_eq!(
        tx.sum_stock(product).await.unwrap(),
        2 * i64::from(i32::MAX)
    );

    let err = stock_ledger::recompute_aggregate(tx.as_mut(), product, stamp())
        .await
        .unwrap_err();
    assert_eq!(code(err), ErrorCode::ValueOutOfRange);
}

#[tokio::test]
#[ignore = "needs Docker or DEPOT_TEST_DATABASE_URL"]
async fn test_one_active_shipment_per_order() {
    let db = TestDb::start().await;
    let warehouse = db.warehouse(Uuid::new_v4(), "3.05", "101.55").await;
    let product = db.product(Uuid::new_v4(), "10.00").await;
    db.stock(warehouse, product, 5).await;
    let customer = db.customer().await;
    let placed = order_assembler::place_order(&db.state, customer, &order(&[(product, 1)]))
        .await
        .unwrap();
    let order_id = placed.order.order.id;

    let courier = Courier {
        id: Uuid::new_v4(),
        name: "Ahmad".into(),
        phone_no: "0111111111".into(),
        email: "rider@example.com".into(),
        password_hash: "old".into(),
        is_active: true,
        created_by: Uuid::nil(),
        created_at: Utc::now(),
        updated_at: None,
    };
    let shipment = |id: u128| Shipment {
        id: Uuid::from_u128(id),
        courier_id: courier.id,
        order_id,
        status: ShipmentStatus::Pending,
        is_delete: false,
        created_by: Uuid::nil(),
        created_at: Utc::now(),
        updated_by: None,
        updated_at: None,
    };

    let mut tx = db.store.begin().await.unwrap();
    tx.insert_courier(&courier).await.unwrap();
    tx.insert_shipment(&shipment(1)).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = db.store.begin().await.unwrap();
    match tx.insert_shipment(&shipment(2)).await {
        Err(RepoError::Duplicate(constraint)) => {
            assert_eq!(constraint, "shipment_order_active_key")
        }
        other => panic!("expected duplicate, got {other:?}"),
    }
    drop(tx);

    // A failed shipment no longer counts as active
    let mut tx = db.store.begin().await.unwrap();
    assert!(
        tx.close_shipment(Uuid::from_u128(1), ShipmentStatus::Failed, stamp())
            .await
            .unwrap()
    );
    assert!(
        !tx.close_shipment(Uuid::from_u128(1), ShipmentStatus::Delivered, stamp())
            .await
            .unwrap()
    );
    tx.insert_shipment(&shipment(2)).await.unwrap();
    assert!(
        tx.set_password_hash(Role::Courier, courier.id, "new", Utc::now())
            .await
            .unwrap()
    );
    tx.commit().await.unwrap();

    let mut tx = db.store.begin().await.unwrap();
    let active = tx.active_shipment(order_id).await.unwrap().unwrap();
    assert_eq!(active.id, Uuid::from_u128(2));
    let courier = tx.get_courier(courier.id).await.unwrap().unwrap();
    assert_eq!(courier.password_hash, "new");
}
