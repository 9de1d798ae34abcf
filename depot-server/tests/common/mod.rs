//! In-process test harness
//!
//! Builds the full router over a `MemoryStore` and a `FixedClock`, seeds
//! rows straight through the store, and drives requests with `oneshot`.
//! The receiving half of the notification queue is kept here so tests can
//! count queued receipts.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use chrono::{NaiveDate, Utc};
use depot_server::auth::{Session, SessionStore};
use depot_server::db::{AccountRepo, CatalogRepo, MemoryStore, Stamp, Store};
use depot_server::notify::Notification;
use depot_server::services::stock_ledger;
use depot_server::utils::{FixedClock, RandomIds};
use depot_server::{AppState, Config, api};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use shared::models::{
    Category, Courier, Customer, Gender, Product, Role, Supplier, Warehouse,
};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Decimal field of a JSON object (serialized as a string)
pub fn money(v: &Value) -> Decimal {
    match v {
        Value::String(s) => dec(s),
        other => dec(&other.to_string()),
    }
}

pub struct TestApp {
    pub state: AppState,
    pub app: Router,
    pub store: MemoryStore,
    pub clock: Arc<FixedClock>,
    pub receipts: mpsc::Receiver<Notification>,
}

impl TestApp {
    pub fn new(delivery_fee: Decimal) -> Self {
        let store = MemoryStore::with_delivery_fee(delivery_fee);
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let (state, receipts) = AppState::from_parts(
            &Config::for_tests(),
            Arc::new(store.clone()),
            clock.clone(),
            Arc::new(RandomIds),
        );
        let app = api::build_app(&state);
        Self {
            state,
            app,
            store,
            clock,
            receipts,
        }
    }

    /// Send a request; returns the status and the parsed JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header("session", token);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, session: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(session), None).await
    }

    pub async fn session(&self, user_id: Uuid, role: Role, ttl: Duration) -> String {
        let token = Uuid::new_v4().to_string();
        self.state
            .sessions
            .put(&token, Session { user_id, role }, ttl)
            .await;
        token
    }

    /// Customer row plus a live session
    pub async fn customer(&self, name: &str) -> (Uuid, String) {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: name.into(),
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

        let token = self
            .session(customer.id, Role::Customer, Duration::from_secs(3_600))
            .await;
        (customer.id, token)
    }

    pub async fn admin(&self) -> (Uuid, String) {
        let id = Uuid::new_v4();
        let token = self.session(id, Role::Admin, Duration::from_secs(3_600)).await;
        (id, token)
    }

    pub async fn supplier(&self) -> (Uuid, String) {
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
        let mut tx = self.store.begin().await.unwrap();
        tx.insert_supplier(&supplier).await.unwrap();
        tx.commit().await.unwrap();

        let token = self
            .session(supplier.id, Role::Supplier, Duration::from_secs(3_600))
            .await;
        (supplier.id, token)
    }

    pub async fn courier(&self, name: &str) -> (Uuid, String) {
        let courier = Courier {
            id: Uuid::new_v4(),
            name: name.into(),
            phone_no: "0111111111".into(),
            email: format!("{}@courier.example.com", Uuid::new_v4()),
            password_hash: String::new(),
            is_active: true,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let mut tx = self.store.begin().await.unwrap();
        tx.insert_courier(&courier).await.unwrap();
        tx.commit().await.unwrap();

        let token = self
            .session(courier.id, Role::Courier, Duration::from_secs(3_600))
            .await;
        (courier.id, token)
    }
}

/// Catalog used by the order tests:
/// warehouse A (3.1, 101.6), warehouse B (3.05, 101.55), one product at 10.00
pub struct Catalog {
    pub warehouse_a: Uuid,
    pub warehouse_b: Uuid,
    pub product: Uuid,
    pub stock_a: Uuid,
    pub stock_b: Uuid,
}

pub const NEAR_B: (&str, &str) = ("3.06", "101.56");

fn stamp() -> Stamp {
    Stamp {
        by: Uuid::nil(),
        at: Utc::now(),
    }
}

pub async fn seed_warehouse(app: &TestApp, name: &str, lat: &str, lon: &str) -> Uuid {
    let warehouse = Warehouse {
        id: Uuid::new_v4(),
        name: name.into(),
        address: format!("{name} address"),
        latitude: dec(lat),
        longitude: dec(lon),
        phone_no: "0300000000".into(),
        is_delete: false,
        created_by: Uuid::nil(),
        created_at: Utc::now(),
        updated_by: None,
        updated_at: None,
    };
    let mut tx = app.store.begin().await.unwrap();
    tx.insert_warehouse(&warehouse).await.unwrap();
    tx.commit().await.unwrap();
    warehouse.id
}

pub async fn seed_product(app: &TestApp, name: &str, price: &str) -> Uuid {
    seed_product_with_id(app, Uuid::new_v4(), name, price).await
}

/// Product with a caller-chosen id, for tests that depend on lock order
pub async fn seed_product_with_id(app: &TestApp, id: Uuid, name: &str, price: &str) -> Uuid {
    let (supplier_id, _) = app.supplier().await;
    let category = Category {
        id: Uuid::new_v4(),
        name: format!("{name} category"),
        is_delete: false,
        created_by: Uuid::nil(),
        created_at: Utc::now(),
        updated_by: None,
        updated_at: None,
    };
    let product = Product {
        id,
        name: name.into(),
        description: format!("{name} description"),
        price: dec(price),
        category_id: category.id,
        supplier_id,
        stock: 0,
        is_delete: false,
        created_by: supplier_id,
        created_at: Utc::now(),
        updated_by: None,
        updated_at: None,
    };
    let mut tx = app.store.begin().await.unwrap();
    tx.insert_category(&category).await.unwrap();
    tx.insert_product(&product).await.unwrap();
    tx.commit().await.unwrap();
    product.id
}

pub async fn seed_stock(app: &TestApp, warehouse: Uuid, product: Uuid, quantity: i32) -> Uuid {
    let mut tx = app.store.begin().await.unwrap();
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

pub async fn seed_catalog(app: &TestApp, stock_a: i32, stock_b: i32) -> Catalog {
    let warehouse_a = seed_warehouse(app, "A", "3.1", "101.6").await;
    let warehouse_b = seed_warehouse(app, "B", "3.05", "101.55").await;
    let product = seed_product(app, "Milo 1kg", "10.00").await;
    let stock_a = seed_stock(app, warehouse_a, product, stock_a).await;
    let stock_b = seed_stock(app, warehouse_b, product, stock_b).await;
    Catalog {
        warehouse_a,
        warehouse_b,
        product,
        stock_a,
        stock_b,
    }
}

pub fn order_body(lines: &[(Uuid, i32)]) -> Value {
    serde_json::json!({
        "delivery_address": "8 Jalan Bukit Bintang",
        "latitude": NEAR_B.0,
        "longitude": NEAR_B.1,
        "product": lines
            .iter()
            .map(|(id, quantity)| serde_json::json!({ "id": id, "quantity": quantity }))
            .collect::<Vec<_>>(),
    })
}

pub fn error_code(body: &Value) -> u64 {
    body["errors"][0]["code"].as_u64().unwrap_or_default()
}

/// Place an order for `lines` and pay for it; returns the order id
pub async fn confirmed_order(app: &TestApp, token: &str, lines: &[(Uuid, i32)]) -> String {
    let (status, placed) = app
        .send(Method::POST, "/api/v1/orders", Some(token), Some(order_body(lines)))
        .await;
    assert_eq!(status, StatusCode::OK, "{placed}");
    let payment_id = placed["data"]["payment"]["id"].as_str().unwrap();
    let (status, paid) = app
        .send(
            Method::PUT,
            &format!("/api/v1/payments/{payment_id}"),
            Some(token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{paid}");
    placed["data"]["id"].as_str().unwrap().to_string()
}
