//! Sessions, roles and ownership through the HTTP API

mod common;

use chrono::Duration;
use common::*;
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::Role;

#[tokio::test]
async fn health_needs_no_session() {
    let app = TestApp::new(dec("5.00"));
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_or_unknown_session_is_unauthenticated() {
    let app = TestApp::new(dec("5.00"));

    let (status, body) = app.send(Method::GET, "/api/v1/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), 1001);

    let (status, _) = app.get("/api/v1/orders", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_session_is_rejected() {
    let app = TestApp::new(dec("5.00"));
    let (customer_id, _) = app.customer("Aisyah").await;
    let token = app
        .session(customer_id, Role::Customer, std::time::Duration::from_secs(60))
        .await;

    let (status, _) = app.get("/api/v1/orders", &token).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(Duration::seconds(61));

    let (status, body) = app.get("/api/v1/orders", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(matches!(error_code(&body), 1001 | 1005));
}

#[tokio::test]
async fn roles_outside_the_policy_are_denied() {
    let app = TestApp::new(dec("5.00"));
    let catalog = seed_catalog(&app, 0, 5).await;
    let (_, supplier) = app.supplier().await;
    let (_, customer) = app.customer("Aisyah").await;

    // Suppliers cannot place orders
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/orders",
            Some(&supplier),
            Some(order_body(&[(catalog.product, 1)])),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), 2002);

    // Customers cannot touch stock or the delivery fee
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/v1/stocks/{}", catalog.stock_b),
            Some(&customer),
            Some(json!({ "stock": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/v1/configuration",
            Some(&customer),
            Some(json!({ "delivery_fee": "0.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customers_only_see_and_confirm_their_own_orders() {
    let mut app = TestApp::new(dec("5.00"));
    let catalog = seed_catalog(&app, 0, 5).await;
    let (_, owner) = app.customer("Aisyah").await;
    let (_, other) = app.customer("Farid").await;

    let (_, placed) = app
        .send(
            Method::POST,
            "/api/v1/orders",
            Some(&owner),
            Some(order_body(&[(catalog.product, 1)])),
        )
        .await;
    let order_id = placed["data"]["id"].as_str().unwrap().to_string();
    let payment_id = placed["data"]["payment"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/v1/orders/{order_id}"), &other).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), 2006);

    let (_, listed) = app.get("/api/v1/orders", &other).await;
    assert!(listed["data"].as_array().unwrap().is_empty());

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/payments/{payment_id}"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), 2006);
    assert!(app.receipts.try_recv().is_err());

    // Admins act on any order
    let (_, admin) = app.admin().await;
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/payments/{payment_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(app.receipts.try_recv().is_ok());
}

#[tokio::test]
async fn suppliers_only_manage_their_own_products() {
    let app = TestApp::new(dec("5.00"));
    let catalog = seed_catalog(&app, 0, 5).await;
    let (_, stranger) = app.supplier().await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/products/{}", catalog.product),
            Some(&stranger),
            Some(json!({ "price": "1.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), 2001);
}

#[tokio::test]
async fn register_login_logout_round() {
    let app = TestApp::new(dec("5.00"));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/customer/register",
            None,
            Some(json!({
                "name": "Nurul",
                "gender": "female",
                "date_of_birth": "1995-03-14",
                "address": "12 Jalan Tun Razak",
                "phone_no": "0112223333",
                "email": "Nurul@Example.com",
                "password": "kopi-o-kosong",
                "confirm_password": "kopi-o-kosong",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user"]["email"], "nurul@example.com");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let login = json!({ "email": "nurul@example.com", "password": "kopi-o-kosong" });
    let (status, body) = app
        .send(Method::POST, "/api/v1/customer/login", None, Some(login.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["data"]["session"].as_str().unwrap().to_string();

    let (status, _) = app.get("/api/v1/orders", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::POST, "/api/v1/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    let (status, _) = app.get("/api/v1/orders", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = json!({ "email": "nurul@example.com", "password": "teh-tarik-kurang" });
    let (status, body) = app
        .send(Method::POST, "/api/v1/customer/login", None, Some(wrong))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), 1002);
}
