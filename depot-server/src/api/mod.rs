//! HTTP API
//!
//! Every resource lives in its own module with a `router()`; all paths sit
//! under `/api/v1` except `/health`. Handlers authenticate with the
//! [`CurrentSession`](crate::auth::CurrentSession) extractor and check the
//! policy table themselves.
//!
//! - [`health`] - liveness
//! - [`account`] - registration, login, logout, password change
//! - [`warehouses`], [`categories`], [`products`], [`stocks`] - catalog
//! - [`orders`], [`order_products`], [`payments`] - order workflow
//! - [`couriers`], [`shipments`] - delivery
//! - [`configuration`] - delivery fee

pub mod account;
pub mod categories;
pub mod configuration;
pub mod couriers;
pub mod health;
pub mod middleware;
pub mod order_products;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shipments;
pub mod stocks;
pub mod warehouses;

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator (UUID v4)
#[derive(Clone, Copy)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(account::router())
        .merge(warehouses::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(stocks::router())
        .merge(orders::router())
        .merge(order_products::router())
        .merge(payments::router())
        .merge(couriers::router())
        .merge(shipments::router())
        .merge(configuration::router())
}

/// Fully configured application, used by the server and by tests
pub fn build_app(state: &AppState) -> Router {
    // The HTTP deadline sits above the service deadline so services report
    // their own TimeoutError first.
    let http_timeout = state.request_timeout + Duration::from_secs(5);

    build_router()
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            http_timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Outermost: resolve the session once so logging sees the caller
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session_middleware,
        ))
        .with_state(state.clone())
}
