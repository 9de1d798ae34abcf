//! depot-server: multi-role order fulfilment backend
//!
//! Customers place orders against warehouse stock, suppliers manage their
//! products, admins run the catalog. The core is order placement:
//!
//! - [`services::warehouse_selector`] - nearest active warehouse
//! - [`services::stock_ledger`] - conditional decrements and product aggregates
//! - [`services::order_assembler`] - the transactional placement workflow
//! - [`services::payments`] - confirmation and receipt dispatch
//! - [`services::composer`] - nested read models for responses
//! - [`services::shipments`] - courier delivery that completes orders
//!
//! Persistence is behind [`db::Store`] (PostgreSQL or in-process), sessions
//! behind [`auth::SessionStore`], outbound mail behind
//! [`notify::NotificationSink`].

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod notify;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Config;
pub use state::AppState;
