//! Data models
//!
//! Entity rows, request payloads and the nested read models returned by the API.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are UUID v4; money and coordinates are `Decimal`.

pub mod account;
pub mod category;
pub mod configuration;
pub mod filter;
pub mod order;
pub mod payment;
pub mod product;
pub mod shipment;
pub mod stock;
pub mod view;
pub mod warehouse;

// Re-exports
pub use account::*;
pub use category::*;
pub use configuration::*;
pub use filter::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use shipment::*;
pub use stock::*;
pub use view::*;
pub use warehouse::*;
