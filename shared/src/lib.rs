//! Shared types for the depot backend
//!
//! Error codes, the `{data, errors}` response envelope, entity models and
//! the nested read models returned by the API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
