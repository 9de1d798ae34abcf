//! Stock Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantity on hand for one (warehouse, product) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Stock {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub stock: i32,
    pub is_delete: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create stock payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCreate {
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub stock: i32,
}

/// Update stock payload (manual replenishment / correction)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdate {
    pub stock: i32,
}
