//! Shipment Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shipment lifecycle: Pending → Delivered | Failed
///
/// A failed shipment frees its order for another attempt; a delivered one
/// completes the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "shipment_status", rename_all = "lowercase"))]
pub enum ShipmentStatus {
    #[default]
    Pending,
    Delivered,
    Failed,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Failed => "failed",
        }
    }

    pub fn is_closed(&self) -> bool {
        !matches!(self, ShipmentStatus::Pending)
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipment entity: one courier delivering one confirmed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shipment {
    pub id: Uuid,
    pub courier_id: Uuid,
    pub order_id: Uuid,
    pub status: ShipmentStatus,
    pub is_delete: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create shipment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentCreate {
    pub courier_id: Uuid,
    pub order_id: Uuid,
}

/// Update shipment status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentStatusUpdate {
    pub status: ShipmentStatus,
}
