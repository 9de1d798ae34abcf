//! Nearest fulfilling warehouse
//!
//! Distance is the flat-earth approximation in miles:
//!
//! ```text
//! d = sqrt((69.1 · (lat_w − lat))² + (69.1 · (lon − lon_w) · cos(lat_w / 57.3))²)
//! ```
//!
//! Good enough for ranking warehouses within one country. Stock is not
//! considered here; the ledger reports an out-of-stock nearest warehouse.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{SortDir, Warehouse};

use crate::db::{CatalogRepo, ListQuery, StoreTx};
use crate::error::ServiceResult;

/// Miles per degree of latitude
const MILES_PER_DEGREE: f64 = 69.1;
/// Degrees per radian, as used by the approximation
const DEGREES_PER_RADIAN: f64 = 57.3;

pub fn planar_distance(lat_w: f64, lon_w: f64, lat: f64, lon: f64) -> f64 {
    let dy = MILES_PER_DEGREE * (lat_w - lat);
    let dx = MILES_PER_DEGREE * (lon - lon_w) * (lat_w / DEGREES_PER_RADIAN).cos();
    (dy * dy + dx * dx).sqrt()
}

/// Nearest active warehouse to the delivery point; ties go to the lower id
pub async fn nearest(
    tx: &mut dyn StoreTx,
    latitude: Decimal,
    longitude: Decimal,
) -> ServiceResult<Warehouse> {
    let q = ListQuery {
        limit: 1,
        offset: 0,
        search: None,
        dir: SortDir::Asc,
    };
    let ranked = tx.warehouses_by_distance(latitude, longitude, &q).await?;

    match ranked.into_iter().next() {
        Some(hit) => {
            tracing::debug!(
                warehouse_id = %hit.warehouse.id,
                distance = hit.distance,
                "Selected fulfilling warehouse"
            );
            Ok(hit.warehouse)
        }
        None => Err(AppError::new(ErrorCode::NoFulfillmentWarehouse).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, Stamp, Store};
    use crate::error::ServiceError;
    use chrono::Utc;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn warehouse(id: Uuid, name: &str, lat: &str, lon: &str) -> Warehouse {
        Warehouse {
            id,
            name: name.into(),
            address: String::new(),
            latitude: dec(lat),
            longitude: dec(lon),
            phone_no: String::new(),
            is_delete: false,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_planar_distance_zero_at_same_point() {
        assert_eq!(planar_distance(3.1, 101.6, 3.1, 101.6), 0.0);
        let one_degree = planar_distance(1.0, 0.0, 0.0, 0.0);
        assert!((one_degree - 69.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_nearest_picks_closer_warehouse() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let a = warehouse(Uuid::new_v4(), "A", "3.1", "101.6");
        let b = warehouse(Uuid::new_v4(), "B", "3.05", "101.55");
        tx.insert_warehouse(&a).await.unwrap();
        tx.insert_warehouse(&b).await.unwrap();

        let hit = nearest(tx.as_mut(), dec("3.06"), dec("101.56")).await.unwrap();
        assert_eq!(hit.id, b.id);
    }

    #[tokio::test]
    async fn test_tie_goes_to_lower_id() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);
        tx.insert_warehouse(&warehouse(high, "H", "3.0", "101.0")).await.unwrap();
        tx.insert_warehouse(&warehouse(low, "L", "3.0", "101.0")).await.unwrap();

        let hit = nearest(tx.as_mut(), dec("3.5"), dec("101.5")).await.unwrap();
        assert_eq!(hit.id, low);
    }

    #[tokio::test]
    async fn test_deleted_and_missing_warehouses() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let err = nearest(tx.as_mut(), dec("3.0"), dec("101.0")).await.unwrap_err();
        assert!(matches!(err, ServiceError::App(e) if e.code == ErrorCode::NoFulfillmentWarehouse));

        let w = warehouse(Uuid::new_v4(), "Gone", "3.0", "101.0");
        tx.insert_warehouse(&w).await.unwrap();
        let stamp = Stamp {
            by: Uuid::nil(),
            at: Utc::now(),
        };
        tx.delete_warehouse(w.id, stamp).await.unwrap();
        assert!(nearest(tx.as_mut(), dec("3.0"), dec("101.0")).await.is_err());
    }
}
