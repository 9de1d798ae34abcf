//! Stock ledger
//!
//! The only code that writes stock rows. Every write recomputes the owning
//! product's aggregate in the same transaction. Lock order is product row
//! first, stock row second.

use shared::error::{AppError, ErrorCode};
use shared::models::Stock;
use uuid::Uuid;

use crate::db::{CatalogRepo, InventoryRepo, RepoError, Scope, Stamp, StoreTx};
use crate::error::ServiceResult;

/// Take `quantity` from the (warehouse, product) row; returns what is left
pub async fn decrement(
    tx: &mut dyn StoreTx,
    warehouse_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    stamp: Stamp,
) -> ServiceResult<i32> {
    if !tx.lock_product(product_id).await? {
        return Err(product_not_found(product_id).into());
    }

    let Some(stock) = tx.find_stock(warehouse_id, product_id).await? else {
        return Err(AppError::new(ErrorCode::ProductNotStockedAtWarehouse)
            .with_detail("product_id", product_id.to_string())
            .with_detail("warehouse_id", warehouse_id.to_string())
            .into());
    };

    let Some(remaining) = tx.decrement_stock(stock.id, quantity, stamp).await? else {
        return Err(AppError::new(ErrorCode::InsufficientStock)
            .with_detail("product_id", product_id.to_string())
            .with_detail("available", stock.stock)
            .with_detail("requested", quantity)
            .into());
    };

    recompute_aggregate(tx, product_id, stamp).await?;
    Ok(remaining)
}

/// Open a stock row for a (warehouse, product) pair that has none
pub async fn add(
    tx: &mut dyn StoreTx,
    id: Uuid,
    warehouse_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    stamp: Stamp,
) -> ServiceResult<Stock> {
    if !tx.lock_product(product_id).await? {
        return Err(product_not_found(product_id).into());
    }
    if tx.get_warehouse(warehouse_id, Scope::Active).await?.is_none() {
        return Err(AppError::new(ErrorCode::WarehouseNotFound).into());
    }
    if tx.find_stock(warehouse_id, product_id).await?.is_some() {
        return Err(stock_exists().into());
    }

    let stock = Stock {
        id,
        warehouse_id,
        product_id,
        stock: quantity,
        is_delete: false,
        created_by: stamp.by,
        created_at: stamp.at,
        updated_by: None,
        updated_at: None,
    };
    match tx.insert_stock(&stock).await {
        Ok(()) => {}
        Err(RepoError::Duplicate(_)) => return Err(stock_exists().into()),
        Err(e) => return Err(e.into()),
    }

    recompute_aggregate(tx, product_id, stamp).await?;
    Ok(stock)
}

/// Overwrite the quantity on hand (manual replenishment / stock take)
pub async fn set(
    tx: &mut dyn StoreTx,
    stock_id: Uuid,
    quantity: i32,
    stamp: Stamp,
) -> ServiceResult<Stock> {
    let Some(stock) = tx.get_stock(stock_id).await? else {
        return Err(AppError::new(ErrorCode::StockNotFound).into());
    };

    tx.lock_product(stock.product_id).await?;
    if !tx.set_stock_quantity(stock_id, quantity, stamp).await? {
        return Err(AppError::new(ErrorCode::StockNotFound).into());
    }
    recompute_aggregate(tx, stock.product_id, stamp).await?;

    Ok(Stock {
        stock: quantity,
        updated_by: Some(stamp.by),
        updated_at: Some(stamp.at),
        ..stock
    })
}

/// Sum the product's active stock rows onto `product.stock`
pub async fn recompute_aggregate(
    tx: &mut dyn StoreTx,
    product_id: Uuid,
    stamp: Stamp,
) -> ServiceResult<i32> {
    let total = tx.sum_stock(product_id).await?;
    let aggregate = i32::try_from(total).map_err(|_| {
        AppError::with_message(ErrorCode::ValueOutOfRange, "product stock overflow")
            .with_detail("product_id", product_id.to_string())
            .with_detail("total", total)
    })?;
    tx.set_product_stock(product_id, aggregate, stamp).await?;
    tracing::debug!(product_id = %product_id, aggregate, "Product stock recomputed");
    Ok(aggregate)
}

fn product_not_found(product_id: Uuid) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", product_id.to_string())
}

fn stock_exists() -> AppError {
    AppError::new(ErrorCode::StockAlreadyExists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, Store};
    use crate::error::ServiceError;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::models::{Product, Warehouse};

    fn stamp() -> Stamp {
        Stamp {
            by: Uuid::nil(),
            at: Utc::now(),
        }
    }

    fn code(err: ServiceError) -> ErrorCode {
        match err {
            ServiceError::App(e) => e.code,
            ServiceError::Db(e) => panic!("unexpected store error: {e}"),
        }
    }

    async fn seed(tx: &mut dyn StoreTx) -> (Uuid, Uuid, Uuid) {
        let now = Utc::now();
        let mut warehouses = Vec::new();
        for name in ["North", "South"] {
            let w = Warehouse {
                id: Uuid::new_v4(),
                name: name.into(),
                address: String::new(),
                latitude: Decimal::ZERO,
                longitude: Decimal::ZERO,
                phone_no: String::new(),
                is_delete: false,
                created_by: Uuid::nil(),
                created_at: now,
                updated_by: None,
                updated_at: None,
            };
            tx.insert_warehouse(&w).await.unwrap();
            warehouses.push(w.id);
        }
        let product = Product {
            id: Uuid::new_v4(),
            name: "Milo".into(),
            description: String::new(),
            price: Decimal::new(1000, 2),
            category_id: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            stock: 0,
            is_delete: false,
            created_by: Uuid::nil(),
            created_at: now,
            updated_by: None,
            updated_at: None,
        };
        tx.insert_product(&product).await.unwrap();
        (warehouses[0], warehouses[1], product.id)
    }

    async fn aggregate(tx: &mut dyn StoreTx, product_id: Uuid) -> i32 {
        tx.get_product(product_id, Scope::Active)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    #[tokio::test]
    async fn test_aggregate_tracks_every_mutation() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let (north, south, product) = seed(tx.as_mut()).await;

        let n = add(tx.as_mut(), Uuid::new_v4(), north, product, 5, stamp())
            .await
            .unwrap();
        add(tx.as_mut(), Uuid::new_v4(), south, product, 7, stamp())
            .await
            .unwrap();
        assert_eq!(aggregate(tx.as_mut(), product).await, 12);

        assert_eq!(decrement(tx.as_mut(), north, product, 2, stamp()).await.unwrap(), 3);
        assert_eq!(aggregate(tx.as_mut(), product).await, 10);

        set(tx.as_mut(), n.id, 20, stamp()).await.unwrap();
        assert_eq!(aggregate(tx.as_mut(), product).await, 27);
        assert_eq!(tx.sum_stock(product).await.unwrap(), 27);
    }

    #[tokio::test]
    async fn test_decrement_failures() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let (north, south, product) = seed(tx.as_mut()).await;
        add(tx.as_mut(), Uuid::new_v4(), north, product, 1, stamp())
            .await
            .unwrap();

        let err = decrement(tx.as_mut(), north, product, 2, stamp()).await.unwrap_err();
        assert_eq!(code(err), ErrorCode::InsufficientStock);

        let err = decrement(tx.as_mut(), south, product, 1, stamp()).await.unwrap_err();
        assert_eq!(code(err), ErrorCode::ProductNotStockedAtWarehouse);

        let err = decrement(tx.as_mut(), north, Uuid::new_v4(), 1, stamp())
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::ProductNotFound);

        assert_eq!(aggregate(tx.as_mut(), product).await, 1);
    }

    #[tokio::test]
    async fn test_aggregate_overflow_is_rejected() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let (north, south, product) = seed(tx.as_mut()).await;
        for warehouse_id in [north, south] {
            let row = Stock {
                id: Uuid::new_v4(),
                warehouse_id,
                product_id: product,
                stock: i32::MAX,
                is_delete: false,
                created_by: Uuid::nil(),
                created_at: Utc::now(),
                updated_by: None,
                updated_at: None,
            };
            tx.insert_stock(&row).await.unwrap();
        }

        assert_eq!(tx.sum_stock(product).await.unwrap(), 2 * i64::from(i32::MAX));
        let err = recompute_aggregate(tx.as_mut(), product, stamp())
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::ValueOutOfRange);
        assert_eq!(aggregate(tx.as_mut(), product).await, 0);
    }

    #[tokio::test]
    async fn test_add_existing_pair_conflicts() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let (north, _, product) = seed(tx.as_mut()).await;
        add(tx.as_mut(), Uuid::new_v4(), north, product, 1, stamp())
            .await
            .unwrap();

        let err = add(tx.as_mut(), Uuid::new_v4(), north, product, 4, stamp())
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::StockAlreadyExists);
    }
}
