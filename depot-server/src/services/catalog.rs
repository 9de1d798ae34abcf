//! Catalog administration
//!
//! Warehouses, categories, products, stock rows and the delivery fee.
//! Stock writes go through the ledger so the product aggregate stays in
//! step; product CRUD never touches `product.stock`.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, CategoryCreate, Configuration, Product, ProductCreate, ProductUpdate, ProductView,
    StockCreate, StockView, Warehouse, WarehouseCreate, WarehouseDistance, WarehouseUpdate,
};
use uuid::Uuid;

use super::{composer, stock_ledger, with_deadline};
use crate::auth::Access;
use crate::db::{CatalogRepo, InventoryRepo, ListQuery, OrderRepo, RepoError, Scope, Stamp};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_coordinate,
    validate_money, validate_optional_text, validate_required_text, validate_stock_level,
};

fn stamp_now(state: &AppState, actor_id: Uuid) -> Stamp {
    Stamp {
        by: actor_id,
        at: state.clock.now(),
    }
}

// ════════════════════════════════════════════════════════════════
// Warehouses
// ════════════════════════════════════════════════════════════════

pub async fn list_warehouses(state: &AppState, q: &ListQuery) -> ServiceResult<Vec<Warehouse>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        Ok(tx.list_warehouses(q).await?)
    })
    .await
}

/// Active warehouses ranked by distance to a delivery point
pub async fn rank_warehouses(
    state: &AppState,
    latitude: Decimal,
    longitude: Decimal,
    q: &ListQuery,
) -> ServiceResult<Vec<WarehouseDistance>> {
    with_deadline(state, async {
        validate_coordinate(latitude, longitude)?;
        let mut tx = state.store.begin().await?;
        Ok(tx.warehouses_by_distance(latitude, longitude, q).await?)
    })
    .await
}

pub async fn get_warehouse(state: &AppState, id: Uuid) -> ServiceResult<Warehouse> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        Ok(tx
            .get_warehouse(id, Scope::Active)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::WarehouseNotFound))?)
    })
    .await
}

pub async fn create_warehouse(
    state: &AppState,
    payload: WarehouseCreate,
    actor_id: Uuid,
) -> ServiceResult<Warehouse> {
    with_deadline(state, async {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
        validate_required_text(&payload.phone_no, "phone_no", MAX_SHORT_TEXT_LEN)?;
        validate_coordinate(payload.latitude, payload.longitude)?;

        let stamp = stamp_now(state, actor_id);
        let warehouse = Warehouse {
            id: state.ids.next_id(),
            name: payload.name.trim().to_string(),
            address: payload.address.trim().to_string(),
            latitude: payload.latitude,
            longitude: payload.longitude,
            phone_no: payload.phone_no.trim().to_string(),
            is_delete: false,
            created_by: stamp.by,
            created_at: stamp.at,
            updated_by: None,
            updated_at: None,
        };

        let mut tx = state.store.begin().await?;
        tx.insert_warehouse(&warehouse).await?;
        tx.commit().await?;

        tracing::info!(warehouse_id = %warehouse.id, name = %warehouse.name, "Warehouse created");
        Ok(warehouse)
    })
    .await
}

pub async fn update_warehouse(
    state: &AppState,
    id: Uuid,
    payload: WarehouseUpdate,
    actor_id: Uuid,
) -> ServiceResult<Warehouse> {
    with_deadline(state, async {
        validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&payload.phone_no, "phone_no", MAX_SHORT_TEXT_LEN)?;

        let mut tx = state.store.begin().await?;
        let current = tx
            .get_warehouse(id, Scope::Active)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::WarehouseNotFound))?;

        let stamp = stamp_now(state, actor_id);
        let warehouse = Warehouse {
            name: payload.name.map(|s| s.trim().to_string()).unwrap_or(current.name),
            address: payload
                .address
                .map(|s| s.trim().to_string())
                .unwrap_or(current.address),
            latitude: payload.latitude.unwrap_or(current.latitude),
            longitude: payload.longitude.unwrap_or(current.longitude),
            phone_no: payload
                .phone_no
                .map(|s| s.trim().to_string())
                .unwrap_or(current.phone_no),
            updated_by: Some(stamp.by),
            updated_at: Some(stamp.at),
            ..current
        };
        validate_required_text(&warehouse.name, "name", MAX_NAME_LEN)?;
        validate_coordinate(warehouse.latitude, warehouse.longitude)?;

        tx.update_warehouse(&warehouse).await?;
        tx.commit().await?;
        Ok(warehouse)
    })
    .await
}

pub async fn delete_warehouse(state: &AppState, id: Uuid, actor_id: Uuid) -> ServiceResult<()> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        if !tx.delete_warehouse(id, stamp_now(state, actor_id)).await? {
            return Err(AppError::new(ErrorCode::WarehouseNotFound).into());
        }
        tx.commit().await?;
        tracing::info!(warehouse_id = %id, "Warehouse deleted");
        Ok(())
    })
    .await
}

// ════════════════════════════════════════════════════════════════
// Categories
// ════════════════════════════════════════════════════════════════

pub async fn list_categories(state: &AppState, q: &ListQuery) -> ServiceResult<Vec<Category>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        Ok(tx.list_categories(q).await?)
    })
    .await
}

pub async fn get_category(state: &AppState, id: Uuid) -> ServiceResult<Category> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        Ok(tx
            .get_category(id, Scope::Active)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?)
    })
    .await
}

pub async fn create_category(
    state: &AppState,
    payload: CategoryCreate,
    actor_id: Uuid,
) -> ServiceResult<Category> {
    with_deadline(state, async {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

        let stamp = stamp_now(state, actor_id);
        let category = Category {
            id: state.ids.next_id(),
            name: payload.name.trim().to_string(),
            is_delete: false,
            created_by: stamp.by,
            created_at: stamp.at,
            updated_by: None,
            updated_at: None,
        };

        let mut tx = state.store.begin().await?;
        match tx.insert_category(&category).await {
            Ok(()) => {}
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::new(ErrorCode::CategoryNameExists)
                    .with_detail("name", category.name)
                    .into());
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;
        Ok(category)
    })
    .await
}

// ════════════════════════════════════════════════════════════════
// Products
// ════════════════════════════════════════════════════════════════

pub async fn list_products(state: &AppState, q: &ListQuery) -> ServiceResult<Vec<ProductView>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let products = tx.list_products(q).await?;

        let mut views = Vec::with_capacity(products.len());
        for product in products {
            views.push(composer::product_view(tx.as_mut(), product).await?);
        }
        Ok(views)
    })
    .await
}

pub async fn get_product(state: &AppState, id: Uuid) -> ServiceResult<ProductView> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let product = tx
            .get_product(id, Scope::Active)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
        composer::product_view(tx.as_mut(), product).await
    })
    .await
}

/// New product owned by the calling supplier; stock starts at zero
pub async fn create_product(
    state: &AppState,
    payload: ProductCreate,
    supplier_id: Uuid,
) -> ServiceResult<ProductView> {
    with_deadline(state, async {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&Some(payload.description.clone()), "description", MAX_NOTE_LEN)?;
        validate_money(payload.price, "price")?;

        let mut tx = state.store.begin().await?;
        if tx
            .get_category(payload.category_id, Scope::Active)
            .await?
            .is_none()
        {
            return Err(AppError::new(ErrorCode::CategoryNotFound).into());
        }

        let stamp = stamp_now(state, supplier_id);
        let product = Product {
            id: state.ids.next_id(),
            name: payload.name.trim().to_string(),
            description: payload.description.trim().to_string(),
            price: payload.price,
            category_id: payload.category_id,
            supplier_id,
            stock: 0,
            is_delete: false,
            created_by: stamp.by,
            created_at: stamp.at,
            updated_by: None,
            updated_at: None,
        };
        tx.insert_product(&product).await?;
        let view = composer::product_view(tx.as_mut(), product).await?;
        tx.commit().await?;

        tracing::info!(product_id = %view.product.id, supplier_id = %supplier_id, "Product created");
        Ok(view)
    })
    .await
}

/// Suppliers may only change their own products (`Access::Own`)
pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: ProductUpdate,
    access: Access,
    actor_id: Uuid,
) -> ServiceResult<ProductView> {
    with_deadline(state, async {
        validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        if let Some(price) = payload.price {
            validate_money(price, "price")?;
        }

        let mut tx = state.store.begin().await?;
        let current = tx
            .get_product(id, Scope::Active)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
        access.ensure_owns(current.supplier_id, ErrorCode::PermissionDenied)?;

        if let Some(category_id) = payload.category_id
            && tx.get_category(category_id, Scope::Active).await?.is_none()
        {
            return Err(AppError::new(ErrorCode::CategoryNotFound).into());
        }

        let stamp = stamp_now(state, actor_id);
        let product = Product {
            name: payload.name.map(|s| s.trim().to_string()).unwrap_or(current.name),
            description: payload
                .description
                .map(|s| s.trim().to_string())
                .unwrap_or(current.description),
            price: payload.price.unwrap_or(current.price),
            category_id: payload.category_id.unwrap_or(current.category_id),
            updated_by: Some(stamp.by),
            updated_at: Some(stamp.at),
            ..current
        };
        validate_required_text(&product.name, "name", MAX_NAME_LEN)?;

        tx.update_product(&product).await?;
        let view = composer::product_view(tx.as_mut(), product).await?;
        tx.commit().await?;
        Ok(view)
    })
    .await
}

pub async fn delete_product(
    state: &AppState,
    id: Uuid,
    access: Access,
    actor_id: Uuid,
) -> ServiceResult<()> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let product = tx
            .get_product(id, Scope::Active)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
        access.ensure_owns(product.supplier_id, ErrorCode::PermissionDenied)?;

        tx.delete_product(id, stamp_now(state, actor_id)).await?;
        tx.commit().await?;
        tracing::info!(product_id = %id, actor_id = %actor_id, "Product deleted");
        Ok(())
    })
    .await
}

// ════════════════════════════════════════════════════════════════
// Stock
// ════════════════════════════════════════════════════════════════

pub async fn list_stocks(state: &AppState, q: &ListQuery) -> ServiceResult<Vec<StockView>> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let stocks = tx.list_stocks(q).await?;

        let mut views = Vec::with_capacity(stocks.len());
        for stock in stocks {
            views.push(composer::stock_view(tx.as_mut(), stock).await?);
        }
        Ok(views)
    })
    .await
}

pub async fn get_stock(state: &AppState, id: Uuid) -> ServiceResult<StockView> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        let stock = tx
            .get_stock(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::StockNotFound))?;
        composer::stock_view(tx.as_mut(), stock).await
    })
    .await
}

pub async fn add_stock(
    state: &AppState,
    payload: StockCreate,
    actor_id: Uuid,
) -> ServiceResult<StockView> {
    with_deadline(state, async {
        validate_stock_level(payload.stock)?;

        let mut tx = state.store.begin().await?;
        let stock = stock_ledger::add(
            tx.as_mut(),
            state.ids.next_id(),
            payload.warehouse_id,
            payload.product_id,
            payload.stock,
            stamp_now(state, actor_id),
        )
        .await?;
        let view = composer::stock_view(tx.as_mut(), stock).await?;
        tx.commit().await?;

        tracing::info!(
            stock_id = %view.stock.id,
            warehouse_id = %view.stock.warehouse_id,
            product_id = %view.stock.product_id,
            stock = view.stock.stock,
            "Stock row created"
        );
        Ok(view)
    })
    .await
}

pub async fn set_stock(
    state: &AppState,
    id: Uuid,
    quantity: i32,
    actor_id: Uuid,
) -> ServiceResult<StockView> {
    with_deadline(state, async {
        validate_stock_level(quantity)?;

        let mut tx = state.store.begin().await?;
        let stock = stock_ledger::set(tx.as_mut(), id, quantity, stamp_now(state, actor_id)).await?;
        let view = composer::stock_view(tx.as_mut(), stock).await?;
        tx.commit().await?;
        Ok(view)
    })
    .await
}

// ════════════════════════════════════════════════════════════════
// Configuration
// ════════════════════════════════════════════════════════════════

pub async fn get_configuration(state: &AppState) -> ServiceResult<Configuration> {
    with_deadline(state, async {
        let mut tx = state.store.begin().await?;
        Ok(tx.get_configuration().await?)
    })
    .await
}

/// Applies to orders placed from now on; existing totals are not touched
pub async fn set_delivery_fee(
    state: &AppState,
    fee: Decimal,
    actor_id: Uuid,
) -> ServiceResult<Configuration> {
    with_deadline(state, async {
        validate_money(fee, "delivery_fee")?;

        let mut tx = state.store.begin().await?;
        let config = tx.set_delivery_fee(fee, stamp_now(state, actor_id)).await?;
        tx.commit().await?;

        tracing::info!(delivery_fee = %config.delivery_fee, actor_id = %actor_id, "Delivery fee updated");
        Ok(config)
    })
    .await
}
