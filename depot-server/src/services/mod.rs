//! Business services
//!
//! Order placement workflow:
//!
//! ```text
//! order_assembler ──► warehouse_selector   (nearest active warehouse)
//!        │
//!        ├──────────► stock_ledger         (conditional decrement + aggregate)
//!        │
//!        └──────────► composer             (nested read models)
//!
//! payments::confirm ─► composer ─► notify::receipt ─► NotificationQueue
//!
//! shipments::update_status ─► Delivered ─► order Completed
//! ```
//!
//! Every service takes `&AppState` (store, clock, ids, notifier), runs its
//! store work inside one `StoreTx` and is bounded by [`with_deadline`].

pub mod account;
pub mod catalog;
pub mod composer;
pub mod order_assembler;
pub mod orders;
pub mod payments;
pub mod shipments;
pub mod stock_ledger;
pub mod warehouse_selector;

use std::future::Future;

use shared::error::{AppError, ErrorCode};

use crate::error::ServiceResult;
use crate::state::AppState;

/// Bound `work` by the configured request deadline
///
/// On expiry the future is dropped, and with it any uncommitted transaction.
pub async fn with_deadline<T>(
    state: &AppState,
    work: impl Future<Output = ServiceResult<T>>,
) -> ServiceResult<T> {
    match tokio::time::timeout(state.request_timeout, work).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Service call exceeded deadline"
            );
            Err(AppError::new(ErrorCode::TimeoutError).into())
        }
    }
}
