//! Unified service-layer error type
//!
//! `ServiceError` bridges repository errors (`RepoError`) and the API-layer
//! error (`AppError`) so services can use `?` on both without hand-written
//! `map_err` at every call site.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::RepoError;

/// Service-layer error
///
/// - `Db`: store errors (infrastructure ones are logged and hidden behind InternalError)
/// - `App`: business-rule errors, passed through to the client unchanged
#[derive(Debug)]
pub enum ServiceError {
    Db(RepoError),
    App(AppError),
}

impl ServiceError {
    /// Serialization failure or deadlock: the transaction can be replayed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Db(e) if e.is_retryable())
    }
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(RepoError::NotFound(what)) => {
                tracing::debug!(what = %what, "Store row not found");
                AppError::new(ErrorCode::NotFound)
            }
            ServiceError::Db(RepoError::Duplicate(constraint)) => {
                tracing::debug!(constraint = %constraint, "Unique constraint violated");
                AppError::new(ErrorCode::AlreadyExists)
            }
            ServiceError::Db(RepoError::Conflict(msg)) => {
                tracing::warn!(error = %msg, "Store conflict not resolved by retry");
                AppError::new(ErrorCode::StoreBusy)
            }
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
