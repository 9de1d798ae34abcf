//! Error codes, the application error and the response envelope
//!
//! Handlers return [`AppResult`]; an [`AppError`] renders as
//!
//! ```json
//! {"data": null, "errors": [{"code": 3004, "message": "Insufficient stock", "details": {...}}]}
//! ```
//!
//! with the HTTP status taken from its [`ErrorCode`].
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::InsufficientStock)
//!     .with_detail("available", 1)
//!     .with_detail("requested", 2);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.errors[0].code, 3004);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorBody};
