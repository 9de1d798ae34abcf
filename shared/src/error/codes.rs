//! Error codes
//!
//! One table declares every code: its wire value, the HTTP status it maps
//! to and the client-facing message. The thousands digit is the domain
//! (see [`ErrorCategory`](super::ErrorCategory)).

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! error_codes {
    ($(
        $(#[$meta:meta])*
        $name:ident = $value:literal, $status:ident, $message:literal;
    )+) => {
        /// Error code carried in every `errors[]` entry (a `u16` on the wire)
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$meta])* $name = $value, )+
        }

        impl ErrorCode {
            /// Every code, in table order
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$name),+];

            /// Client-facing English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $message, )+
                }
            }

            pub fn http_status(&self) -> StatusCode {
                match self {
                    $( ErrorCode::$name => StatusCode::$status, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )+
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    // ── 0xxx general ───────────────────────────────────────────────
    Success = 0, OK, "Operation completed successfully";
    Unknown = 1, INTERNAL_SERVER_ERROR, "An unknown error occurred";
    ValidationFailed = 2, BAD_REQUEST, "Validation failed";
    NotFound = 3, NOT_FOUND, "Resource not found";
    AlreadyExists = 4, CONFLICT, "Resource already exists";
    InvalidRequest = 5, BAD_REQUEST, "Invalid request";
    RequiredField = 7, BAD_REQUEST, "Required field is missing";
    ValueOutOfRange = 8, BAD_REQUEST, "Value is out of range";

    // ── 1xxx authentication ────────────────────────────────────────
    /// No `session` header
    NotAuthenticated = 1001, UNAUTHORIZED, "Session is required";
    InvalidCredentials = 1002, UNAUTHORIZED, "Invalid credentials";
    /// Unknown or expired session token
    SessionExpired = 1005, UNAUTHORIZED, "Session has expired";
    AccountDisabled = 1007, UNAUTHORIZED, "Account is disabled";
    PasswordMismatch = 1008, BAD_REQUEST, "Password does not match confirmation";
    PasswordUnchanged = 1009, BAD_REQUEST, "New password must differ from the current one";

    // ── 2xxx permission ────────────────────────────────────────────
    PermissionDenied = 2001, FORBIDDEN, "Permission denied";
    /// Caller's role is not in the operation's policy
    RoleRequired = 2002, FORBIDDEN, "Specific role is required";
    OrderOwnershipMismatch = 2006, FORBIDDEN, "Order belongs to another customer";
    ShipmentOwnershipMismatch = 2007, FORBIDDEN, "Shipment is assigned to another courier";

    // ── 3xxx inventory ─────────────────────────────────────────────
    WarehouseNotFound = 3001, NOT_FOUND, "Warehouse not found";
    StockNotFound = 3002, NOT_FOUND, "Stock not found";
    StockAlreadyExists = 3003, CONFLICT, "Stock already exists for this warehouse and product";
    InsufficientStock = 3004, BAD_REQUEST, "Insufficient stock";
    NoFulfillmentWarehouse = 3005, BAD_REQUEST, "No warehouse available for fulfilment";
    ProductNotStockedAtWarehouse = 3006, BAD_REQUEST, "Product is not stocked at the fulfilling warehouse";

    // ── 4xxx order ─────────────────────────────────────────────────
    OrderNotFound = 4001, NOT_FOUND, "Order not found";
    LineItemNotFound = 4002, NOT_FOUND, "Order line item not found";
    OrderEmpty = 4003, BAD_REQUEST, "Order has no products";
    /// Shipping needs a paid, confirmed order
    OrderNotConfirmed = 4004, CONFLICT, "Order is not confirmed";

    // ── 5xxx payment ───────────────────────────────────────────────
    PaymentNotFound = 5001, NOT_FOUND, "Payment not found";
    PaymentAlreadyConfirmed = 5002, CONFLICT, "Payment already confirmed";

    // ── 6xxx product ───────────────────────────────────────────────
    ProductNotFound = 6001, NOT_FOUND, "Product not found";
    CategoryNotFound = 6002, NOT_FOUND, "Category not found";
    CategoryNameExists = 6003, CONFLICT, "Category name already exists";

    // ── 7xxx account ───────────────────────────────────────────────
    CustomerNotFound = 7001, NOT_FOUND, "Customer not found";
    SupplierNotFound = 7002, NOT_FOUND, "Supplier not found";
    EmailExists = 7003, CONFLICT, "Email is already registered";
    CourierNotFound = 7004, NOT_FOUND, "Courier not found";

    // ── 8xxx shipment ──────────────────────────────────────────────
    ShipmentNotFound = 8001, NOT_FOUND, "Shipment not found";
    /// The order already has a pending or delivered shipment
    ShipmentAlreadyExists = 8002, CONFLICT, "Order already has an active shipment";
    ShipmentClosed = 8003, CONFLICT, "Shipment is already closed";
    InvalidShipmentStatus = 8004, BAD_REQUEST, "Shipment can only move to delivered or failed";

    // ── 9xxx system ────────────────────────────────────────────────
    InternalError = 9001, INTERNAL_SERVER_ERROR, "Internal server error";
    DatabaseError = 9002, INTERNAL_SERVER_ERROR, "Database error";
    ConfigError = 9003, INTERNAL_SERVER_ERROR, "Configuration error";
    /// A row referenced by a read model could not be loaded
    CompositionError = 9004, INTERNAL_SERVER_ERROR, "Failed to assemble response";
    TimeoutError = 9005, SERVICE_UNAVAILABLE, "Operation timed out";
    /// Write conflict that survived every retry
    StoreBusy = 9006, SERVICE_UNAVAILABLE, "Store is busy, retry later";
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_consistent() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
            assert!(!code.message().is_empty());
        }
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_order_workflow_statuses() {
        assert_eq!(ErrorCode::InsufficientStock.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NoFulfillmentWarehouse.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::OrderOwnershipMismatch.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::PaymentAlreadyConfirmed.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::StockAlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::OrderNotConfirmed.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ShipmentClosed.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::SessionExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::TimeoutError.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ErrorCode::CompositionError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_password_mismatch_is_a_client_error() {
        // Lives in the auth range but is a form problem, not a login failure
        assert_eq!(ErrorCode::PasswordMismatch.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&ErrorCode::OrderOwnershipMismatch).unwrap();
        assert_eq!(json, "2006");
        let code: ErrorCode = serde_json::from_str("3005").unwrap();
        assert_eq!(code, ErrorCode::NoFulfillmentWarehouse);
        assert!(serde_json::from_str::<ErrorCode>("6").is_err());
        assert_eq!(ErrorCode::StockNotFound.to_string(), "E3002");
    }
}
