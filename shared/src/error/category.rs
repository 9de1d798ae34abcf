//! Error domains

use std::fmt;

use super::codes::ErrorCode;

/// Domain of an error code, taken from its thousands digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Inventory,
    Order,
    Payment,
    Product,
    Account,
    Shipment,
    System,
}

impl ErrorCategory {
    const BY_THOUSANDS: [ErrorCategory; 9] = [
        ErrorCategory::General,
        ErrorCategory::Auth,
        ErrorCategory::Permission,
        ErrorCategory::Inventory,
        ErrorCategory::Order,
        ErrorCategory::Payment,
        ErrorCategory::Product,
        ErrorCategory::Account,
        ErrorCategory::Shipment,
    ];

    pub fn of(code: u16) -> Self {
        Self::BY_THOUSANDS
            .get(usize::from(code / 1000))
            .copied()
            .unwrap_or(ErrorCategory::System)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::General => "general",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Permission => "permission",
            ErrorCategory::Inventory => "inventory",
            ErrorCategory::Order => "order",
            ErrorCategory::Payment => "payment",
            ErrorCategory::Product => "product",
            ErrorCategory::Account => "account",
            ErrorCategory::Shipment => "shipment",
            ErrorCategory::System => "system",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::of(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_digit_picks_the_domain() {
        assert_eq!(ErrorCode::ValueOutOfRange.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::SessionExpired.category(), ErrorCategory::Auth);
        assert_eq!(
            ErrorCode::NoFulfillmentWarehouse.category(),
            ErrorCategory::Inventory
        );
        assert_eq!(ErrorCode::OrderEmpty.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::EmailExists.category(), ErrorCategory::Account);
        assert_eq!(ErrorCode::ShipmentClosed.category(), ErrorCategory::Shipment);
        assert_eq!(ErrorCode::StoreBusy.category(), ErrorCategory::System);
        assert_eq!(ErrorCategory::of(9500), ErrorCategory::System);
        assert_eq!(ErrorCategory::of(u16::MAX), ErrorCategory::System);
    }

    #[test]
    fn test_system_codes_are_server_side() {
        for code in ErrorCode::ALL {
            if code.category() == ErrorCategory::System {
                assert!(code.http_status().is_server_error(), "{code}");
            }
        }
    }
}
