//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! handlers before anything reaches a service.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: warehouse, category, product, customer, supplier
pub const MAX_NAME_LEN: usize = 200;

/// Product descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Phone numbers, usernames
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Street / delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Largest quantity a single order line or stock row may carry
pub const MAX_QUANTITY: i32 = 1_000_000;

/// Largest price or delivery fee, in whole ringgit
pub const MAX_MONEY: i64 = 1_000_000_000;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::validation("email is not a valid address").with_detail("field", "email")),
    }
}

pub fn validate_password(value: &str) -> Result<(), AppError> {
    if value.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    validate_required_text(value, "password", MAX_PASSWORD_LEN)
}

// ── Numbers ─────────────────────────────────────────────────────────

fn out_of_range(field: &str, msg: String) -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, msg).with_detail("field", field)
}

/// Quantity of an order line: 1..=MAX_QUANTITY
pub fn validate_quantity(value: i32, field: &str) -> Result<(), AppError> {
    if !(1..=MAX_QUANTITY).contains(&value) {
        return Err(out_of_range(
            field,
            format!("{field} must be between 1 and {MAX_QUANTITY}"),
        ));
    }
    Ok(())
}

/// Quantity on hand: 0..=MAX_QUANTITY
pub fn validate_stock_level(value: i32) -> Result<(), AppError> {
    if !(0..=MAX_QUANTITY).contains(&value) {
        return Err(out_of_range(
            "stock",
            format!("stock must be between 0 and {MAX_QUANTITY}"),
        ));
    }
    Ok(())
}

pub fn validate_money(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() {
        return Err(out_of_range(field, format!("{field} must not be negative")));
    }
    if value > Decimal::from(MAX_MONEY) {
        return Err(out_of_range(
            field,
            format!("{field} must not exceed {MAX_MONEY}"),
        ));
    }
    if value.scale() > 2 {
        return Err(AppError::validation(format!(
            "{field} must have at most 2 decimal places"
        )));
    }
    Ok(())
}

pub fn validate_coordinate(latitude: Decimal, longitude: Decimal) -> Result<(), AppError> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err(out_of_range("latitude", "latitude must be within ±90".into()));
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err(out_of_range(
            "longitude",
            "longitude must be within ±180".into(),
        ));
    }
    Ok(())
}
