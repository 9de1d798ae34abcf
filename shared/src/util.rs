/// Format a money amount the way receipts and logs show it (`RM 12.50`).
pub fn format_ringgit(amount: rust_decimal::Decimal) -> String {
    format!("RM {:.2}", amount.round_dp(2))
}
