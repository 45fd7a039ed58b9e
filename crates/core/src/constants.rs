/// Decimal precision used when rendering ratios and amounts for display/export
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// First id handed out to a trade in a fund
pub const FIRST_TRADE_ID: u64 = 1;

/// Canonical date format for persisted rows
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest accepted money amount (movement amounts, position values and fees)
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Largest accepted take-profit or stop-loss percentage, in either direction
pub const MAX_PERCENT: i64 = 1_000_000;
