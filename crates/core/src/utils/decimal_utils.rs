use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::ValidationError;

/// Parses a decimal cell, accepting scientific notation as a fallback.
///
/// An empty cell is reported as a missing field.
pub fn parse_decimal(value: &str, field_name: &str) -> Result<Decimal, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field_name.to_string()));
    }
    match Decimal::from_str(trimmed) {
        Ok(d) => Ok(d),
        Err(e_decimal) => Decimal::from_scientific(trimmed).map_err(|e_scientific| {
            log::debug!(
                "Failed to parse {} '{}': as Decimal (err: {}), and as scientific (err: {})",
                field_name,
                trimmed,
                e_decimal,
                e_scientific
            );
            ValidationError::InvalidInput(format!("'{}' is not a number for {}", trimmed, field_name))
        }),
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Result<Decimal, ValidationError> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| out_of_range(format!("Ratio {} / {}", numerator, denominator)))
}

/// `numerator / denominator * 100`, or zero when the denominator is zero.
pub fn percent_or_zero(numerator: Decimal, denominator: Decimal) -> Result<Decimal, ValidationError> {
    ratio_or_zero(numerator, denominator)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| out_of_range(format!("Percentage {} / {}", numerator, denominator)))
}

/// Sums `values`, failing instead of overflowing.
pub fn checked_sum(
    values: impl IntoIterator<Item = Decimal>,
    what: &str,
) -> Result<Decimal, ValidationError> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| out_of_range(what.to_string()))
    })
}

/// Rejects values whose magnitude exceeds `limit`.
pub fn ensure_within(value: Decimal, limit: i64, field: &str) -> Result<(), ValidationError> {
    if value.abs() > Decimal::from(limit) {
        return Err(out_of_range(format!("Field '{}' ({})", field, value)));
    }
    Ok(())
}

pub fn out_of_range(what: String) -> ValidationError {
    ValidationError::OutOfRange(what)
}

/// Rounds for display and export.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// Renders a decimal without trailing zeros for persistence.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}
