//! Column layouts of the persisted tables and the upload subset rule.

use super::datasets_model::Dataset;
use crate::errors::ValidationError;

pub const MOVEMENTS_HEADER: [&str; 6] = ["fund", "partner", "external_id", "date", "kind", "amount"];

pub const TRADES_HEADER: [&str; 13] = [
    "id",
    "fund",
    "date",
    "asset",
    "strategy",
    "broker",
    "position_value",
    "take_profit_pct",
    "stop_loss_pct",
    "fee",
    "take_profit_amount",
    "stop_loss_amount",
    "outcome",
];

pub const FUNDS_HEADER: [&str; 1] = ["fund"];

/// Accepts `columns` only if every one of them belongs to the dataset's header.
///
/// Columns are compared after trimming. Returns the expected columns the
/// upload leaves out, which the decoder fills with defaults.
pub fn validate_columns(
    dataset: Dataset,
    columns: &[String],
) -> Result<Vec<String>, ValidationError> {
    let expected = dataset.header();
    let unexpected: Vec<String> = columns
        .iter()
        .map(|c| c.trim())
        .filter(|c| !expected.contains(c))
        .map(str::to_string)
        .collect();
    if !unexpected.is_empty() {
        return Err(ValidationError::SchemaMismatch {
            dataset,
            unexpected,
        });
    }
    Ok(expected
        .iter()
        .filter(|e| !columns.iter().any(|c| c.trim() == **e))
        .map(|e| e.to_string())
        .collect())
}
