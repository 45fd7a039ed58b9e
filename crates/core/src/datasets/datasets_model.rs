//! Dataset identifiers and import results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::schema::{FUNDS_HEADER, MOVEMENTS_HEADER, TRADES_HEADER};
use crate::errors::ValidationError;

/// The persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Movements,
    Trades,
    Funds,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Movements, Dataset::Trades, Dataset::Funds];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Movements => "movements",
            Dataset::Trades => "trades",
            Dataset::Funds => "funds",
        }
    }

    /// Expected columns, in persisted order.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Dataset::Movements => &MOVEMENTS_HEADER,
            Dataset::Trades => &TRADES_HEADER,
            Dataset::Funds => &FUNDS_HEADER,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::Movements => "movements.csv",
            Dataset::Trades => "trades.csv",
            Dataset::Funds => "funds.csv",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_end_matches(".csv").to_ascii_lowercase();
        Dataset::ALL
            .into_iter()
            .find(|d| d.as_str() == name)
            .ok_or_else(|| ValidationError::InvalidInput(format!("Unknown dataset '{}'", s)))
    }
}

/// Outcome of a successful wholesale replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub dataset: Dataset,
    pub rows: usize,
    /// Expected columns absent from the upload that were filled with defaults.
    pub defaulted_columns: Vec<String>,
}
