use thiserror::Error;

use super::trades_model::TradeOutcome;

/// Errors specific to trade records.
#[derive(Error, Debug, PartialEq)]
pub enum TradeError {
    #[error("Cannot move a trade from {from} to {to}")]
    InvalidTransition { from: TradeOutcome, to: TradeOutcome },

    #[error("Unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("Trade #{id} not found in fund '{fund}'")]
    NotFound { fund: String, id: u64 },
}
