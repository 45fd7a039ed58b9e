//! Trade record domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::trades_errors::TradeError;
use crate::constants::{MAX_AMOUNT, MAX_PERCENT};
use crate::utils::decimal_utils::{ensure_within, out_of_range};
use crate::{errors::ValidationError, Error, Result};

/// Outcome of a trade.
///
/// `Open` is the initial state. The only legal moves are `Open -> Win` and
/// `Open -> Loss`; both closed states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradeOutcome {
    #[default]
    Open,
    Win,
    Loss,
}

impl TradeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeOutcome::Open => "Open",
            TradeOutcome::Win => "Win",
            TradeOutcome::Loss => "Loss",
        }
    }

    pub fn is_closed(&self) -> bool {
        !matches!(self, TradeOutcome::Open)
    }

    /// Validates a state change and returns the new state.
    pub fn transition(self, next: TradeOutcome) -> std::result::Result<TradeOutcome, TradeError> {
        match (self, next) {
            (TradeOutcome::Open, TradeOutcome::Win) | (TradeOutcome::Open, TradeOutcome::Loss) => {
                Ok(next)
            }
            (from, to) => Err(TradeError::InvalidTransition { from, to }),
        }
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeOutcome {
    type Err = ValidationError;

    /// Accepts the canonical labels plus the legacy Spanish ones.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "abierta" => Ok(TradeOutcome::Open),
            "win" | "ganadora" => Ok(TradeOutcome::Win),
            "loss" | "perdedora" => Ok(TradeOutcome::Loss),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown trade outcome '{}'",
                other
            ))),
        }
    }
}

/// Take-profit and stop-loss amounts derived from a position.
///
/// The fee is charged whatever the outcome: it is taken off a win and added to a loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeTargets {
    pub take_profit_amount: Decimal,
    pub stop_loss_amount: Decimal,
}

impl TradeTargets {
    /// Fails with `OutOfRange` rather than overflowing.
    pub fn compute(
        position_value: Decimal,
        take_profit_pct: Decimal,
        stop_loss_pct: Decimal,
        fee: Decimal,
    ) -> Result<Self> {
        let gross = |pct: Decimal| {
            position_value
                .checked_mul(pct)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        };
        let take_profit_amount = gross(take_profit_pct)
            .and_then(|v| v.checked_sub(fee))
            .ok_or_else(|| out_of_range("Take-profit amount".to_string()))?;
        let stop_loss_amount = gross(stop_loss_pct)
            .and_then(|v| v.checked_add(fee))
            .ok_or_else(|| out_of_range("Stop-loss amount".to_string()))?;
        Ok(Self {
            take_profit_amount,
            stop_loss_amount,
        })
    }
}

/// A journal entry for one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub id: u64,
    pub fund: String,
    pub date: NaiveDate,
    pub asset: String,
    pub strategy: String,
    pub broker: String,
    pub position_value: Decimal,
    pub take_profit_pct: Decimal,
    pub stop_loss_pct: Decimal,
    pub fee: Decimal,
    pub take_profit_amount: Decimal,
    pub stop_loss_amount: Decimal,
    pub outcome: TradeOutcome,
}

impl TradeRecord {
    /// Builds a record with freshly derived amounts.
    pub fn new(id: u64, new_trade: NewTrade) -> Result<Self> {
        let targets = TradeTargets::compute(
            new_trade.position_value,
            new_trade.take_profit_pct,
            new_trade.stop_loss_pct,
            new_trade.fee,
        )?;
        Ok(Self {
            id,
            fund: new_trade.fund.trim().to_string(),
            date: new_trade.date,
            asset: new_trade.asset.trim().to_string(),
            strategy: new_trade.strategy.trim().to_string(),
            broker: new_trade.broker.trim().to_string(),
            position_value: new_trade.position_value,
            take_profit_pct: new_trade.take_profit_pct,
            stop_loss_pct: new_trade.stop_loss_pct,
            fee: new_trade.fee,
            take_profit_amount: targets.take_profit_amount,
            stop_loss_amount: targets.stop_loss_amount,
            outcome: new_trade.outcome.unwrap_or_default(),
        })
    }

    /// Recomputes the derived amounts from the value fields.
    pub fn recompute_targets(&mut self) -> Result<()> {
        let targets = TradeTargets::compute(
            self.position_value,
            self.take_profit_pct,
            self.stop_loss_pct,
            self.fee,
        )?;
        self.take_profit_amount = targets.take_profit_amount;
        self.stop_loss_amount = targets.stop_loss_amount;
        Ok(())
    }

    /// Contribution of this trade to realized profit/loss.
    pub fn realized_pnl(&self) -> Decimal {
        match self.outcome {
            TradeOutcome::Open => Decimal::ZERO,
            TradeOutcome::Win => self.take_profit_amount,
            TradeOutcome::Loss => -self.stop_loss_amount,
        }
    }

    /// Replaces the value fields and recomputes derived amounts. Outcome is untouched.
    pub fn apply_update(&mut self, update: TradeUpdate) -> Result<()> {
        self.date = update.date;
        self.asset = update.asset.trim().to_string();
        self.strategy = update.strategy.trim().to_string();
        self.broker = update.broker.trim().to_string();
        self.position_value = update.position_value;
        self.take_profit_pct = update.take_profit_pct;
        self.stop_loss_pct = update.stop_loss_pct;
        self.fee = update.fee;
        self.recompute_targets()
    }

    /// Closes the trade. Only an open trade can be closed.
    pub fn close(&mut self, outcome: TradeOutcome) -> std::result::Result<(), TradeError> {
        self.outcome = self.outcome.transition(outcome)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_values(&self.fund, &self.asset)?;
        validate_target_inputs(
            self.position_value,
            self.take_profit_pct,
            self.stop_loss_pct,
            self.fee,
        )
    }
}

/// Input model for recording a trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub fund: String,
    pub date: NaiveDate,
    pub asset: String,
    pub strategy: String,
    pub broker: String,
    pub position_value: Decimal,
    pub take_profit_pct: Decimal,
    pub stop_loss_pct: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    /// Defaults to `Open`.
    #[serde(default)]
    pub outcome: Option<TradeOutcome>,
}

impl NewTrade {
    pub fn validate(&self) -> Result<()> {
        validate_values(&self.fund, &self.asset)?;
        validate_target_inputs(
            self.position_value,
            self.take_profit_pct,
            self.stop_loss_pct,
            self.fee,
        )
    }
}

/// Replacement of a trade's value fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeUpdate {
    pub date: NaiveDate,
    pub asset: String,
    pub strategy: String,
    pub broker: String,
    pub position_value: Decimal,
    pub take_profit_pct: Decimal,
    pub stop_loss_pct: Decimal,
    #[serde(default)]
    pub fee: Decimal,
}

impl TradeUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.asset.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "asset".to_string(),
            )));
        }
        validate_target_inputs(
            self.position_value,
            self.take_profit_pct,
            self.stop_loss_pct,
            self.fee,
        )
    }
}

/// Optional restrictions applied to trade listings and P/L views.
///
/// `None` means "no restriction"; a present but empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub brokers: Option<Vec<String>>,
    pub strategies: Option<Vec<String>>,
}

impl TradeFilter {
    pub fn is_empty(&self) -> bool {
        *self == TradeFilter::default()
    }

    /// Inclusive date range check plus broker/strategy membership.
    pub fn matches(&self, trade: &TradeRecord) -> bool {
        if self.from.is_some_and(|from| trade.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| trade.date > to) {
            return false;
        }
        if let Some(brokers) = &self.brokers {
            if !brokers.iter().any(|b| b == &trade.broker) {
                return false;
            }
        }
        if let Some(strategies) = &self.strategies {
            if !strategies.iter().any(|s| s == &trade.strategy) {
                return false;
            }
        }
        true
    }
}

fn validate_values(fund: &str, asset: &str) -> Result<()> {
    if fund.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "fund".to_string(),
        )));
    }
    if asset.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "asset".to_string(),
        )));
    }
    Ok(())
}

/// Sign and magnitude checks on the values the derived amounts are computed from.
pub fn validate_target_inputs(
    position_value: Decimal,
    take_profit_pct: Decimal,
    stop_loss_pct: Decimal,
    fee: Decimal,
) -> Result<()> {
    check_non_negative(position_value, "position_value")?;
    check_non_negative(fee, "fee")?;
    ensure_within(position_value, MAX_AMOUNT, "position_value")?;
    ensure_within(fee, MAX_AMOUNT, "fee")?;
    ensure_within(take_profit_pct, MAX_PERCENT, "take_profit_pct")?;
    ensure_within(stop_loss_pct, MAX_PERCENT, "stop_loss_pct")?;
    Ok(())
}

fn check_non_negative(value: Decimal, field: &str) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::NegativeAmount(
            field.to_string(),
        )));
    }
    Ok(())
}
