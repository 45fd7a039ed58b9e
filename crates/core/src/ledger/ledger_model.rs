use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fund-level performance figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSummary {
    pub fund: String,
    pub contributions: Decimal,
    pub withdrawals: Decimal,
    /// Contributions minus withdrawals.
    pub net_capital: Decimal,
    /// P/L of closed trades only.
    pub realized_pnl: Decimal,
    /// `net_capital + realized_pnl`
    pub total_equity: Decimal,
    /// `realized_pnl / net_capital * 100`, zero when there is no net capital.
    pub return_pct: Decimal,
    pub open_trades: usize,
    pub closed_trades: usize,
}

/// One partner's share of a fund's capital and result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerAttribution {
    pub partner: String,
    pub net_capital: Decimal,
    /// Fraction of the fund's net capital, in `[0, 1]` for ordinary funds.
    pub participation_share: Decimal,
    pub participation_pct: Decimal,
    pub allocated_pnl: Decimal,
    /// `net_capital + allocated_pnl`
    pub total: Decimal,
    pub return_pct: Decimal,
}

/// A point of the equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: Decimal,
}
