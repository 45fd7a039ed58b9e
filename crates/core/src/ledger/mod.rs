//! Ledger module - fund capital, realized P/L, partner attribution and equity curve.

mod equity_curve;
pub mod export;
mod ledger_calculator;
mod ledger_model;
mod ledger_service;
mod ledger_traits;



pub use equity_curve::{EquityCurve, EquityCurveIter};
pub use ledger_calculator::{
    closed_trades, equity_curve, fund_summary, fund_summary_filtered, net_capital,
    partner_attribution, realized_pnl,
};
pub use ledger_model::{EquityPoint, FundSummary, PartnerAttribution};
pub use ledger_service::LedgerService;
pub use ledger_traits::LedgerServiceTrait;
