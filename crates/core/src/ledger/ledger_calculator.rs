//! Fund ledger and performance calculations.
//!
//! Everything here is a pure function over read snapshots: rows go in,
//! derived views come out, and source rows are never mutated.
//!
//! Division policy: any ratio whose denominator is exactly zero is zero.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::equity_curve::EquityCurve;
use super::ledger_model::{FundSummary, PartnerAttribution};
use crate::errors::Result;
use crate::movements::{CapitalMovement, MovementKind};
use crate::trades::{TradeFilter, TradeRecord};
use crate::utils::decimal_utils::{checked_sum, out_of_range, percent_or_zero, ratio_or_zero};

/// Sums of contributions and withdrawals for a fund.
fn capital_totals(movements: &[CapitalMovement], fund: &str) -> Result<(Decimal, Decimal)> {
    let in_fund = || movements.iter().filter(|m| m.fund == fund);
    let contributions = checked_sum(
        in_fund()
            .filter(|m| m.kind == MovementKind::Contribution)
            .map(|m| m.amount),
        "Total contributions",
    )?;
    let withdrawals = checked_sum(
        in_fund()
            .filter(|m| m.kind == MovementKind::Withdrawal)
            .map(|m| m.amount),
        "Total withdrawals",
    )?;
    Ok((contributions, withdrawals))
}

fn checked_net(contributions: Decimal, withdrawals: Decimal) -> Result<Decimal> {
    contributions
        .checked_sub(withdrawals)
        .ok_or_else(|| out_of_range("Net capital".to_string()).into())
}

/// Contributions minus withdrawals for `fund`. Zero for a fund with no rows.
pub fn net_capital(movements: &[CapitalMovement], fund: &str) -> Result<Decimal> {
    let (contributions, withdrawals) = capital_totals(movements, fund)?;
    checked_net(contributions, withdrawals)
}

/// Realized profit/loss of the fund's closed trades matching `filter`.
///
/// Wins add their take-profit amount, losses subtract their stop-loss amount;
/// open trades contribute nothing.
pub fn realized_pnl(trades: &[TradeRecord], fund: &str, filter: &TradeFilter) -> Result<Decimal> {
    Ok(checked_sum(
        closed_in_scope(trades, fund, filter).map(TradeRecord::realized_pnl),
        "Realized P/L",
    )?)
}

fn closed_in_scope<'a>(
    trades: &'a [TradeRecord],
    fund: &'a str,
    filter: &'a TradeFilter,
) -> impl Iterator<Item = &'a TradeRecord> + 'a {
    trades
        .iter()
        .filter(move |t| t.fund == fund && t.outcome.is_closed() && filter.matches(t))
}

/// Closed trades of the fund, ascending by date. Same-date trades keep their
/// insertion order (the sort is stable).
pub fn closed_trades(trades: &[TradeRecord], fund: &str, filter: &TradeFilter) -> Vec<TradeRecord> {
    let mut closed: Vec<TradeRecord> = closed_in_scope(trades, fund, filter).cloned().collect();
    closed.sort_by_key(|t| t.date);
    closed
}

/// Equity curve starting from `opening_capital` over date-sorted closed trades.
pub fn equity_curve(
    closed_sorted: &[TradeRecord],
    opening_capital: Decimal,
) -> Result<EquityCurve<'_>> {
    EquityCurve::new(closed_sorted, opening_capital)
}

/// Fund summary over every trade of the fund.
pub fn fund_summary(
    movements: &[CapitalMovement],
    trades: &[TradeRecord],
    fund: &str,
) -> Result<FundSummary> {
    fund_summary_filtered(movements, trades, fund, &TradeFilter::default())
}

/// Fund summary where the P/L side only considers trades matching `filter`.
/// Capital figures always cover every movement of the fund.
pub fn fund_summary_filtered(
    movements: &[CapitalMovement],
    trades: &[TradeRecord],
    fund: &str,
    filter: &TradeFilter,
) -> Result<FundSummary> {
    let (contributions, withdrawals) = capital_totals(movements, fund)?;
    let net_capital = checked_net(contributions, withdrawals)?;
    let realized_pnl = realized_pnl(trades, fund, filter)?;
    let total_equity = net_capital
        .checked_add(realized_pnl)
        .ok_or_else(|| out_of_range("Total equity".to_string()))?;

    let (open_trades, closed_trades) = trades
        .iter()
        .filter(|t| t.fund == fund && filter.matches(t))
        .fold((0usize, 0usize), |(open, closed), t| {
            if t.outcome.is_closed() {
                (open, closed + 1)
            } else {
                (open + 1, closed)
            }
        });

    Ok(FundSummary {
        fund: fund.to_string(),
        contributions,
        withdrawals,
        net_capital,
        realized_pnl,
        total_equity,
        return_pct: percent_or_zero(realized_pnl, net_capital)?,
        open_trades,
        closed_trades,
    })
}

/// Per-partner attribution of the fund's realized P/L.
///
/// P/L is allocated in proportion to each partner's current net capital,
/// regardless of when the capital was contributed. Partners are listed in
/// order of first appearance.
pub fn partner_attribution(
    movements: &[CapitalMovement],
    trades: &[TradeRecord],
    fund: &str,
) -> Result<Vec<PartnerAttribution>> {
    let mut order: Vec<String> = Vec::new();
    let mut balances: HashMap<&str, Decimal> = HashMap::new();

    for m in movements.iter().filter(|m| m.fund == fund) {
        let balance = balances.entry(m.partner.as_str()).or_insert_with(|| {
            order.push(m.partner.clone());
            Decimal::ZERO
        });
        *balance = balance
            .checked_add(m.signed_amount())
            .ok_or_else(|| out_of_range(format!("Net capital of partner '{}'", m.partner)))?;
    }

    let total_net = checked_sum(balances.values().copied(), "Net capital")?;
    let fund_pnl = realized_pnl(trades, fund, &TradeFilter::default())?;

    order
        .into_iter()
        .map(|partner| -> Result<PartnerAttribution> {
            let net_capital = balances
                .get(partner.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            let share = ratio_or_zero(net_capital, total_net)?;
            let overflow = || out_of_range(format!("Attribution of partner '{}'", partner));
            let allocated_pnl = share.checked_mul(fund_pnl).ok_or_else(overflow)?;
            Ok(PartnerAttribution {
                participation_pct: share
                    .checked_mul(Decimal::ONE_HUNDRED)
                    .ok_or_else(overflow)?,
                return_pct: percent_or_zero(allocated_pnl, net_capital)?,
                total: net_capital.checked_add(allocated_pnl).ok_or_else(overflow)?,
                net_capital,
                participation_share: share,
                allocated_pnl,
                partner,
            })
        })
        .collect()
}
