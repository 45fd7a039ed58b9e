//! Equity curve over closed trades.

use rust_decimal::Decimal;
use std::slice;

use super::ledger_model::EquityPoint;
use crate::errors::Result;
use crate::trades::TradeRecord;
use crate::utils::decimal_utils::checked_sum;

/// Running equity over a date-sorted slice of closed trades.
///
/// Nothing is accumulated up front: each call to [`EquityCurve::iter`] walks the
/// trades again from the opening capital, so the sequence can be replayed.
#[derive(Debug, Clone, Copy)]
pub struct EquityCurve<'a> {
    trades: &'a [TradeRecord],
    opening_capital: Decimal,
}

impl<'a> EquityCurve<'a> {
    /// `closed_sorted` must already be in ascending date order; same-date
    /// trades are taken in the order given.
    ///
    /// Fails when a running total could leave the decimal range. No partial
    /// sum can exceed the opening capital plus every step in absolute value,
    /// so iteration itself never overflows.
    pub fn new(closed_sorted: &'a [TradeRecord], opening_capital: Decimal) -> Result<Self> {
        checked_sum(
            std::iter::once(opening_capital.abs())
                .chain(closed_sorted.iter().map(|t| t.realized_pnl().abs())),
            "Equity curve",
        )?;
        Ok(Self {
            trades: closed_sorted,
            opening_capital,
        })
    }

    pub fn opening_capital(&self) -> Decimal {
        self.opening_capital
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// An empty curve means there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> EquityCurveIter<'a> {
        EquityCurveIter {
            trades: self.trades.iter(),
            running: self.opening_capital,
        }
    }

    /// Equity after the last trade, `None` for an empty curve.
    pub fn final_equity(&self) -> Option<Decimal> {
        self.iter().last().map(|p| p.equity)
    }
}

impl<'a> IntoIterator for &EquityCurve<'a> {
    type Item = EquityPoint;
    type IntoIter = EquityCurveIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by [`EquityCurve::iter`].
#[derive(Debug, Clone)]
pub struct EquityCurveIter<'a> {
    trades: slice::Iter<'a, TradeRecord>,
    running: Decimal,
}

impl Iterator for EquityCurveIter<'_> {
    type Item = EquityPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let trade = self.trades.next()?;
        self.running += trade.realized_pnl();
        Some(EquityPoint {
            date: trade.date,
            equity: self.running,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.trades.size_hint()
    }
}

impl ExactSizeIterator for EquityCurveIter<'_> {}
