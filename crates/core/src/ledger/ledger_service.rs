use log::debug;
use std::sync::Arc;

use super::export::{partners_to_csv, summary_to_csv};
use super::ledger_calculator::{
    closed_trades, equity_curve, fund_summary, fund_summary_filtered, net_capital,
    partner_attribution,
};
use super::ledger_model::{EquityPoint, FundSummary, PartnerAttribution};
use super::ledger_traits::LedgerServiceTrait;
use crate::errors::Result;
use crate::identity::RequestContext;
use crate::movements::MovementRepositoryTrait;
use crate::trades::{TradeFilter, TradeRepositoryTrait};

/// Loads fresh snapshots and hands them to the calculator.
pub struct LedgerService {
    movement_repository: Arc<dyn MovementRepositoryTrait>,
    trade_repository: Arc<dyn TradeRepositoryTrait>,
}

impl LedgerService {
    pub fn new(
        movement_repository: Arc<dyn MovementRepositoryTrait>,
        trade_repository: Arc<dyn TradeRepositoryTrait>,
    ) -> Self {
        Self {
            movement_repository,
            trade_repository,
        }
    }
}

impl LedgerServiceTrait for LedgerService {
    fn get_fund_summary(
        &self,
        ctx: &RequestContext,
        fund: &str,
        filter: &TradeFilter,
    ) -> Result<FundSummary> {
        ctx.authorize_read(fund)?;
        let movements = self.movement_repository.list(Some(fund))?;
        let trades = self.trade_repository.list(Some(fund))?;
        debug!(
            "Summarising fund '{}' over {} movements and {} trades",
            fund,
            movements.len(),
            trades.len()
        );
        fund_summary_filtered(&movements, &trades, fund, filter)
    }

    fn get_partner_attribution(
        &self,
        ctx: &RequestContext,
        fund: &str,
    ) -> Result<Vec<PartnerAttribution>> {
        ctx.authorize_read(fund)?;
        let movements = self.movement_repository.list(Some(fund))?;
        let trades = self.trade_repository.list(Some(fund))?;
        partner_attribution(&movements, &trades, fund)
    }

    fn get_equity_curve(
        &self,
        ctx: &RequestContext,
        fund: &str,
        filter: &TradeFilter,
    ) -> Result<Vec<EquityPoint>> {
        ctx.authorize_read(fund)?;
        let movements = self.movement_repository.list(Some(fund))?;
        let trades = self.trade_repository.list(Some(fund))?;
        let closed = closed_trades(&trades, fund, filter);
        let opening = net_capital(&movements, fund)?;
        Ok(equity_curve(&closed, opening)?.iter().collect())
    }

    fn export_summary_csv(&self, ctx: &RequestContext, fund: &str) -> Result<String> {
        ctx.authorize_read(fund)?;
        let movements = self.movement_repository.list(Some(fund))?;
        let trades = self.trade_repository.list(Some(fund))?;
        summary_to_csv(&fund_summary(&movements, &trades, fund)?)
    }

    fn export_partners_csv(&self, ctx: &RequestContext, fund: &str) -> Result<String> {
        let rows = self.get_partner_attribution(ctx, fund)?;
        partners_to_csv(&rows)
    }
}
