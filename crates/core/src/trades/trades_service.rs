use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::strategy_catalog::StrategyCatalog;
use super::trades_model::{
    validate_target_inputs, NewTrade, TradeFilter, TradeOutcome, TradeRecord, TradeTargets,
    TradeUpdate,
};
use super::trades_traits::{TradeRepositoryTrait, TradeServiceTrait};
use crate::errors::Result;
use crate::funds::FundServiceTrait;
use crate::identity::RequestContext;

/// Service for managing trade records
pub struct TradeService {
    repository: Arc<dyn TradeRepositoryTrait>,
    fund_service: Arc<dyn FundServiceTrait>,
    catalog: Arc<StrategyCatalog>,
}

impl TradeService {
    pub fn new(
        repository: Arc<dyn TradeRepositoryTrait>,
        fund_service: Arc<dyn FundServiceTrait>,
        catalog: Arc<StrategyCatalog>,
    ) -> Self {
        Self {
            repository,
            fund_service,
            catalog,
        }
    }
}

#[async_trait::async_trait]
impl TradeServiceTrait for TradeService {
    fn list_trades(
        &self,
        ctx: &RequestContext,
        fund: &str,
        filter: &TradeFilter,
    ) -> Result<Vec<TradeRecord>> {
        ctx.authorize_read(fund)?;
        let mut trades: Vec<TradeRecord> = self
            .repository
            .list(Some(fund))?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        trades.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(trades)
    }

    fn get_trade(&self, ctx: &RequestContext, fund: &str, id: u64) -> Result<TradeRecord> {
        ctx.authorize_read(fund)?;
        self.repository.get(fund, id)
    }

    async fn create_trade(
        &self,
        ctx: &RequestContext,
        mut new_trade: NewTrade,
    ) -> Result<TradeRecord> {
        ctx.authorize_write(&new_trade.fund)?;
        new_trade.validate()?;
        new_trade.strategy = self.catalog.resolve(&new_trade.strategy)?;
        self.fund_service.ensure_fund_exists(new_trade.fund.trim())?;
        debug!(
            "Recording {} trade on {} ({}) in fund '{}'",
            new_trade.strategy, new_trade.asset, new_trade.broker, new_trade.fund
        );
        self.repository.create(new_trade).await
    }

    async fn update_trade(
        &self,
        ctx: &RequestContext,
        fund: &str,
        id: u64,
        mut update: TradeUpdate,
    ) -> Result<TradeRecord> {
        ctx.authorize_write(fund)?;
        update.validate()?;
        update.strategy = self.catalog.resolve(&update.strategy)?;
        let mut record = self.repository.get(fund, id)?;
        record.apply_update(update)?;
        self.repository.update(record).await
    }

    async fn close_trade(
        &self,
        ctx: &RequestContext,
        fund: &str,
        id: u64,
        outcome: TradeOutcome,
    ) -> Result<TradeRecord> {
        ctx.authorize_write(fund)?;
        let mut record = self.repository.get(fund, id)?;
        record.close(outcome)?;
        debug!("Closing trade #{} of fund '{}' as {}", id, fund, outcome);
        self.repository.update(record).await
    }

    async fn delete_trade(&self, ctx: &RequestContext, fund: &str, id: u64) -> Result<()> {
        ctx.authorize_write(fund)?;
        self.repository.delete(fund, id).await?;
        Ok(())
    }

    fn preview_targets(
        &self,
        position_value: Decimal,
        take_profit_pct: Decimal,
        stop_loss_pct: Decimal,
        fee: Decimal,
    ) -> Result<TradeTargets> {
        validate_target_inputs(position_value, take_profit_pct, stop_loss_pct, fee)?;
        TradeTargets::compute(position_value, take_profit_pct, stop_loss_pct, fee)
    }

    fn strategies(&self) -> Vec<String> {
        self.catalog.entries().to_vec()
    }
}
