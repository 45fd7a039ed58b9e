//! Trade repository and service traits.

use async_trait::async_trait;

use super::trades_model::{NewTrade, TradeFilter, TradeOutcome, TradeRecord, TradeTargets, TradeUpdate};
use crate::errors::Result;
use crate::identity::RequestContext;
use rust_decimal::Decimal;

/// Persistence contract for trade records. Ids are unique within a fund.
#[async_trait]
pub trait TradeRepositoryTrait: Send + Sync {
    /// Snapshot of all trades, optionally restricted to one fund, in insertion order.
    fn list(&self, fund: Option<&str>) -> Result<Vec<TradeRecord>>;

    /// Retrieves a trade by fund and id.
    fn get(&self, fund: &str, id: u64) -> Result<TradeRecord>;

    /// Appends a trade, assigning the next id of its fund.
    async fn create(&self, new_trade: NewTrade) -> Result<TradeRecord>;

    /// Replaces the stored record with the same `(fund, id)`.
    async fn update(&self, record: TradeRecord) -> Result<TradeRecord>;

    /// Deletes a trade. Returns the number of deleted rows.
    async fn delete(&self, fund: &str, id: u64) -> Result<usize>;

    /// Replaces the whole dataset. Returns the number of rows stored.
    async fn replace_all(&self, trades: Vec<TradeRecord>) -> Result<usize>;
}

/// Business operations on trades.
#[async_trait]
pub trait TradeServiceTrait: Send + Sync {
    /// Fund trades matching the filter, newest first.
    fn list_trades(
        &self,
        ctx: &RequestContext,
        fund: &str,
        filter: &TradeFilter,
    ) -> Result<Vec<TradeRecord>>;

    fn get_trade(&self, ctx: &RequestContext, fund: &str, id: u64) -> Result<TradeRecord>;

    async fn create_trade(&self, ctx: &RequestContext, new_trade: NewTrade) -> Result<TradeRecord>;

    /// Replaces value fields; derived amounts are recomputed, outcome kept.
    async fn update_trade(
        &self,
        ctx: &RequestContext,
        fund: &str,
        id: u64,
        update: TradeUpdate,
    ) -> Result<TradeRecord>;

    /// Moves an open trade to `Win` or `Loss`.
    async fn close_trade(
        &self,
        ctx: &RequestContext,
        fund: &str,
        id: u64,
        outcome: TradeOutcome,
    ) -> Result<TradeRecord>;

    async fn delete_trade(&self, ctx: &RequestContext, fund: &str, id: u64) -> Result<()>;

    /// Estimated take-profit / stop-loss amounts for a prospective position.
    fn preview_targets(
        &self,
        position_value: Decimal,
        take_profit_pct: Decimal,
        stop_loss_pct: Decimal,
        fee: Decimal,
    ) -> Result<TradeTargets>;

    /// Strategies accepted on entry.
    fn strategies(&self) -> Vec<String>;
}
