use super::ledger_model::{EquityPoint, FundSummary, PartnerAttribution};
use crate::errors::Result;
use crate::identity::RequestContext;
use crate::trades::TradeFilter;

/// Read-only performance views over a fund.
pub trait LedgerServiceTrait: Send + Sync {
    /// Capital, realized P/L, equity and return of the fund. The filter only
    /// narrows the trades counted on the P/L side.
    fn get_fund_summary(
        &self,
        ctx: &RequestContext,
        fund: &str,
        filter: &TradeFilter,
    ) -> Result<FundSummary>;

    /// One row per partner with capital, participation and allocated P/L.
    fn get_partner_attribution(
        &self,
        ctx: &RequestContext,
        fund: &str,
    ) -> Result<Vec<PartnerAttribution>>;

    /// Equity after each closed trade, starting from the fund's net capital.
    /// Empty when no trade is closed.
    fn get_equity_curve(
        &self,
        ctx: &RequestContext,
        fund: &str,
        filter: &TradeFilter,
    ) -> Result<Vec<EquityPoint>>;

    /// Summary as delimited text.
    fn export_summary_csv(&self, ctx: &RequestContext, fund: &str) -> Result<String>;

    /// Partner table as delimited text.
    fn export_partners_csv(&self, ctx: &RequestContext, fund: &str) -> Result<String>;
}
