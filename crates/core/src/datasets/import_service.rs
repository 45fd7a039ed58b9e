use log::{debug, info, warn};
use std::sync::Arc;

use super::csv_codec::{
    decode_funds, decode_movements, decode_trades, encode_funds, encode_movements, encode_trades,
};
use super::datasets_model::{Dataset, ImportSummary};
use super::import_traits::ImportServiceTrait;
use crate::errors::Result;
use crate::funds::FundRepositoryTrait;
use crate::identity::RequestContext;
use crate::movements::MovementRepositoryTrait;
use crate::trades::TradeRepositoryTrait;

/// Service for dataset upload and download
pub struct ImportService {
    movement_repository: Arc<dyn MovementRepositoryTrait>,
    trade_repository: Arc<dyn TradeRepositoryTrait>,
    fund_repository: Arc<dyn FundRepositoryTrait>,
}

impl ImportService {
    pub fn new(
        movement_repository: Arc<dyn MovementRepositoryTrait>,
        trade_repository: Arc<dyn TradeRepositoryTrait>,
        fund_repository: Arc<dyn FundRepositoryTrait>,
    ) -> Self {
        Self {
            movement_repository,
            trade_repository,
            fund_repository,
        }
    }

    async fn replace(&self, dataset: Dataset, content: &[u8]) -> Result<(usize, Vec<String>)> {
        match dataset {
            Dataset::Movements => {
                let decoded = decode_movements(content)?;
                let rows = self.movement_repository.replace_all(decoded.rows).await?;
                Ok((rows, decoded.defaulted_columns))
            }
            Dataset::Trades => {
                let decoded = decode_trades(content)?;
                let rows = self.trade_repository.replace_all(decoded.rows).await?;
                Ok((rows, decoded.defaulted_columns))
            }
            Dataset::Funds => {
                let decoded = decode_funds(content)?;
                let rows = self.fund_repository.replace_all(decoded.rows).await?;
                Ok((rows, decoded.defaulted_columns))
            }
        }
    }
}

#[async_trait::async_trait]
impl ImportServiceTrait for ImportService {
    async fn replace_dataset(
        &self,
        ctx: &RequestContext,
        dataset: Dataset,
        content: &[u8],
    ) -> Result<ImportSummary> {
        ctx.require_admin("replace datasets")?;
        debug!(
            "Replacing {} with {} uploaded bytes from {}",
            dataset,
            content.len(),
            ctx.username
        );

        let (rows, defaulted_columns) = self
            .replace(dataset, content)
            .await
            .inspect_err(|e| warn!("Upload of {} rejected: {}", dataset, e))?;

        info!("Replaced {} with {} rows", dataset, rows);
        Ok(ImportSummary {
            dataset,
            rows,
            defaulted_columns,
        })
    }

    fn export_dataset(&self, ctx: &RequestContext, dataset: Dataset) -> Result<Vec<u8>> {
        ctx.require_admin("download datasets")?;
        match dataset {
            Dataset::Movements => encode_movements(&self.movement_repository.list(None)?),
            Dataset::Trades => encode_trades(&self.trade_repository.list(None)?),
            Dataset::Funds => encode_funds(&self.fund_repository.list_registered()?),
        }
    }
}
