use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::errors::IntoCore;
use crate::store::{TabularStoreTrait, WriteHandle};
use fundbook_core::constants::FIRST_TRADE_ID;
use fundbook_core::datasets::csv_codec::{decode_trades, encode_trades};
use fundbook_core::datasets::Dataset;
use fundbook_core::trades::{NewTrade, TradeError, TradeRecord, TradeRepositoryTrait};
use fundbook_core::{Error, Result};

pub struct TradeRepository {
    store: Arc<dyn TabularStoreTrait>,
    writer: WriteHandle,
}

impl TradeRepository {
    pub fn new(store: Arc<dyn TabularStoreTrait>, writer: WriteHandle) -> Self {
        TradeRepository { store, writer }
    }
}

fn load_all(store: &dyn TabularStoreTrait) -> Result<Vec<TradeRecord>> {
    let content = store.load(Dataset::Trades)?;
    Ok(decode_trades(&content).into_core(Dataset::Trades)?.rows)
}

fn save_all(store: &dyn TabularStoreTrait, rows: &[TradeRecord]) -> Result<()> {
    store.save(Dataset::Trades, &encode_trades(rows)?)
}

fn next_id(rows: &[TradeRecord], fund: &str) -> Result<u64> {
    match rows.iter().filter(|t| t.fund == fund).map(|t| t.id).max() {
        None => Ok(FIRST_TRADE_ID),
        Some(last) => last.checked_add(1).ok_or_else(|| {
            Error::ConstraintViolation(format!("Fund '{}' has no trade ids left", fund))
        }),
    }
}

fn not_found(fund: &str, id: u64) -> TradeError {
    TradeError::NotFound {
        fund: fund.to_string(),
        id,
    }
}

#[async_trait]
impl TradeRepositoryTrait for TradeRepository {
    fn list(&self, fund: Option<&str>) -> Result<Vec<TradeRecord>> {
        let mut rows = load_all(self.store.as_ref())?;
        if let Some(fund) = fund {
            rows.retain(|t| t.fund == fund);
        }
        Ok(rows)
    }

    fn get(&self, fund: &str, id: u64) -> Result<TradeRecord> {
        load_all(self.store.as_ref())?
            .into_iter()
            .find(|t| t.fund == fund && t.id == id)
            .ok_or_else(|| not_found(fund, id).into())
    }

    async fn create(&self, new_trade: NewTrade) -> Result<TradeRecord> {
        self.writer
            .exec(move |store| -> Result<TradeRecord> {
                let mut rows = load_all(store)?;
                let id = next_id(&rows, new_trade.fund.trim())?;
                let record = TradeRecord::new(id, new_trade)?;
                rows.push(record.clone());
                save_all(store, &rows)?;
                Ok(record)
            })
            .await
    }

    async fn update(&self, record: TradeRecord) -> Result<TradeRecord> {
        self.writer
            .exec(move |store| -> Result<TradeRecord> {
                let mut rows = load_all(store)?;
                let slot = rows
                    .iter_mut()
                    .find(|t| t.fund == record.fund && t.id == record.id)
                    .ok_or_else(|| not_found(&record.fund, record.id))?;
                *slot = record.clone();
                save_all(store, &rows)?;
                Ok(record)
            })
            .await
    }

    async fn delete(&self, fund: &str, id: u64) -> Result<usize> {
        let fund = fund.to_string();
        self.writer
            .exec(move |store| -> Result<usize> {
                let mut rows = load_all(store)?;
                let before = rows.len();
                rows.retain(|t| !(t.fund == fund && t.id == id));
                let deleted = before - rows.len();
                if deleted == 0 {
                    return Err(not_found(&fund, id).into());
                }
                save_all(store, &rows)?;
                Ok(deleted)
            })
            .await
    }

    async fn replace_all(&self, trades: Vec<TradeRecord>) -> Result<usize> {
        self.writer
            .exec(move |store| -> Result<usize> {
                save_all(store, &trades)?;
                info!("Stored {} trades", trades.len());
                Ok(trades.len())
            })
            .await
    }
}
