//! In-memory repositories and fixtures shared by the service tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use crate::constants::FIRST_TRADE_ID;
use crate::errors::{Error, Result};
use crate::funds::{FundRepositoryTrait, FundService};
use crate::identity::{RequestContext, Role, UserIdentity};
use crate::movements::{CapitalMovement, MovementKind, MovementRepositoryTrait, MovementUpdate};
use crate::trades::{
    NewTrade, TradeError, TradeOutcome, TradeRecord, TradeRepositoryTrait,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn admin() -> RequestContext {
    context(Role::Admin, "Alpha")
}

pub fn reader(fund: &str) -> RequestContext {
    context(Role::ReadOnly, fund)
}

fn context(role: Role, fund: &str) -> RequestContext {
    RequestContext::from_identity(UserIdentity {
        username: "tester".to_string(),
        role,
        assigned_fund: fund.to_string(),
    })
}

pub fn movement(
    fund: &str,
    partner: &str,
    kind: MovementKind,
    amount: Decimal,
    on: NaiveDate,
) -> CapitalMovement {
    CapitalMovement {
        fund: fund.to_string(),
        partner: partner.to_string(),
        external_id: None,
        date: on,
        kind,
        amount,
    }
}

pub fn new_trade(fund: &str, position_value: Decimal, tp: Decimal, sl: Decimal) -> NewTrade {
    NewTrade {
        fund: fund.to_string(),
        date: date(2024, 1, 10),
        asset: "BTC".to_string(),
        strategy: "spot".to_string(),
        broker: "Binance".to_string(),
        position_value,
        take_profit_pct: tp,
        stop_loss_pct: sl,
        fee: Decimal::ZERO,
        outcome: None,
    }
}

/// A stored trade with derived amounts computed and the given outcome.
pub fn trade(
    id: u64,
    fund: &str,
    on: NaiveDate,
    position_value: Decimal,
    tp: Decimal,
    sl: Decimal,
    outcome: TradeOutcome,
) -> TradeRecord {
    let mut input = new_trade(fund, position_value, tp, sl);
    input.date = on;
    input.outcome = Some(outcome);
    TradeRecord::new(id, input).expect("fixture trade is within range")
}

#[derive(Clone, Default)]
pub struct MockMovementRepository {
    rows: Arc<Mutex<Vec<CapitalMovement>>>,
}

impl MockMovementRepository {
    pub fn with_rows(rows: Vec<CapitalMovement>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    pub fn snapshot(&self) -> Vec<CapitalMovement> {
        self.rows.lock().unwrap().clone()
    }

    /// Position in the whole dataset of the `index`-th row of `fund`.
    fn locate(rows: &[CapitalMovement], fund: &str, index: usize) -> Result<usize> {
        rows.iter()
            .enumerate()
            .filter(|(_, m)| m.fund == fund)
            .nth(index)
            .map(|(pos, _)| pos)
            .ok_or_else(|| Error::NotFound(format!("Movement #{} of fund '{}'", index, fund)))
    }
}

#[async_trait]
impl MovementRepositoryTrait for MockMovementRepository {
    fn list(&self, fund: Option<&str>) -> Result<Vec<CapitalMovement>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| fund.is_none_or(|f| m.fund == f))
            .cloned()
            .collect())
    }

    async fn create(&self, movement: CapitalMovement) -> Result<CapitalMovement> {
        self.rows.lock().unwrap().push(movement.clone());
        Ok(movement)
    }

    async fn update(
        &self,
        fund: &str,
        index: usize,
        update: MovementUpdate,
    ) -> Result<CapitalMovement> {
        let mut rows = self.rows.lock().unwrap();
        let pos = Self::locate(&rows, fund, index)?;
        update.apply_to(&mut rows[pos]);
        Ok(rows[pos].clone())
    }

    async fn delete(&self, fund: &str, index: usize) -> Result<CapitalMovement> {
        let mut rows = self.rows.lock().unwrap();
        let pos = Self::locate(&rows, fund, index)?;
        Ok(rows.remove(pos))
    }

    async fn replace_all(&self, movements: Vec<CapitalMovement>) -> Result<usize> {
        let count = movements.len();
        *self.rows.lock().unwrap() = movements;
        Ok(count)
    }
}

#[derive(Clone, Default)]
pub struct MockTradeRepository {
    rows: Arc<Mutex<Vec<TradeRecord>>>,
}

impl MockTradeRepository {
    pub fn with_rows(rows: Vec<TradeRecord>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    pub fn snapshot(&self) -> Vec<TradeRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl TradeRepositoryTrait for MockTradeRepository {
    fn list(&self, fund: Option<&str>) -> Result<Vec<TradeRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| fund.is_none_or(|f| t.fund == f))
            .cloned()
            .collect())
    }

    fn get(&self, fund: &str, id: u64) -> Result<TradeRecord> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.fund == fund && t.id == id)
            .cloned()
            .ok_or_else(|| {
                TradeError::NotFound {
                    fund: fund.to_string(),
                    id,
                }
                .into()
            })
    }

    async fn create(&self, new_trade: NewTrade) -> Result<TradeRecord> {
        let mut rows = self.rows.lock().unwrap();
        let fund = new_trade.fund.trim();
        let id = rows
            .iter()
            .filter(|t| t.fund == fund)
            .map(|t| t.id + 1)
            .max()
            .unwrap_or(FIRST_TRADE_ID);
        let record = TradeRecord::new(id, new_trade)?;
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: TradeRecord) -> Result<TradeRecord> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|t| t.fund == record.fund && t.id == record.id)
            .ok_or_else(|| TradeError::NotFound {
                fund: record.fund.clone(),
                id: record.id,
            })?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, fund: &str, id: u64) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| !(t.fund == fund && t.id == id));
        match before - rows.len() {
            0 => Err(TradeError::NotFound {
                fund: fund.to_string(),
                id,
            }
            .into()),
            n => Ok(n),
        }
    }

    async fn replace_all(&self, trades: Vec<TradeRecord>) -> Result<usize> {
        let count = trades.len();
        *self.rows.lock().unwrap() = trades;
        Ok(count)
    }
}

#[derive(Clone, Default)]
pub struct MockFundRepository {
    names: Arc<Mutex<Vec<String>>>,
}

impl MockFundRepository {
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            names: Arc::new(Mutex::new(names.iter().map(|n| n.to_string()).collect())),
        }
    }
}

#[async_trait]
impl FundRepositoryTrait for MockFundRepository {
    fn list_registered(&self) -> Result<Vec<String>> {
        Ok(self.names.lock().unwrap().clone())
    }

    async fn register(&self, name: &str) -> Result<()> {
        let mut names = self.names.lock().unwrap();
        if names.iter().any(|n| n == name) {
            return Err(Error::ConstraintViolation(format!(
                "Fund '{}' already exists",
                name
            )));
        }
        names.push(name.to_string());
        Ok(())
    }

    async fn replace_all(&self, names: Vec<String>) -> Result<usize> {
        let count = names.len();
        *self.names.lock().unwrap() = names;
        Ok(count)
    }
}

/// Repositories plus a fund service wired over them.
pub struct Fixture {
    pub funds: MockFundRepository,
    pub movements: MockMovementRepository,
    pub trades: MockTradeRepository,
    pub fund_service: Arc<FundService>,
}

impl Fixture {
    pub fn new(funds: &[&str]) -> Self {
        let funds = MockFundRepository::with_names(funds);
        let movements = MockMovementRepository::default();
        let trades = MockTradeRepository::default();
        let fund_service = Arc::new(FundService::new(
            Arc::new(funds.clone()),
            Arc::new(movements.clone()),
            Arc::new(trades.clone()),
        ));
        Self {
            funds,
            movements,
            trades,
            fund_service,
        }
    }
}

pub fn contribution(fund: &str, partner: &str, amount: Decimal) -> CapitalMovement {
    movement(fund, partner, MovementKind::Contribution, amount, date(2024, 1, 1))
}
