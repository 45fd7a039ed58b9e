//! Trades module - trade journal entries, outcomes and strategies.

mod strategy_catalog;
mod trades_constants;
mod trades_errors;
mod trades_model;
mod trades_service;
mod trades_traits;



pub use strategy_catalog::{canonical_strategy, StrategyCatalog};
pub use trades_constants::*;
pub use trades_errors::TradeError;
pub use trades_model::{
    NewTrade, TradeFilter, TradeOutcome, TradeRecord, TradeTargets, TradeUpdate,
};
pub use trades_service::TradeService;
pub use trades_traits::{TradeRepositoryTrait, TradeServiceTrait};
