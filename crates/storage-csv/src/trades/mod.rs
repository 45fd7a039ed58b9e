//! CSV storage for trade records.

mod repository;

pub use repository::TradeRepository;
