//! CSV storage for the fund registry.

mod repository;

pub use repository::FundRepository;
