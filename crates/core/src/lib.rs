//! Fundbook Core - Domain entities, services, and traits.
//!
//! This crate contains the fund ledger and trade journal logic for Fundbook.
//! It is storage-agnostic and defines traits that are implemented
//! by the `storage-csv` crate.

pub mod constants;
pub mod datasets;
pub mod errors;
pub mod funds;
pub mod identity;
pub mod ledger;
pub mod movements;
pub mod trades;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
