//! Flat-file storage implementation for Fundbook.
//!
//! This crate implements the repository traits defined in `fundbook-core` on
//! top of a tabular store that keeps each dataset as one CSV snapshot:
//! - `CsvFileStore`: `movements.csv`, `trades.csv` and `funds.csv` under a data directory
//! - `MemoryStore`: the same snapshots held in memory
//! - a writer actor that serializes every read-modify-write cycle
//!
//! # Architecture
//!
//! ```text
//!        core (domain, codec)
//!               │
//!               ▼
//!      storage-csv (this crate)
//!               │
//!        ┌──────┴──────┐
//!        ▼             ▼
//!   CSV files       memory
//! ```

pub mod errors;
pub mod store;

// Repository implementations
pub mod funds;
pub mod movements;
pub mod trades;

pub use errors::{IntoCore, StorageError};
pub use store::{spawn_writer, CsvFileStore, MemoryStore, TabularStoreTrait, WriteHandle};

// Re-export from fundbook-core for convenience
pub use fundbook_core::errors::{Error, Result, StoreError};
