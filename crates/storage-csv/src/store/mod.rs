//! Tabular store backends and the serialized writer.

mod file_store;
mod memory_store;
mod write_actor;

pub use file_store::CsvFileStore;
pub use memory_store::MemoryStore;
pub use write_actor::{spawn_writer, WriteHandle};

use fundbook_core::datasets::Dataset;
use fundbook_core::Result;

/// Load/save contract of a tabular store.
///
/// Each dataset is one whole CSV snapshot. A save replaces the snapshot
/// completely or fails without touching the previous one.
pub trait TabularStoreTrait: Send + Sync {
    /// Current snapshot. A dataset that was never saved reads as its header row.
    fn load(&self, dataset: Dataset) -> Result<Vec<u8>>;

    fn save(&self, dataset: Dataset, content: &[u8]) -> Result<()>;
}

/// Header-only content of an empty dataset.
pub(crate) fn empty_snapshot(dataset: Dataset) -> Vec<u8> {
    let mut line = dataset.header().join(",");
    line.push('\n');
    line.into_bytes()
}
