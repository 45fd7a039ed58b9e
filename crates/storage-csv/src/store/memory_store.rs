use std::collections::HashMap;
use std::sync::RwLock;

use super::{empty_snapshot, TabularStoreTrait};
use crate::errors::StorageError;
use fundbook_core::datasets::Dataset;
use fundbook_core::Result;

/// Volatile store used for demos and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Dataset, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabularStoreTrait for MemoryStore {
    fn load(&self, dataset: Dataset) -> Result<Vec<u8>> {
        let tables = self.tables.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(tables
            .get(&dataset)
            .cloned()
            .unwrap_or_else(|| empty_snapshot(dataset)))
    }

    fn save(&self, dataset: Dataset, content: &[u8]) -> Result<()> {
        let mut tables = self.tables.write().map_err(|_| StorageError::LockPoisoned)?;
        tables.insert(dataset, content.to_vec());
        Ok(())
    }
}
