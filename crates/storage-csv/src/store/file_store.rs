use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{empty_snapshot, TabularStoreTrait};
use crate::errors::StorageError;
use fundbook_core::datasets::Dataset;
use fundbook_core::Result;

/// One CSV file per dataset under a data directory.
#[derive(Debug, Clone)]
pub struct CsvFileStore {
    root: PathBuf,
}

impl CsvFileStore {
    /// Opens the store, creating the directory and any missing dataset file
    /// with its header row.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(StorageError::InitFailed)?;
        let store = Self { root };
        for dataset in Dataset::ALL {
            let path = store.path_for(dataset);
            if !path.exists() {
                info!("Creating {}", path.display());
                store.write_atomically(dataset, &empty_snapshot(dataset))?;
            }
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.root.join(dataset.file_name())
    }

    /// Writes to a temporary file in the same directory, then renames it over
    /// the target.
    fn write_atomically(&self, dataset: Dataset, content: &[u8]) -> Result<()> {
        let to_write_error = |source| StorageError::WriteFailed { dataset, source };
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(to_write_error)?;
        tmp.write_all(content).map_err(to_write_error)?;
        tmp.as_file().sync_all().map_err(to_write_error)?;
        tmp.persist(self.path_for(dataset))
            .map_err(|e| to_write_error(e.error))?;
        Ok(())
    }
}

impl TabularStoreTrait for CsvFileStore {
    fn load(&self, dataset: Dataset) -> Result<Vec<u8>> {
        let path = self.path_for(dataset);
        if !path.exists() {
            return Ok(empty_snapshot(dataset));
        }
        let content =
            fs::read(&path).map_err(|source| StorageError::ReadFailed { dataset, source })?;
        if content.is_empty() {
            return Ok(empty_snapshot(dataset));
        }
        Ok(content)
    }

    fn save(&self, dataset: Dataset, content: &[u8]) -> Result<()> {
        debug!("Saving {} bytes to {}", content.len(), dataset.file_name());
        self.write_atomically(dataset, content)
    }
}
