//! Storage-specific error types for the file and memory stores.
//!
//! This module wraps filesystem errors and converts them to the
//! storage-agnostic error types defined in `fundbook_core`.

use fundbook_core::datasets::Dataset;
use fundbook_core::errors::{Error, StoreError};
use std::io;
use thiserror::Error;

/// Storage-specific errors.
///
/// These errors are internal to the storage layer and are converted to
/// `fundbook_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to prepare data directory: {0}")]
    InitFailed(#[source] io::Error),

    #[error("Failed to read {dataset}: {source}")]
    ReadFailed {
        dataset: Dataset,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {dataset}: {source}")]
    WriteFailed {
        dataset: Dataset,
        #[source]
        source: io::Error,
    },

    #[error("Stored {dataset} data is unreadable: {message}")]
    Corrupt { dataset: Dataset, message: String },

    #[error("Writer unavailable: {0}")]
    WriterUnavailable(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InitFailed(e) => Error::Store(StoreError::InitFailed(e.to_string())),
            StorageError::ReadFailed { dataset, source } => Error::Store(StoreError::ReadFailed {
                dataset,
                message: source.to_string(),
            }),
            StorageError::WriteFailed { dataset, source } => {
                Error::Store(StoreError::WriteFailed {
                    dataset,
                    message: source.to_string(),
                })
            }
            StorageError::Corrupt { dataset, message } => {
                Error::Store(StoreError::Corrupt { dataset, message })
            }
            StorageError::WriterUnavailable(e) => Error::Store(StoreError::Internal(e)),
            StorageError::LockPoisoned => {
                Error::Store(StoreError::Internal("Store lock poisoned".to_string()))
            }
        }
    }
}

/// Extension trait for converting a failed decode of persisted content into
/// a corrupt-store error.
///
/// Decoding errors of an upload are the caller's fault; the same errors on
/// a file already on disk mean the store itself is damaged.
pub trait IntoCore<T> {
    fn into_core(self, dataset: Dataset) -> fundbook_core::Result<T>;
}

impl<T> IntoCore<T> for fundbook_core::Result<T> {
    fn into_core(self, dataset: Dataset) -> fundbook_core::Result<T> {
        self.map_err(|e| match e {
            Error::Validation(v) => StorageError::Corrupt {
                dataset,
                message: v.to_string(),
            }
            .into(),
            other => other,
        })
    }
}
