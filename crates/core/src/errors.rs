//! Core error types for the Fundbook application.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from `csv`, the filesystem, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::datasets::Dataset;
use crate::trades::TradeError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the fund ledger.
///
/// Store-specific errors are wrapped in string form to keep this type
/// independent of any particular backend.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Trade error: {0}")]
    Trade(#[from] TradeError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Backend-agnostic error type for tabular store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The dataset could not be read.
    #[error("Failed to read dataset '{dataset}': {message}")]
    ReadFailed { dataset: Dataset, message: String },

    /// The dataset snapshot could not be written. The previous snapshot is kept.
    #[error("Failed to write dataset '{dataset}': {message}")]
    WriteFailed { dataset: Dataset, message: String },

    /// A persisted file does not match its expected layout.
    #[error("Dataset '{dataset}' is corrupt: {message}")]
    Corrupt { dataset: Dataset, message: String },

    /// The store could not be initialised.
    #[error("Failed to initialise store: {0}")]
    InitFailed(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{0}' must not be negative")]
    NegativeAmount(String),

    #[error("{0} is outside the supported range")]
    OutOfRange(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),

    #[error("Columns {unexpected:?} are not part of the '{dataset}' schema")]
    SchemaMismatch {
        dataset: Dataset,
        unexpected: Vec<String>,
    },

    #[error("Row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
