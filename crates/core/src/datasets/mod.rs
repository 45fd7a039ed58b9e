//! Datasets module - table layouts, the CSV codec and wholesale upload/download.

pub mod csv_codec;
mod datasets_model;
mod import_service;
mod import_traits;
pub mod schema;



pub use datasets_model::{Dataset, ImportSummary};
pub use import_service::ImportService;
pub use import_traits::ImportServiceTrait;
pub use schema::validate_columns;
