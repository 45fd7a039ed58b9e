use async_trait::async_trait;

use super::datasets_model::{Dataset, ImportSummary};
use crate::errors::Result;
use crate::identity::RequestContext;

/// Wholesale replacement and download of persisted datasets.
#[async_trait]
pub trait ImportServiceTrait: Send + Sync {
    /// Replaces a dataset with uploaded CSV content.
    ///
    /// The upload is all-or-nothing: a foreign column or a single bad row
    /// rejects it and the stored data stays as it was.
    async fn replace_dataset(
        &self,
        ctx: &RequestContext,
        dataset: Dataset,
        content: &[u8],
    ) -> Result<ImportSummary>;

    /// Current content of a dataset as CSV, header included.
    fn export_dataset(&self, ctx: &RequestContext, dataset: Dataset) -> Result<Vec<u8>>;
}
