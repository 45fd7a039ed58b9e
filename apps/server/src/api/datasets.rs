use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
    routing::get,
    Extension, Json, Router,
};
use fundbook_core::datasets::{Dataset, ImportSummary};
use fundbook_core::errors::Error as CoreError;
use fundbook_core::identity::RequestContext;

use super::shared::csv_attachment;
use crate::{error::ApiResult, main_lib::AppState};

fn parse_dataset(raw: &str) -> ApiResult<Dataset> {
    raw.parse::<Dataset>()
        .map_err(|e| CoreError::Validation(e).into())
}

#[utoipa::path(get, path = "/api/v1/datasets/{dataset}", params(("dataset" = String, Path, description = "movements, trades or funds")), responses((status = 200, description = "Current snapshot as CSV", content_type = "text/csv"), (status = 403, description = "Administrators only")))]
pub async fn download_dataset(
    Path(dataset): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Response> {
    let dataset = parse_dataset(&dataset)?;
    let bytes = state.import_service.export_dataset(&ctx, dataset)?;
    let text = String::from_utf8(bytes).map_err(|e| anyhow::anyhow!(e))?;
    Ok(csv_attachment(dataset.file_name(), text))
}

/// Replaces a whole dataset with the uploaded CSV. Nothing changes if any row is rejected.
#[utoipa::path(put, path = "/api/v1/datasets/{dataset}", params(("dataset" = String, Path, description = "movements, trades or funds")), request_body(content = String, content_type = "text/csv"), responses((status = 200, description = "Rows stored and defaulted columns"), (status = 400, description = "Upload rejected"), (status = 403, description = "Administrators only")))]
pub async fn replace_dataset(
    Path(dataset): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    body: Bytes,
) -> ApiResult<Json<ImportSummary>> {
    let dataset = parse_dataset(&dataset)?;
    let summary = state
        .import_service
        .replace_dataset(&ctx, dataset, &body)
        .await?;
    tracing::info!(
        dataset = %summary.dataset,
        rows = summary.rows,
        username = %ctx.username,
        "Dataset replaced"
    );
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/datasets/{dataset}",
        get(download_dataset).put(replace_dataset),
    )
}
