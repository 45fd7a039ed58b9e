use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Extension, Json, Router,
};
use fundbook_core::identity::RequestContext;
use fundbook_core::ledger::{EquityPoint, FundSummary, PartnerAttribution};

use super::shared::{csv_attachment, TradeQuery};
use crate::{error::ApiResult, main_lib::AppState};

#[utoipa::path(get, path = "/api/v1/funds/{fund}/summary", params(("fund" = String, Path, description = "Fund name")), responses((status = 200, description = "Fund summary")))]
pub async fn get_summary(
    Path(fund): Path<String>,
    Query(query): Query<TradeQuery>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<FundSummary>> {
    let summary = state
        .ledger_service
        .get_fund_summary(&ctx, &fund, &query.into_filter())?;
    Ok(Json(summary))
}

#[utoipa::path(get, path = "/api/v1/funds/{fund}/partners", params(("fund" = String, Path, description = "Fund name")), responses((status = 200, description = "Partner attribution")))]
pub async fn get_partners(
    Path(fund): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<PartnerAttribution>>> {
    Ok(Json(
        state.ledger_service.get_partner_attribution(&ctx, &fund)?,
    ))
}

#[utoipa::path(get, path = "/api/v1/funds/{fund}/equity-curve", params(("fund" = String, Path, description = "Fund name")), responses((status = 200, description = "Equity after each closed trade")))]
pub async fn get_equity_curve(
    Path(fund): Path<String>,
    Query(query): Query<TradeQuery>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<EquityPoint>>> {
    let points = state
        .ledger_service
        .get_equity_curve(&ctx, &fund, &query.into_filter())?;
    Ok(Json(points))
}

#[utoipa::path(get, path = "/api/v1/funds/{fund}/export/summary.csv", params(("fund" = String, Path, description = "Fund name")), responses((status = 200, description = "Summary as CSV", content_type = "text/csv")))]
pub async fn export_summary(
    Path(fund): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Response> {
    let text = state.ledger_service.export_summary_csv(&ctx, &fund)?;
    Ok(csv_attachment(&format!("{fund}-summary.csv"), text))
}

#[utoipa::path(get, path = "/api/v1/funds/{fund}/export/partners.csv", params(("fund" = String, Path, description = "Fund name")), responses((status = 200, description = "Partner table as CSV", content_type = "text/csv")))]
pub async fn export_partners(
    Path(fund): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Response> {
    let text = state.ledger_service.export_partners_csv(&ctx, &fund)?;
    Ok(csv_attachment(&format!("{fund}-partners.csv"), text))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/funds/{fund}/summary", get(get_summary))
        .route("/funds/{fund}/partners", get(get_partners))
        .route("/funds/{fund}/equity-curve", get(get_equity_curve))
        .route("/funds/{fund}/export/summary.csv", get(export_summary))
        .route("/funds/{fund}/export/partners.csv", get(export_partners))
}
