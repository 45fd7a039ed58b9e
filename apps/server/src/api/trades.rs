use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use fundbook_core::identity::RequestContext;
use fundbook_core::trades::{NewTrade, TradeOutcome, TradeRecord, TradeTargets, TradeUpdate};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::shared::TradeQuery;
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeBody {
    pub date: NaiveDate,
    pub asset: String,
    pub strategy: String,
    #[serde(default)]
    pub broker: String,
    pub position_value: Decimal,
    pub take_profit_pct: Decimal,
    pub stop_loss_pct: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    #[serde(default)]
    pub outcome: Option<TradeOutcome>,
}

impl TradeBody {
    fn into_new_trade(self, fund: String) -> NewTrade {
        NewTrade {
            fund,
            date: self.date,
            asset: self.asset,
            strategy: self.strategy,
            broker: self.broker,
            position_value: self.position_value,
            take_profit_pct: self.take_profit_pct,
            stop_loss_pct: self.stop_loss_pct,
            fee: self.fee,
            outcome: self.outcome,
        }
    }
}

#[derive(Deserialize)]
pub struct CloseTradeRequest {
    pub outcome: TradeOutcome,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub position_value: Decimal,
    pub take_profit_pct: Decimal,
    pub stop_loss_pct: Decimal,
    #[serde(default)]
    pub fee: Decimal,
}

#[utoipa::path(get, path = "/api/v1/funds/{fund}/trades", params(("fund" = String, Path, description = "Fund name")), responses((status = 200, description = "Trades, newest first")))]
pub async fn list_trades(
    Path(fund): Path<String>,
    Query(query): Query<TradeQuery>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<TradeRecord>>> {
    let trades = state
        .trade_service
        .list_trades(&ctx, &fund, &query.into_filter())?;
    Ok(Json(trades))
}

#[utoipa::path(post, path = "/api/v1/funds/{fund}/trades", params(("fund" = String, Path, description = "Fund name")), responses((status = 201, description = "Trade recorded"), (status = 400, description = "Invalid trade or unknown strategy")))]
pub async fn create_trade(
    Path(fund): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<TradeBody>,
) -> ApiResult<(StatusCode, Json<TradeRecord>)> {
    let created = state
        .trade_service
        .create_trade(&ctx, body.into_new_trade(fund))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/funds/{fund}/trades/{id}", params(("fund" = String, Path, description = "Fund name"), ("id" = u64, Path, description = "Trade id within the fund")), responses((status = 200, description = "Trade"), (status = 404, description = "Unknown trade")))]
pub async fn get_trade(
    Path((fund, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<TradeRecord>> {
    Ok(Json(state.trade_service.get_trade(&ctx, &fund, id)?))
}

#[utoipa::path(put, path = "/api/v1/funds/{fund}/trades/{id}", params(("fund" = String, Path, description = "Fund name"), ("id" = u64, Path, description = "Trade id within the fund")), responses((status = 200, description = "Updated trade"), (status = 404, description = "Unknown trade")))]
pub async fn update_trade(
    Path((fund, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(update): Json<TradeUpdate>,
) -> ApiResult<Json<TradeRecord>> {
    let updated = state
        .trade_service
        .update_trade(&ctx, &fund, id, update)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/api/v1/funds/{fund}/trades/{id}", params(("fund" = String, Path, description = "Fund name"), ("id" = u64, Path, description = "Trade id within the fund")), responses((status = 204), (status = 404, description = "Unknown trade")))]
pub async fn delete_trade(
    Path((fund, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state.trade_service.delete_trade(&ctx, &fund, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/funds/{fund}/trades/{id}/close", params(("fund" = String, Path, description = "Fund name"), ("id" = u64, Path, description = "Trade id within the fund")), responses((status = 200, description = "Closed trade"), (status = 400, description = "Trade is not open")))]
pub async fn close_trade(
    Path((fund, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(request): Json<CloseTradeRequest>,
) -> ApiResult<Json<TradeRecord>> {
    let closed = state
        .trade_service
        .close_trade(&ctx, &fund, id, request.outcome)
        .await?;
    Ok(Json(closed))
}

#[utoipa::path(post, path = "/api/v1/trades/preview", responses((status = 200, description = "Estimated take-profit and stop-loss amounts"), (status = 400, description = "Values outside the accepted range")))]
pub async fn preview_targets(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PreviewRequest>,
) -> ApiResult<Json<TradeTargets>> {
    let targets = state.trade_service.preview_targets(
        request.position_value,
        request.take_profit_pct,
        request.stop_loss_pct,
        request.fee,
    )?;
    Ok(Json(targets))
}

#[utoipa::path(get, path = "/api/v1/strategies", responses((status = 200, description = "Accepted strategies")))]
pub async fn list_strategies(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.trade_service.strategies())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/funds/{fund}/trades", get(list_trades).post(create_trade))
        .route(
            "/funds/{fund}/trades/{id}",
            get(get_trade).put(update_trade).delete(delete_trade),
        )
        .route("/funds/{fund}/trades/{id}/close", post(close_trade))
        .route("/trades/preview", post(preview_targets))
        .route("/strategies", get(list_strategies))
}
