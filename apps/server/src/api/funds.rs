use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use fundbook_core::funds::{Fund, NewFund};
use fundbook_core::identity::RequestContext;

use crate::{error::ApiResult, main_lib::AppState};

#[utoipa::path(get, path = "/api/v1/funds", responses((status = 200, description = "Funds visible to the caller")))]
pub async fn list_funds(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<Fund>>> {
    Ok(Json(state.fund_service.list_funds(&ctx)?))
}

#[utoipa::path(post, path = "/api/v1/funds", responses((status = 201, description = "Fund registered"), (status = 409, description = "Name already registered")))]
pub async fn create_fund(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewFund>,
) -> ApiResult<(StatusCode, Json<Fund>)> {
    let fund = state.fund_service.create_fund(&ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(fund)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/funds", get(list_funds).post(create_fund))
}
