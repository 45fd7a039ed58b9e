use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use fundbook_core::identity::RequestContext;
use fundbook_core::movements::{CapitalMovement, IndexedMovement, MovementUpdate, NewMovement};

use crate::{error::ApiResult, main_lib::AppState};

#[utoipa::path(get, path = "/api/v1/funds/{fund}/movements", params(("fund" = String, Path, description = "Fund name")), responses((status = 200, description = "Movements, newest first")))]
pub async fn list_movements(
    Path(fund): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<IndexedMovement>>> {
    Ok(Json(state.movement_service.list_movements(&ctx, &fund)?))
}

/// The body carries everything but the fund, which comes from the path.
#[utoipa::path(post, path = "/api/v1/funds/{fund}/movements", params(("fund" = String, Path, description = "Fund name")), responses((status = 201, description = "Movement recorded")))]
pub async fn create_movement(
    Path(fund): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<MovementUpdate>,
) -> ApiResult<(StatusCode, Json<CapitalMovement>)> {
    let new_movement = NewMovement {
        fund,
        partner: body.partner,
        external_id: body.external_id,
        date: body.date,
        kind: body.kind,
        amount: body.amount,
    };
    let created = state
        .movement_service
        .create_movement(&ctx, new_movement)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/v1/funds/{fund}/movements/{index}", params(("fund" = String, Path, description = "Fund name"), ("index" = usize, Path, description = "Position among the fund's movements")), responses((status = 200, description = "Updated movement"), (status = 404, description = "No movement at index")))]
pub async fn update_movement(
    Path((fund, index)): Path<(String, usize)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(update): Json<MovementUpdate>,
) -> ApiResult<Json<CapitalMovement>> {
    let updated = state
        .movement_service
        .update_movement(&ctx, &fund, index, update)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/api/v1/funds/{fund}/movements/{index}", params(("fund" = String, Path, description = "Fund name"), ("index" = usize, Path, description = "Position among the fund's movements")), responses((status = 204), (status = 404, description = "No movement at index")))]
pub async fn delete_movement(
    Path((fund, index)): Path<(String, usize)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state
        .movement_service
        .delete_movement(&ctx, &fund, index)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/funds/{fund}/movements",
            get(list_movements).post(create_movement),
        )
        .route(
            "/funds/{fund}/movements/{index}",
            put(update_movement).delete(delete_movement),
        )
}
