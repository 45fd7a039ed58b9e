mod datasets;
mod funds;
mod ledger;
mod movements;
mod shared;
mod trades;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    auth::{self, require_jwt},
    config::Config,
    main_lib::AppState,
};

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        auth::login,
        auth::get_session,
        auth::switch_fund,
        funds::list_funds,
        funds::create_fund,
        movements::list_movements,
        movements::create_movement,
        movements::update_movement,
        movements::delete_movement,
        trades::list_trades,
        trades::create_trade,
        trades::get_trade,
        trades::update_trade,
        trades::delete_trade,
        trades::close_trade,
        trades::preview_targets,
        trades::list_strategies,
        ledger::get_summary,
        ledger::get_partners,
        ledger::get_equity_curve,
        ledger::export_summary,
        ledger::export_partners,
        datasets::download_dataset,
        datasets::replace_dataset,
    ),
    tags((name = "fundbook"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let protected = Router::new()
        .route("/session", get(auth::get_session))
        .route("/session/switch-fund", post(auth::switch_fund))
        .merge(funds::router())
        .merge(movements::router())
        .merge(trades::router())
        .merge(ledger::router())
        .merge(datasets::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/auth/login", post(auth::login))
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
