use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fundbook_core::errors::Error as CoreError;
use fundbook_core::trades::TradeError;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoreError::NotFound(_) | CoreError::Trade(TradeError::NotFound { .. }) => {
            StatusCode::NOT_FOUND
        }
        CoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
        CoreError::Validation(_) | CoreError::Trade(_) => StatusCode::BAD_REQUEST,
        CoreError::Store(_) | CoreError::Repository(_) | CoreError::Unexpected(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Auth(err) => return err.into_response(),
            ApiError::Core(e) => {
                let status = core_status(&e);
                if status.is_server_error() {
                    tracing::error!("Request failed: {e}");
                }
                (status, e.to_string())
            }
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::Anyhow(e) => {
                tracing::error!("Request failed: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
