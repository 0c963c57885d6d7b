use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiError;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub fn error(code: StatusCode, error: &'static str) -> Response {
    (
        code,
        Json(ApiError {
            error,
            details: None,
        }),
    )
        .into_response()
}

pub fn error_with_details(code: StatusCode, error: &'static str, details: String) -> Response {
    (
        code,
        Json(ApiError {
            error,
            details: Some(details),
        }),
    )
        .into_response()
}
