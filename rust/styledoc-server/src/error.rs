//! Maps error kinds to HTTP status codes at the edge, matching the
//! propagation policy followed throughout the pipeline: failures surface
//! once, here, rather than being re-wrapped at every layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

pub enum ApiError {
    InvalidCardKey,
    QuotaExceeded,
    NotFound(String),
    Forbidden(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::InvalidCardKey => (StatusCode::UNAUTHORIZED, "无效的卡密".to_string()),
            ApiError::QuotaExceeded => (StatusCode::FORBIDDEN, "该卡密已达到使用次数限制".to_string()),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Forbidden(detail) => (StatusCode::FORBIDDEN, detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
