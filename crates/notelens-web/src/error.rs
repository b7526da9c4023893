//! API 에러 처리.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use notelens_core::error::CoreError;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 잘못된 요청 (본문 형식, 필수 필드 누락, 디코딩 불가 이미지)
    #[error("잘못된 요청: {0}")]
    BadRequest(String),

    /// 외부 제공자 실패
    #[error("외부 서비스 오류: {0}")]
    BadGateway(String),

    /// 내부 서버 오류
    #[error("내부 서버 오류: {0}")]
    Internal(String),
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::BadGateway(msg) | ApiError::Internal(msg) => msg,
        };

        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %message, "API 오류 응답");
        }

        let body = ErrorResponse {
            error: message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_client_error() {
            return ApiError::BadRequest(err.to_string());
        }
        match err {
            CoreError::Network(_)
            | CoreError::RateLimit { .. }
            | CoreError::ServiceUnavailable(_)
            | CoreError::Provider { .. }
            | CoreError::Config(_) => ApiError::BadGateway(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
