//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성 (`/api` 아래에 중첩)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        // 이미지 분석
        .route(
            "/text_from_image",
            post(handlers::extraction::text_from_image),
        )
        // 노트 생성 릴레이
        .route("/generate_notes", post(handlers::notes::generate_notes))
        .route("/generate_json", post(handlers::notes::generate_json))
}
