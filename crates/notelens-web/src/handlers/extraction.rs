//! 이미지 텍스트 추출 핸들러.
//!
//! 본문 형식:
//! - `{"theme": "...", "image": "<base64 또는 data URL>"}`
//! - 구형 클라이언트용 `{"theme": "...", "blob": {"0": 137, "1": 80, ...}}`

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use notelens_core::models::fragment::Fragment;

use crate::error::ApiError;
use crate::AppState;

/// POST /api/text_from_image 요청
#[derive(Debug, Deserialize)]
pub struct TextFromImageRequest {
    pub theme: Option<String>,
    /// base64 인코딩 이미지
    #[serde(default)]
    pub image: Option<String>,
    /// 인덱스 → 바이트 값 맵 (구형 형식)
    #[serde(default)]
    pub blob: Option<HashMap<String, u64>>,
}

impl TextFromImageRequest {
    /// 요청 본문에서 이미지 바이트 추출 (`image` 우선)
    pub fn image_bytes(&self) -> Result<Vec<u8>, ApiError> {
        if let Some(image) = &self.image {
            return decode_base64_image(image);
        }
        if let Some(blob) = &self.blob {
            return decode_blob(blob);
        }
        Err(ApiError::BadRequest(
            "image 또는 blob 필드가 필요합니다".to_string(),
        ))
    }
}

/// base64 문자열 디코딩 (`data:image/png;base64,` 접두사 허용)
pub fn decode_base64_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
    let payload = match encoded.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ApiError::BadRequest(format!("image base64 디코딩 실패: {}", e)))
}

/// 구형 바이트 맵 디코딩
///
/// 키는 `0..len` 이 빠짐없이 있어야 하고 값은 0~255.
pub fn decode_blob(blob: &HashMap<String, u64>) -> Result<Vec<u8>, ApiError> {
    (0..blob.len())
        .map(|i| {
            let value = blob
                .get(&i.to_string())
                .ok_or_else(|| ApiError::BadRequest(format!("blob 인덱스 {} 누락", i)))?;
            u8::try_from(*value).map_err(|_| {
                ApiError::BadRequest(format!("blob[{}] 값 {}이(가) 바이트 범위를 벗어남", i, value))
            })
        })
        .collect()
}

/// POST /api/text_from_image
pub async fn text_from_image(
    State(state): State<AppState>,
    payload: Result<Json<TextFromImageRequest>, JsonRejection>,
) -> Result<Json<Vec<Fragment>>, ApiError> {
    let Json(request) = payload?;
    let theme = request
        .theme
        .clone()
        .ok_or_else(|| ApiError::BadRequest("theme 필드가 필요합니다".to_string()))?;
    let image = request.image_bytes()?;

    debug!(bytes = image.len(), theme = %theme, "이미지 분석 요청");
    let fragments = state.pipeline.analyze(&image, &theme).await?;
    Ok(Json(fragments))
}
