//! 학습 노트 / JSON 변환 핸들러.
//!
//! 두 엔드포인트 모두 생성된 텍스트를 text/plain으로 그대로 돌려준다.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::AppState;

/// POST /api/generate_notes 요청
#[derive(Debug, Deserialize)]
pub struct GenerateNotesRequest {
    pub topic: String,
    #[serde(default)]
    pub description: String,
    /// 추출된 텍스트 (문자열 또는 임의 JSON)
    #[serde(default)]
    pub data: Value,
}

/// POST /api/generate_json 요청
#[derive(Debug, Deserialize)]
pub struct GenerateJsonRequest {
    pub notes: String,
}

/// 노트 재료를 프롬프트용 문자열로
fn material_text(data: &Value) -> String {
    match data {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// POST /api/generate_notes
pub async fn generate_notes(
    State(state): State<AppState>,
    payload: Result<Json<GenerateNotesRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(request) = payload?;
    let notes = state
        .notes
        .generate_notes(
            &request.topic,
            &request.description,
            &material_text(&request.data),
        )
        .await?;
    Ok(notes)
}

/// POST /api/generate_json
pub async fn generate_json(
    State(state): State<AppState>,
    payload: Result<Json<GenerateJsonRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(request) = payload?;
    Ok(state.notes.generate_json(&request.notes).await?)
}
