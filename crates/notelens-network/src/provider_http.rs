//! AI 제공자 공통 HTTP 처리.
//!
//! 제공자 타입별 요청 본문 구성, 인증 헤더, 상태 코드 → 에러 매핑,
//! 응답 본문에서 생성 텍스트 추출을 한곳에 모은다.

use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::warn;

use notelens_core::config::{AiProviderType, ExternalApiEndpoint};
use notelens_core::error::CoreError;

/// Anthropic API 버전 헤더 값
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// 에러 메시지에 포함할 응답 본문 최대 길이
const ERROR_BODY_PREVIEW: usize = 200;

/// 생성 요청 파라미터
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.5,
        }
    }
}

/// 엔드포인트 설정으로 reqwest 클라이언트 생성
pub fn build_http_client(config: &ExternalApiEndpoint) -> Result<reqwest::Client, CoreError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// 제공자 타입에 맞는 단일 프롬프트 요청 본문
pub fn build_prompt_body(
    provider_type: AiProviderType,
    model: &str,
    prompt: &str,
    params: GenerationParams,
) -> Value {
    match provider_type {
        AiProviderType::Anthropic => serde_json::json!({
            "model": model,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "messages": [{ "role": "user", "content": prompt }]
        }),
        AiProviderType::Cohere => serde_json::json!({
            "model": model,
            "prompt": prompt,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "num_generations": 1
        }),
        // OpenAI 호환 형식
        AiProviderType::OpenAi | AiProviderType::Generic => serde_json::json!({
            "model": model,
            "n": 1,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "messages": [{ "role": "user", "content": prompt }]
        }),
    }
}

/// 제공자 타입에 따라 인증 헤더 구성 (키가 비어 있으면 생략)
pub fn authorize(
    builder: RequestBuilder,
    provider_type: AiProviderType,
    api_key: &str,
) -> RequestBuilder {
    if api_key.is_empty() {
        return builder;
    }
    match provider_type {
        AiProviderType::Anthropic => builder
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION),
        _ => builder.header("Authorization", format!("Bearer {}", api_key)),
    }
}

/// 요청 전송 후 상태 코드 확인, 성공 시 응답 본문 반환
pub async fn send_for_body(builder: RequestBuilder, provider: &str) -> Result<String, CoreError> {
    let response = builder
        .send()
        .await
        .map_err(|e| CoreError::Network(format!("{} 호출 실패: {}", provider, e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CoreError::Network(format!("{} 응답 읽기 실패: {}", provider, e)))?;

    if status.is_success() {
        return Ok(body);
    }

    warn!(status = %status, provider, "AI API 오류 응답");
    Err(status_error(status.as_u16(), provider, &body))
}

/// 비정상 상태 코드 → 에러 매핑
pub fn status_error(status: u16, provider: &str, body: &str) -> CoreError {
    match status {
        // Retry-After 헤더는 제공자마다 달라 기본 60초
        429 => CoreError::RateLimit {
            retry_after_secs: 60,
        },
        503 => CoreError::ServiceUnavailable(preview(body)),
        _ => CoreError::Provider {
            provider: provider.to_string(),
            status: Some(status),
            message: format!("HTTP {}: {}", status, preview(body)),
        },
    }
}

/// 응답 본문에서 첫 번째 생성 텍스트 추출
///
/// - Anthropic: `content[0].text`
/// - OpenAI: `choices[0].message.content` (레거시 `choices[0].text`)
/// - Cohere: `generations[0].text`
/// - Generic: 위 형식을 순서대로 시도
pub fn extract_generated_text(
    provider_type: AiProviderType,
    body: &str,
    provider: &str,
) -> Result<String, CoreError> {
    let response: Value = serde_json::from_str(body).map_err(|e| CoreError::Provider {
        provider: provider.to_string(),
        status: None,
        message: format!("응답 JSON 파싱 실패: {}", e),
    })?;

    let text = match provider_type {
        AiProviderType::Anthropic => anthropic_text(&response),
        AiProviderType::OpenAi => openai_text(&response),
        AiProviderType::Cohere => cohere_text(&response),
        AiProviderType::Generic => openai_text(&response)
            .or_else(|| anthropic_text(&response))
            .or_else(|| cohere_text(&response)),
    };

    text.map(str::to_string).ok_or_else(|| CoreError::Provider {
        provider: provider.to_string(),
        status: None,
        message: format!("응답에서 생성 텍스트를 찾을 수 없음: {}", preview(body)),
    })
}

fn anthropic_text(response: &Value) -> Option<&str> {
    response
        .get("content")?
        .as_array()?
        .iter()
        .find_map(|block| block.get("text").and_then(Value::as_str))
}

fn openai_text(response: &Value) -> Option<&str> {
    let choice = response.get("choices")?.as_array()?.first()?;
    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .or_else(|| choice.get("text").and_then(Value::as_str))
}

fn cohere_text(response: &Value) -> Option<&str> {
    response
        .get("generations")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
}

/// 모델 응답에서 가장 바깥쪽 `open ... close` 구간 추출 (마크다운 코드 블록 처리)
pub fn extract_json_block(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// 로그/에러용 본문 미리보기
pub fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}
