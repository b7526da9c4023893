//! 외부 AI 교정 클라이언트.
//!
//! OCR로 읽은 텍스트 배치를 LLM에 보내 의도된 영어 구문을 추정한다.
//! 응답은 `[{"possibility": ..., "confidence": ...}]` 형식의 JSON 배열이며,
//! 코드 블록이나 앞뒤 설명 문장이 붙어 와도 가장 바깥 배열만 파싱한다.

use async_trait::async_trait;
use tracing::{debug, warn};

use notelens_core::config::{AiProviderType, ExternalApiEndpoint};
use notelens_core::error::CoreError;
use notelens_core::models::correction::{CorrectionBatch, CorrectionGuess};
use notelens_core::ports::correction_provider::CorrectionProvider;

use crate::provider_http::{
    authorize, build_http_client, build_prompt_body, extract_generated_text, extract_json_block,
    preview, send_for_body, GenerationParams,
};

/// 교정 요청 temperature
const CORRECTION_TEMPERATURE: f32 = 0.5;

/// 교정 응답 최대 토큰 (배치 75개 기준 여유 있게)
const CORRECTION_MAX_TOKENS: u32 = 4096;

// ============================================================
// RemoteCorrectionProvider — 외부 교정 LLM 클라이언트
// ============================================================

/// 외부 교정 LLM 클라이언트
///
/// 지원 API:
/// - OpenAI 호환: `POST /v1/chat/completions`
/// - Claude (Anthropic): `POST /v1/messages`
/// - Cohere 호환 completion: `POST /v1/generate`
#[derive(Debug)]
pub struct RemoteCorrectionProvider {
    http_client: reqwest::Client,
    endpoint: String,
    /// API 키 (메모리에만 유지)
    api_key: String,
    model: String,
    provider_type: AiProviderType,
}

impl RemoteCorrectionProvider {
    /// 새 RemoteCorrectionProvider 생성
    pub fn new(config: &ExternalApiEndpoint) -> Result<Self, CoreError> {
        if !config.has_api_key() {
            return Err(CoreError::Config(format!(
                "교정 API 키 미설정: {}",
                config.endpoint
            )));
        }

        let http_client = build_http_client(config)?;
        let model = config.model.clone().unwrap_or_else(|| "gpt-4".to_string());

        debug!(
            endpoint = %config.endpoint,
            model = %model,
            timeout = config.timeout_secs,
            "RemoteCorrectionProvider 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model,
            provider_type: config.provider_type,
        })
    }

    /// 교정 프롬프트 구성
    ///
    /// 텍스트 목록은 JSON 배열로 직렬화해 그대로 삽입한다.
    pub fn build_prompt(texts: &[String], theme: &str) -> String {
        let texts_json = serde_json::to_string(texts).unwrap_or_else(|_| "[]".to_string());
        format!(
            "Each string in the array {texts_json} was read from a photo of handwritten or \
printed notes and may contain recognition errors. For every string, in the same order, \
give the single most likely English phrase it was meant to be, using the topic \"{theme}\" \
as a hint. Make each guess as likely as possible. Reply with only a JSON array with exactly \
one object per input string, in this format: \
[{{\"possibility\": \"<most likely English phrase>\", \"confidence\": <number from 0 (not confident) to 1 (confident)>}}]"
        )
    }

    /// 모델 응답 텍스트에서 추정값 배열 파싱
    pub fn parse_guesses(text: &str) -> Result<Vec<CorrectionGuess>, CoreError> {
        let json_str = extract_json_block(text, '[', ']').ok_or_else(|| CoreError::Provider {
            provider: "correction".to_string(),
            status: None,
            message: format!("응답에 JSON 배열 없음: {}", preview(text)),
        })?;

        serde_json::from_str(json_str).map_err(|e| CoreError::Provider {
            provider: "correction".to_string(),
            status: None,
            message: format!("교정 배열 파싱 실패: {}", e),
        })
    }
}

#[async_trait]
impl CorrectionProvider for RemoteCorrectionProvider {
    async fn correct(&self, batch: &CorrectionBatch) -> Result<Vec<CorrectionGuess>, CoreError> {
        let prompt = Self::build_prompt(&batch.texts, &batch.theme);
        let body = build_prompt_body(
            self.provider_type,
            &self.model,
            &prompt,
            GenerationParams {
                max_tokens: CORRECTION_MAX_TOKENS,
                temperature: CORRECTION_TEMPERATURE,
            },
        );

        debug!(
            model = %self.model,
            batch = batch.index,
            texts = batch.len(),
            "교정 요청"
        );

        let request = authorize(
            self.http_client.post(&self.endpoint).json(&body),
            self.provider_type,
            &self.api_key,
        );
        let response_body = send_for_body(request, &self.model).await?;
        let text = extract_generated_text(self.provider_type, &response_body, &self.model)?;
        let guesses = Self::parse_guesses(&text)?;

        if guesses.len() != batch.len() {
            warn!(
                model = %self.model,
                batch = batch.index,
                expected = batch.len(),
                received = guesses.len(),
                "교정 결과 개수 불일치"
            );
        }

        Ok(guesses)
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}
