//! 외부 텍스트 생성 클라이언트.
//!
//! 학습 노트 작성과 노트→JSON 변환에 쓰는 단순 릴레이.
//! 프롬프트를 그대로 보내고 첫 번째 생성 텍스트를 돌려준다.

use async_trait::async_trait;
use tracing::debug;

use notelens_core::config::{AiProviderType, ExternalApiEndpoint};
use notelens_core::error::CoreError;
use notelens_core::ports::text_generator::TextGenerator;

use crate::provider_http::{
    authorize, build_http_client, build_prompt_body, extract_generated_text, send_for_body,
    GenerationParams,
};

/// 외부 텍스트 생성기 (completion / chat / messages 형식)
#[derive(Debug)]
pub struct RemoteTextGenerator {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    provider_type: AiProviderType,
    params: GenerationParams,
}

impl RemoteTextGenerator {
    pub fn new(config: &ExternalApiEndpoint) -> Result<Self, CoreError> {
        if !config.has_api_key() {
            return Err(CoreError::Config(format!(
                "텍스트 생성 API 키 미설정: {}",
                config.endpoint
            )));
        }

        let http_client = build_http_client(config)?;
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| "gpt-3.5-turbo".to_string());

        debug!(
            endpoint = %config.endpoint,
            model = %model,
            "RemoteTextGenerator 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model,
            provider_type: config.provider_type,
            params: GenerationParams::default(),
        })
    }

    /// 생성 파라미터 변경
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

#[async_trait]
impl TextGenerator for RemoteTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CoreError> {
        let body = build_prompt_body(self.provider_type, &self.model, prompt, self.params);
        let request = authorize(
            self.http_client.post(&self.endpoint).json(&body),
            self.provider_type,
            &self.api_key,
        );

        debug!(model = %self.model, prompt_len = prompt.len(), "텍스트 생성 요청");
        let response_body = send_for_body(request, &self.model).await?;
        extract_generated_text(self.provider_type, &response_body, &self.model)
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}
