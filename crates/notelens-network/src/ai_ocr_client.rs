//! 외부 OCR 서비스 클라이언트.
//!
//! 이미지를 base64로 인코딩해 `{"image": ...}` 로 전송하고
//! 검출 목록을 받는다. 응답은 다음 형식을 모두 허용한다.
//!
//! - `{"detections": [{"quad": [[x,y] x4], "text": "...", "confidence": 0.9}]}`
//! - 검출 객체 배열 (`pos`/`box` 키도 허용)
//! - `[[[x,y] x4], "text", confidence]` 튜플 배열

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use notelens_core::config::{AiProviderType, ExternalApiEndpoint};
use notelens_core::error::CoreError;
use notelens_core::models::detection::{Detection, Quad};
use notelens_core::ports::ocr_provider::OcrProvider;

use crate::provider_http::{authorize, build_http_client, preview, send_for_body};

/// 응답의 검출 항목 (객체 또는 튜플)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireDetection {
    Object(Detection),
    Tuple(Quad, String, f64),
}

impl From<WireDetection> for Detection {
    fn from(wire: WireDetection) -> Self {
        match wire {
            WireDetection::Object(det) => det,
            WireDetection::Tuple(quad, text, confidence) => Detection::new(quad, text, confidence),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Wrapped { detections: Vec<WireDetection> },
    Bare(Vec<WireDetection>),
}

// ============================================================
// RemoteOcrProvider — 외부 OCR API 클라이언트
// ============================================================

/// 외부 OCR API 클라이언트
///
/// 자체 호스팅 OCR 서비스를 가정하므로 API 키는 선택 사항이다.
#[derive(Debug)]
pub struct RemoteOcrProvider {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    provider_type: AiProviderType,
}

impl RemoteOcrProvider {
    pub fn new(config: &ExternalApiEndpoint) -> Result<Self, CoreError> {
        if config.endpoint.trim().is_empty() {
            return Err(CoreError::Config("OCR API 엔드포인트 미설정".into()));
        }

        let http_client = build_http_client(config)?;

        debug!(
            endpoint = %config.endpoint,
            timeout = config.timeout_secs,
            "RemoteOcrProvider 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            provider_type: config.provider_type,
        })
    }

    /// 응답 본문에서 검출 목록 파싱
    fn parse_response(body: &str) -> Result<Vec<Detection>, CoreError> {
        let response: WireResponse =
            serde_json::from_str(body).map_err(|e| CoreError::OcrError(format!(
                "OCR 응답 파싱 실패: {} ({})",
                e,
                preview(body)
            )))?;

        let detections = match response {
            WireResponse::Wrapped { detections } | WireResponse::Bare(detections) => detections,
        };
        Ok(detections.into_iter().map(Detection::from).collect())
    }
}

#[async_trait]
impl OcrProvider for RemoteOcrProvider {
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<Detection>, CoreError> {
        if image.is_empty() {
            return Err(CoreError::ImageDecode("빈 이미지 데이터".to_string()));
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let body = serde_json::json!({ "image": encoded });
        let request = authorize(
            self.http_client.post(&self.endpoint).json(&body),
            self.provider_type,
            &self.api_key,
        );

        debug!(bytes = image.len(), "원격 OCR 요청");
        let response_body = send_for_body(request, "remote-ocr")
            .await
            .map_err(|e| match e {
                // 서비스가 이미지를 거부하면 호출자 입력 오류
                CoreError::Provider {
                    status: Some(code),
                    message,
                    ..
                } if (400..500).contains(&code) => CoreError::ImageDecode(message),
                CoreError::Provider { message, .. } => CoreError::OcrError(message),
                other => other,
            })?;

        let detections = Self::parse_response(&response_body)?;
        debug!(count = detections.len(), "원격 OCR 완료");
        Ok(detections)
    }

    fn provider_name(&self) -> &str {
        "remote-ocr"
    }
}
