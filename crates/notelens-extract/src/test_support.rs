//! 테스트용 Mock 포트 구현.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use notelens_core::error::CoreError;
use notelens_core::models::correction::{CorrectionBatch, CorrectionGuess};
use notelens_core::models::detection::Detection;
use notelens_core::ports::correction_provider::CorrectionProvider;
use notelens_core::ports::ocr_provider::OcrProvider;
use notelens_core::ports::text_generator::TextGenerator;

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Healthy,
    Failing,
    Malformed,
}

/// 텍스트를 대문자로 바꿔 돌려주는 교정기
pub struct MockCorrector {
    name: String,
    behavior: Behavior,
    fail_batches: Vec<usize>,
    delay: Option<Duration>,
    extra: usize,
    pub calls: AtomicUsize,
}

impl MockCorrector {
    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            fail_batches: Vec::new(),
            delay: None,
            extra: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn healthy(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Healthy)
    }

    pub fn failing(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Failing)
    }

    pub fn malformed(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Malformed)
    }

    pub fn failing_batch(mut self, index: usize) -> Self {
        self.fail_batches.push(index);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 배치보다 긴 결과 반환
    pub fn with_extra(mut self, extra: usize) -> Self {
        self.extra = extra;
        self
    }
}

#[async_trait]
impl CorrectionProvider for MockCorrector {
    async fn correct(&self, batch: &CorrectionBatch) -> Result<Vec<CorrectionGuess>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.behavior {
            Behavior::Failing => return Err(CoreError::Network("connection reset".to_string())),
            Behavior::Malformed => {
                return Err(CoreError::Provider {
                    provider: self.name.clone(),
                    status: None,
                    message: "교정 배열 파싱 실패".to_string(),
                })
            }
            Behavior::Healthy => {}
        }

        if self.fail_batches.contains(&batch.index) {
            return Err(CoreError::Network(format!("batch {} failed", batch.index)));
        }

        let mut guesses: Vec<CorrectionGuess> = batch
            .texts
            .iter()
            .map(|t| CorrectionGuess {
                possibility: t.to_uppercase(),
                confidence: 0.9,
            })
            .collect();
        guesses.extend((0..self.extra).map(|i| CorrectionGuess {
            possibility: format!("extra{i}"),
            confidence: 0.1,
        }));
        Ok(guesses)
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}

/// 고정 검출 결과를 돌려주는 OCR
pub struct MockOcr {
    pub detections: Vec<Detection>,
}

#[async_trait]
impl OcrProvider for MockOcr {
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<Detection>, CoreError> {
        if image.is_empty() {
            return Err(CoreError::ImageDecode("빈 이미지 데이터".to_string()));
        }
        Ok(self.detections.clone())
    }

    fn provider_name(&self) -> &str {
        "mock-ocr"
    }
}

/// 받은 프롬프트를 기록하고 고정 응답을 돌려주는 생성기
pub struct MockGenerator {
    pub reply: Result<String, String>,
    pub prompts: std::sync::Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err("upstream down".to_string()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok()?.last().cloned()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CoreError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply
            .clone()
            .map_err(CoreError::ServiceUnavailable)
    }

    fn provider_name(&self) -> &str {
        "mock-generator"
    }
}
