//! 교정 제공자 포트.
//!
//! 배치 단위로 OCR 텍스트의 의도된 영어 구문을 추정하는 LLM 인터페이스.
//! 결과는 입력 순서에 인덱스로 정렬되며, 입력보다 짧을 수 있다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::correction::{CorrectionBatch, CorrectionGuess};

/// 교정 제공자 — 1차/폴백 모델 각각이 하나의 구현체
///
/// 구현체: `RemoteCorrectionProvider` (OpenAI 호환, Anthropic 등)
#[async_trait]
pub trait CorrectionProvider: Send + Sync {
    /// 배치의 각 텍스트에 대한 교정 추정값 반환
    async fn correct(&self, batch: &CorrectionBatch) -> Result<Vec<CorrectionGuess>, CoreError>;

    /// 제공자 이름 (보통 모델명)
    fn provider_name(&self) -> &str;
}
