//! 2단계 교정 클라이언트.
//!
//! 1차 제공자 실패(전송 오류, 비정상 상태, 응답 형식 오류, 타임아웃) 시
//! 폴백 제공자로 한 번 재시도한다. 둘 다 실패하면 `CorrectionFailure`.
//! `correct`는 실패를 로그로 남기고 빈 결과로 강등한다.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use notelens_core::config::BatchDispatch;
use notelens_core::error::CoreError;
use notelens_core::models::correction::{CorrectionBatch, CorrectionGuess};
use notelens_core::ports::correction_provider::CorrectionProvider;

/// 교정 제공자 한 단계의 실패
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("응답 시간 초과 ({0:?})")]
    Timeout(Duration),

    #[error("전송 실패: {0}")]
    Transport(String),

    #[error("비정상 응답 상태 {code}: {detail}")]
    Status { code: u16, detail: String },

    #[error("응답 형식 오류: {0}")]
    MalformedResponse(String),

    #[error("제공자 미설정")]
    NotConfigured,
}

impl From<CoreError> for ProviderError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network(msg) => ProviderError::Transport(msg),
            CoreError::RateLimit { retry_after_secs } => ProviderError::Status {
                code: 429,
                detail: format!("retry after {}s", retry_after_secs),
            },
            CoreError::ServiceUnavailable(detail) => ProviderError::Status { code: 503, detail },
            CoreError::Provider {
                status: Some(code),
                message,
                ..
            } => ProviderError::Status {
                code,
                detail: message,
            },
            CoreError::Provider { message, .. } => ProviderError::MalformedResponse(message),
            CoreError::Serialization(e) => ProviderError::MalformedResponse(e.to_string()),
            CoreError::Config(_) => ProviderError::NotConfigured,
            other => ProviderError::Transport(other.to_string()),
        }
    }
}

/// 1차·폴백 모두 실패
#[derive(Debug, Clone, Error, PartialEq)]
#[error("교정 실패 — 1차: {primary}, 폴백: {fallback}")]
pub struct CorrectionFailure {
    pub primary: ProviderError,
    pub fallback: ProviderError,
}

// ============================================================
// CorrectionClient — 1차 → 폴백 교정
// ============================================================

/// 2단계 교정 클라이언트
#[derive(Clone)]
pub struct CorrectionClient {
    primary: Option<Arc<dyn CorrectionProvider>>,
    fallback: Option<Arc<dyn CorrectionProvider>>,
    /// 제공자 호출당 제한 시간
    timeout: Duration,
}

impl CorrectionClient {
    pub fn new(
        primary: Option<Arc<dyn CorrectionProvider>>,
        fallback: Option<Arc<dyn CorrectionProvider>>,
        timeout: Duration,
    ) -> Self {
        Self {
            primary,
            fallback,
            timeout,
        }
    }

    /// 제공자 없이 항상 빈 결과를 내는 클라이언트
    pub fn disabled() -> Self {
        Self::new(None, None, Duration::from_secs(1))
    }

    /// 교정 제공자가 하나라도 설정되어 있는지
    pub fn is_enabled(&self) -> bool {
        self.primary.is_some() || self.fallback.is_some()
    }

    async fn call_tier(
        &self,
        provider: Option<&Arc<dyn CorrectionProvider>>,
        batch: &CorrectionBatch,
    ) -> Result<Vec<CorrectionGuess>, ProviderError> {
        let provider = provider.ok_or(ProviderError::NotConfigured)?;
        match tokio::time::timeout(self.timeout, provider.correct(batch)).await {
            Ok(result) => result.map_err(ProviderError::from),
            Err(_elapsed) => Err(ProviderError::Timeout(self.timeout)),
        }
    }

    /// 1차 → 폴백 순서로 교정 시도
    ///
    /// 결과가 배치보다 길면 배치 길이로 자른다.
    pub async fn try_correct(
        &self,
        batch: &CorrectionBatch,
    ) -> Result<Vec<CorrectionGuess>, CorrectionFailure> {
        let primary = match self.call_tier(self.primary.as_ref(), batch).await {
            Ok(guesses) => return Ok(truncate(guesses, batch)),
            Err(e) => e,
        };

        if primary != ProviderError::NotConfigured {
            warn!(batch = batch.index, error = %primary, "1차 교정 실패, 폴백 시도");
        }

        match self.call_tier(self.fallback.as_ref(), batch).await {
            Ok(guesses) => Ok(truncate(guesses, batch)),
            Err(fallback) => Err(CorrectionFailure { primary, fallback }),
        }
    }

    /// 교정 (실패 시 빈 결과)
    pub async fn correct(&self, batch: &CorrectionBatch) -> Vec<CorrectionGuess> {
        if batch.is_empty() {
            return Vec::new();
        }
        match self.try_correct(batch).await {
            Ok(guesses) => {
                debug!(
                    batch = batch.index,
                    texts = batch.len(),
                    guesses = guesses.len(),
                    "배치 교정 완료"
                );
                guesses
            }
            Err(failure) => {
                warn!(batch = batch.index, error = %failure, "배치 교정 실패 — 교정 없이 진행");
                Vec::new()
            }
        }
    }

    /// 전체 배치 교정, 배치 순서대로 이어 붙인 결과 반환
    ///
    /// - `Sequential`: 한 배치씩 차례로, 빈 배치를 만나면 중단
    /// - `Concurrent`: 모든 배치를 동시에 요청
    pub async fn correct_all(
        &self,
        batches: &[CorrectionBatch],
        mode: BatchDispatch,
    ) -> Vec<CorrectionGuess> {
        let batches: Vec<&CorrectionBatch> =
            batches.iter().take_while(|b| !b.is_empty()).collect();

        match mode {
            BatchDispatch::Sequential => {
                let mut all = Vec::new();
                for batch in batches {
                    all.extend(self.correct(batch).await);
                }
                all
            }
            BatchDispatch::Concurrent => join_all(batches.into_iter().map(|b| self.correct(b)))
                .await
                .into_iter()
                .flatten()
                .collect(),
        }
    }
}

fn truncate(mut guesses: Vec<CorrectionGuess>, batch: &CorrectionBatch) -> Vec<CorrectionGuess> {
    if guesses.len() > batch.len() {
        guesses.truncate(batch.len());
    }
    guesses
}
