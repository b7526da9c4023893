//! NoteLens 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러 타입에서 `#[from] CoreError`로 래핑하거나
//! `CoreError`를 그대로 반환한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 유효성 검증, 외부 제공자 호출 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 업로드된 이미지 디코딩 실패 (클라이언트 입력 오류)
    #[error("이미지 디코딩 실패: {0}")]
    ImageDecode(String),

    /// OCR 처리 실패
    #[error("OCR 에러: {0}")]
    OcrError(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// Rate Limit 초과 (429)
    #[error("요청 한도 초과, {retry_after_secs}초 후 재시도")]
    RateLimit {
        /// 재시도 대기 시간 (초)
        retry_after_secs: u64,
    },

    /// 서비스 일시 불가 (503)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 외부 AI 제공자 응답 오류 (비정상 상태 코드, 파싱 불가 응답)
    #[error("제공자 에러 ({provider}): {message}")]
    Provider {
        /// 제공자 이름 (모델명 등)
        provider: String,
        /// HTTP 상태 코드 (응답 파싱 실패면 None)
        status: Option<u16>,
        /// 실패 사유
        message: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 호출자 입력이 원인인 에러인지 여부 (HTTP 4xx 매핑용)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::ImageDecode(_) | CoreError::Validation { .. }
        )
    }
}
