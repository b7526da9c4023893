//! 애플리케이션 설정 구조체.
//!
//! 웹 서버, 이미지 전처리, 추출 파이프라인(필터/배치/교정), AI 제공자 설정을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드하고, API 키는 기동 시
//! 환경변수에서 읽어 명시적으로 주입한다 (전역 상태 없음).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 웹 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 비전(이미지 전처리/OCR) 설정
    #[serde(default)]
    pub vision: VisionConfig,
    /// 추출 파이프라인 설정
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// AI 제공자 설정 (OCR/교정/노트 생성)
    #[serde(default)]
    pub ai_provider: AiProviderConfig,
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// 웹 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 포트 (기본: 5000)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
    /// 요청 본문 최대 크기 (MB) — base64 이미지 업로드 기준
    #[serde(default = "default_max_body_mb")]
    pub max_body_mb: usize,
}

impl WebConfig {
    /// 요청 본문 최대 크기 (bytes)
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
            max_body_mb: default_max_body_mb(),
        }
    }
}

// ============================================================
// 비전 설정
// ============================================================

/// 비전(이미지 전처리) 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// 썸네일 최대 변 길이 (픽셀). 큰 이미지만 축소한다.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// Otsu 이진화(반전) 적용 여부
    #[serde(default = "default_true")]
    pub binarize: bool,
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    #[serde(default)]
    pub tessdata_path: Option<PathBuf>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            binarize: true,
            tessdata_path: None,
        }
    }
}

// ============================================================
// 파이프라인 설정
// ============================================================

/// 강조 점수 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisPolicy {
    /// 면적 그대로 사용
    RawArea,
    /// 면적 × 0.00003
    #[default]
    Normalized,
}

/// 교정 배치 전송 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchDispatch {
    /// 순차 전송 — 앞 배치가 비어 있으면 이후 배치는 요청하지 않음
    Sequential,
    /// 모든 배치 동시 전송 (결과는 배치 순서대로 연결)
    #[default]
    Concurrent,
}

/// 노이즈 필터 임계값
///
/// N = 이미지 하나의 전체 검출 수일 때, 다음 중 하나면 버린다.
/// - `면적 < min_area` 이고 `글자 수 < (N mod length_modulus) + length_offset`
/// - `N > crowded_count` 이고 `글자 수 < short_text_len` 이고 `신뢰도 < low_confidence`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_min_area")]
    pub min_area: i64,
    #[serde(default = "default_length_modulus")]
    pub length_modulus: usize,
    #[serde(default = "default_length_offset")]
    pub length_offset: usize,
    #[serde(default = "default_crowded_count")]
    pub crowded_count: usize,
    #[serde(default = "default_short_text_len")]
    pub short_text_len: usize,
    #[serde(default = "default_low_confidence")]
    pub low_confidence: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_area: default_min_area(),
            length_modulus: default_length_modulus(),
            length_offset: default_length_offset(),
            crowded_count: default_crowded_count(),
            short_text_len: default_short_text_len(),
            low_confidence: default_low_confidence(),
        }
    }
}

/// 추출 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 교정 배치당 최대 텍스트 수
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// 응답을 면적 내림차순으로 정렬할지 여부 (false면 검출 순서 유지)
    #[serde(default = "default_true")]
    pub rank_by_size: bool,
    /// 강조 점수 정책
    #[serde(default)]
    pub emphasis: EmphasisPolicy,
    /// 배치 전송 방식
    #[serde(default)]
    pub dispatch: BatchDispatch,
    /// 교정 제공자 호출 1회당 타임아웃 (초)
    #[serde(default = "default_correction_timeout_secs")]
    pub correction_timeout_secs: u64,
    /// 노이즈 필터 임계값
    #[serde(default)]
    pub filter: FilterConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            rank_by_size: true,
            emphasis: EmphasisPolicy::default(),
            dispatch: BatchDispatch::default(),
            correction_timeout_secs: default_correction_timeout_secs(),
            filter: FilterConfig::default(),
        }
    }
}

// ============================================================
// AI 제공자 설정
// ============================================================

/// OCR 제공자 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OcrProviderType {
    /// 로컬 Tesseract (기본값)
    #[default]
    Local,
    /// 외부 OCR API
    Remote,
}

/// AI API 제공자 타입 — 요청/응답 형식 및 인증 헤더 결정에 사용
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderType {
    /// Anthropic Claude API — `x-api-key` 헤더 + `/v1/messages` 형식
    Anthropic,
    /// OpenAI 호환 API — `Authorization: Bearer` 헤더 + `/v1/chat/completions` 형식
    OpenAi,
    /// Cohere 호환 completion API — `Authorization: Bearer` 헤더 + `/v1/generate` 형식
    Cohere,
    /// 기타 제공자 — OpenAI 호환 요청, 알려진 응답 형식을 모두 시도
    #[default]
    Generic,
}

/// 외부 AI API 엔드포인트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalApiEndpoint {
    /// API URL (예: "https://api.openai.com/v1/chat/completions")
    pub endpoint: String,
    /// API 키 — 설정 파일에는 비워 두고 환경변수로 주입하는 것을 권장
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// 모델 이름 (예: "gpt-4")
    pub model: Option<String>,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
    /// AI 제공자 타입
    #[serde(default)]
    pub provider_type: AiProviderType,
}

impl ExternalApiEndpoint {
    /// OpenAI 호환 chat completion 엔드포인트
    pub fn openai_chat(model: &str) -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: Some(model.to_string()),
            timeout_secs: default_api_timeout_secs(),
            provider_type: AiProviderType::OpenAi,
        }
    }

    /// Cohere 호환 completion 엔드포인트
    pub fn cohere_generate(model: &str) -> Self {
        Self {
            endpoint: "https://api.cohere.ai/v1/generate".to_string(),
            api_key: String::new(),
            model: Some(model.to_string()),
            timeout_secs: default_api_timeout_secs(),
            provider_type: AiProviderType::Cohere,
        }
    }

    /// API 키가 설정되어 있는지 여부
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// API 키 주입 (빈 문자열이면 기존 값 유지)
    pub fn with_api_key(mut self, api_key: Option<&str>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
        self
    }
}

/// AI 제공자 설정 — OCR/교정/노트 생성 엔드포인트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiProviderConfig {
    /// OCR 제공자 타입
    #[serde(default)]
    pub ocr_provider: OcrProviderType,
    /// 외부 OCR API 설정 (ocr_provider=Remote일 때)
    #[serde(default)]
    pub ocr_api: Option<ExternalApiEndpoint>,
    /// 1차 교정 모델
    #[serde(default = "default_correction_api")]
    pub correction_api: Option<ExternalApiEndpoint>,
    /// 1차 실패 시 한 번 재시도할 폴백 교정 모델
    #[serde(default = "default_correction_fallback_api")]
    pub correction_fallback_api: Option<ExternalApiEndpoint>,
    /// 학습 노트 생성 (completion)
    #[serde(default = "default_notes_api")]
    pub notes_api: Option<ExternalApiEndpoint>,
    /// 노트 → JSON 포맷 변환 (chat)
    #[serde(default = "default_format_api")]
    pub format_api: Option<ExternalApiEndpoint>,
    /// 포맷 변환 템플릿 파일 경로 (None이면 내장 템플릿)
    #[serde(default)]
    pub format_template_path: Option<PathBuf>,
}

impl Default for AiProviderConfig {
    fn default() -> Self {
        Self {
            ocr_provider: OcrProviderType::default(),
            ocr_api: None,
            correction_api: default_correction_api(),
            correction_fallback_api: default_correction_fallback_api(),
            notes_api: default_notes_api(),
            format_api: default_format_api(),
            format_template_path: None,
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            web: WebConfig::default(),
            vision: VisionConfig::default(),
            pipeline: PipelineConfig::default(),
            ai_provider: AiProviderConfig::default(),
        }
    }

    /// 교정 호출 타임아웃을 Duration으로 반환
    pub fn correction_timeout(&self) -> Duration {
        Duration::from_secs(self.pipeline.correction_timeout_secs)
    }

    /// 요청 본문 최대 크기 (bytes)
    pub fn max_body_bytes(&self) -> usize {
        self.web.max_body_bytes()
    }

    /// 값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.pipeline.batch_size == 0 {
            return Err(CoreError::Validation {
                field: "pipeline.batch_size".to_string(),
                message: "1 이상이어야 함".to_string(),
            });
        }
        if self.pipeline.filter.length_modulus == 0 {
            return Err(CoreError::Validation {
                field: "pipeline.filter.length_modulus".to_string(),
                message: "1 이상이어야 함".to_string(),
            });
        }
        if self.pipeline.correction_timeout_secs == 0 {
            return Err(CoreError::Validation {
                field: "pipeline.correction_timeout_secs".to_string(),
                message: "1 이상이어야 함".to_string(),
            });
        }
        if self.vision.max_dimension == 0 {
            return Err(CoreError::Validation {
                field: "vision.max_dimension".to_string(),
                message: "1 이상이어야 함".to_string(),
            });
        }
        if self.ai_provider.ocr_provider == OcrProviderType::Remote
            && self.ai_provider.ocr_api.is_none()
        {
            return Err(CoreError::Config(
                "ocr_provider=Remote 이지만 ocr_api 미설정".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_web_port() -> u16 {
    5000
}
fn default_max_body_mb() -> usize {
    20
}
fn default_max_dimension() -> u32 {
    1_500
}
fn default_batch_size() -> usize {
    75
}
fn default_correction_timeout_secs() -> u64 {
    60
}
fn default_min_area() -> i64 {
    1_000
}
fn default_length_modulus() -> usize {
    75
}
fn default_length_offset() -> usize {
    2
}
fn default_crowded_count() -> usize {
    75
}
fn default_short_text_len() -> usize {
    7
}
fn default_low_confidence() -> f64 {
    0.25
}
fn default_api_timeout_secs() -> u64 {
    30
}

fn default_correction_api() -> Option<ExternalApiEndpoint> {
    Some(ExternalApiEndpoint::openai_chat("gpt-4"))
}

fn default_correction_fallback_api() -> Option<ExternalApiEndpoint> {
    Some(ExternalApiEndpoint::openai_chat("gpt-3.5-turbo"))
}

fn default_notes_api() -> Option<ExternalApiEndpoint> {
    Some(ExternalApiEndpoint::cohere_generate("command"))
}

fn default_format_api() -> Option<ExternalApiEndpoint> {
    Some(ExternalApiEndpoint::openai_chat("gpt-3.5-turbo"))
}
