//! DI 와이어링.
//!
//! `AppConfig` + 환경변수 API 키 → 포트 구현체 → `AppState`.
//! 키가 없는 교정/노트 엔드포인트는 경고 후 비활성화한다.

use std::sync::Arc;

use tracing::{info, warn};

use notelens_core::config::{AppConfig, ExternalApiEndpoint, OcrProviderType};
use notelens_core::error::CoreError;
use notelens_core::ports::correction_provider::CorrectionProvider;
use notelens_core::ports::ocr_provider::OcrProvider;
use notelens_core::ports::text_generator::TextGenerator;
use notelens_extract::correction::CorrectionClient;
use notelens_extract::notes::StudyNotesComposer;
use notelens_extract::pipeline::ExtractionPipeline;
use notelens_network::ai_correction_client::RemoteCorrectionProvider;
use notelens_network::ai_ocr_client::RemoteOcrProvider;
use notelens_network::ai_text_client::RemoteTextGenerator;
use notelens_vision::local_ocr_provider::LocalOcrProvider;
use notelens_web::AppState;

/// 기동 시 환경변수/CLI에서 받은 API 키
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub correction: Option<String>,
    pub fallback: Option<String>,
    pub notes: Option<String>,
    pub format: Option<String>,
    pub ocr: Option<String>,
}

fn inject(endpoint: &mut Option<ExternalApiEndpoint>, key: Option<&str>) {
    if let Some(ep) = endpoint.take() {
        *endpoint = Some(ep.with_api_key(key));
    }
}

/// API 키를 설정의 엔드포인트에 주입
pub fn apply_api_keys(config: &mut AppConfig, keys: &ApiKeys) {
    let ai = &mut config.ai_provider;
    inject(&mut ai.correction_api, keys.correction.as_deref());
    inject(&mut ai.correction_fallback_api, keys.fallback.as_deref());
    inject(&mut ai.notes_api, keys.notes.as_deref());
    inject(&mut ai.format_api, keys.format.as_deref());
    inject(&mut ai.ocr_api, keys.ocr.as_deref());
}

/// OCR 제공자 생성
pub fn build_ocr_provider(config: &AppConfig) -> Result<Arc<dyn OcrProvider>, CoreError> {
    match config.ai_provider.ocr_provider {
        OcrProviderType::Local => {
            if !LocalOcrProvider::engine_available() {
                return Err(CoreError::Config(
                    "ocr_provider=Local 이지만 `ocr` feature 없이 빌드됨 (Remote OCR 설정 또는 --features ocr)"
                        .to_string(),
                ));
            }
            info!("로컬 OCR 제공자 사용");
            Ok(Arc::new(LocalOcrProvider::new(&config.vision)))
        }
        OcrProviderType::Remote => {
            let endpoint = config.ai_provider.ocr_api.as_ref().ok_or_else(|| {
                CoreError::Config("ocr_provider=Remote 이지만 ocr_api 미설정".to_string())
            })?;
            info!(endpoint = %endpoint.endpoint, "원격 OCR 제공자 사용");
            Ok(Arc::new(RemoteOcrProvider::new(endpoint)?))
        }
    }
}

fn correction_tier(
    endpoint: Option<&ExternalApiEndpoint>,
    tier: &str,
) -> Option<Arc<dyn CorrectionProvider>> {
    let endpoint = endpoint?;
    if !endpoint.has_api_key() {
        warn!(tier, endpoint = %endpoint.endpoint, "교정 API 키 없음 — 단계 비활성화");
        return None;
    }
    match RemoteCorrectionProvider::new(endpoint) {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            warn!(tier, error = %e, "교정 제공자 생성 실패 — 단계 비활성화");
            None
        }
    }
}

/// 2단계 교정 클라이언트 생성
pub fn build_corrector(config: &AppConfig) -> CorrectionClient {
    let ai = &config.ai_provider;
    CorrectionClient::new(
        correction_tier(ai.correction_api.as_ref(), "primary"),
        correction_tier(ai.correction_fallback_api.as_ref(), "fallback"),
        config.correction_timeout(),
    )
}

fn text_generator(
    endpoint: Option<&ExternalApiEndpoint>,
    purpose: &str,
) -> Option<Arc<dyn TextGenerator>> {
    let endpoint = endpoint?;
    if !endpoint.has_api_key() {
        warn!(purpose, endpoint = %endpoint.endpoint, "생성 API 키 없음 — 비활성화");
        return None;
    }
    match RemoteTextGenerator::new(endpoint) {
        Ok(generator) => Some(Arc::new(generator)),
        Err(e) => {
            warn!(purpose, error = %e, "텍스트 생성기 생성 실패 — 비활성화");
            None
        }
    }
}

/// 노트/포맷 릴레이 생성
pub fn build_notes_composer(config: &AppConfig) -> Result<StudyNotesComposer, CoreError> {
    let ai = &config.ai_provider;
    let template = StudyNotesComposer::load_template(ai.format_template_path.as_deref())?;
    Ok(StudyNotesComposer::new(
        text_generator(ai.notes_api.as_ref(), "notes"),
        text_generator(ai.format_api.as_ref(), "format"),
        template,
    ))
}

/// 웹 서버 상태 전체 조립
pub fn build_state(config: &AppConfig) -> Result<AppState, CoreError> {
    config.validate()?;

    let ocr = build_ocr_provider(config)?;
    let corrector = build_corrector(config);
    if !corrector.is_enabled() {
        warn!("교정 제공자 없음 — 교정 없이 분석 결과만 반환");
    }
    let pipeline = ExtractionPipeline::new(ocr, corrector, config.pipeline.clone());
    let notes = build_notes_composer(config)?;

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        notes: Arc::new(notes),
    })
}
