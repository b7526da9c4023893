//! 로컬 OCR 제공자 — Tesseract 래퍼.
//!
//! 업로드 이미지를 디코딩·전처리한 뒤 `OcrExtractor`로 워드를 검출하여
//! `OcrProvider` 트레이트로 노출한다.
//! `ocr` feature 없이 빌드되면 검출 엔진이 없으므로 `CoreError::Config`를 반환한다.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use notelens_core::config::VisionConfig;
use notelens_core::error::CoreError;
use notelens_core::models::detection::Detection;
use notelens_core::ports::ocr_provider::OcrProvider;

use crate::preprocess::Preprocessor;

/// 로컬 OCR 제공자 (Tesseract 기반)
pub struct LocalOcrProvider {
    preprocessor: Preprocessor,
    /// Tesseract 데이터 경로 (ocr feature 비활성화 시 미사용)
    #[allow(dead_code)]
    tessdata_path: Option<PathBuf>,
}

impl LocalOcrProvider {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            preprocessor: Preprocessor::from_config(config),
            tessdata_path: config.tessdata_path.clone(),
        }
    }

    /// Tesseract 엔진이 빌드에 포함되었는지 여부
    pub const fn engine_available() -> bool {
        cfg!(feature = "ocr")
    }
}

impl Default for LocalOcrProvider {
    fn default() -> Self {
        Self::new(&VisionConfig::default())
    }
}

#[async_trait]
impl OcrProvider for LocalOcrProvider {
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<Detection>, CoreError> {
        // 디코딩/리사이즈는 CPU 작업이므로 블로킹 풀에서 실행
        let preprocessor = self.preprocessor.clone();
        let bytes = image.to_vec();
        let prepared = tokio::task::spawn_blocking(move || preprocessor.decode_and_prepare(&bytes))
            .await
            .map_err(|e| CoreError::Internal(format!("전처리 작업 조인 실패: {e}")))??;

        debug!(
            width = prepared.width(),
            height = prepared.height(),
            "OCR 입력 준비 완료"
        );

        #[cfg(feature = "ocr")]
        {
            use crate::ocr::OcrExtractor;

            let extractor = OcrExtractor::new(self.tessdata_path.clone());
            extractor
                .detect_words(prepared)
                .await
                .map_err(|e| CoreError::OcrError(e.to_string()))
        }

        #[cfg(not(feature = "ocr"))]
        {
            let _ = prepared;
            Err(CoreError::Config(
                "로컬 OCR 엔진 없음: `ocr` feature로 빌드해야 함".to_string(),
            ))
        }
    }

    fn provider_name(&self) -> &str {
        "local-tesseract"
    }
}
