//! 추출 파이프라인 오케스트레이터.
//!
//! OCR → 필터 → 강조 점수 → 배치 → 교정 → 조립 → 정렬.
//! 요청마다 독립적으로 실행되며 요청 간 공유 가변 상태는 없다.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use notelens_core::config::PipelineConfig;
use notelens_core::error::CoreError;
use notelens_core::models::detection::Detection;
use notelens_core::models::fragment::Fragment;
use notelens_core::ports::ocr_provider::OcrProvider;

use crate::assembler::assemble;
use crate::batcher::partition;
use crate::correction::CorrectionClient;
use crate::emphasis::EmphasisScorer;
use crate::filter::FragmentFilter;

// ============================================================
// ExtractionPipeline — 이미지 분석 전체 흐름
// ============================================================

/// 이미지 → 순위가 매겨진 텍스트 조각
pub struct ExtractionPipeline {
    ocr: Arc<dyn OcrProvider>,
    corrector: CorrectionClient,
    filter: FragmentFilter,
    scorer: EmphasisScorer,
    config: PipelineConfig,
}

impl ExtractionPipeline {
    pub fn new(ocr: Arc<dyn OcrProvider>, corrector: CorrectionClient, config: PipelineConfig) -> Self {
        Self {
            ocr,
            corrector,
            filter: FragmentFilter::new(config.filter.clone()),
            scorer: EmphasisScorer::new(config.emphasis),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// OCR 제공자 이름
    pub fn ocr_provider_name(&self) -> &str {
        self.ocr.provider_name()
    }

    /// 이미지 바이트 분석
    ///
    /// 디코딩 실패는 `CoreError::ImageDecode` (클라이언트 오류).
    /// 교정 실패는 에러가 아니며 해당 조각이 교정 없이 반환된다.
    pub async fn analyze(&self, image: &[u8], theme: &str) -> Result<Vec<Fragment>, CoreError> {
        let span = info_span!("analyze", request_id = %Uuid::new_v4(), theme);
        async {
            let start = Instant::now();
            let detections = self.ocr.detect_text(image).await?;
            debug!(
                provider = self.ocr.provider_name(),
                detections = detections.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "OCR 완료"
            );
            Ok::<_, CoreError>(self.process_detections(&detections, theme).await)
        }
        .instrument(span)
        .await
    }

    /// 검출 목록 → 교정·정렬된 조각
    pub async fn process_detections(&self, detections: &[Detection], theme: &str) -> Vec<Fragment> {
        let fragments: Vec<Fragment> = self
            .filter
            .apply(detections)
            .into_iter()
            .map(|d| self.scorer.to_fragment(d))
            .collect();

        let texts: Vec<String> = fragments.iter().map(|f| f.text.clone()).collect();
        let batches = partition(&texts, self.config.batch_size, theme);
        let corrections = self
            .corrector
            .correct_all(&batches, self.config.dispatch)
            .await;

        let result = assemble(&fragments, &corrections, self.config.rank_by_size);

        info!(
            detections = detections.len(),
            kept = fragments.len(),
            batches = batches.len(),
            corrected = result.iter().filter(|f| f.autocorrect.is_some()).count(),
            "이미지 분석 완료"
        );
        result
    }
}
