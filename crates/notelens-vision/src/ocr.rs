//! OCR 텍스트 검출 모듈.
//!
//! `leptess` 기반 Tesseract OCR 래퍼 (영어 모델, CPU).
//! `ocr` feature flag 활성화 시에만 빌드된다.
//! Tesseract 호출은 블로킹이므로 `spawn_blocking`에서 실행한다.

use image::GrayImage;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use notelens_core::models::detection::{Detection, Quad};

/// OCR 에러 타입
#[derive(Debug, Error)]
pub enum OcrError {
    /// Tesseract 초기화 실패
    #[error("OCR 초기화 실패: {0}")]
    Init(String),

    /// 이미지 설정 실패
    #[error("OCR 이미지 설정 실패: {0}")]
    ImageSetup(String),

    /// 텍스트 추출 실패
    #[error("OCR 텍스트 추출 실패: {0}")]
    Extraction(String),

    /// 빈 이미지 입력
    #[error("빈 이미지: 너비 또는 높이가 0")]
    EmptyImage,

    /// 비동기 작업 실패
    #[error("OCR 비동기 작업 실패: {0}")]
    Async(String),
}

/// Tesseract 워드 단위 검출기
pub struct OcrExtractor {
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    tessdata_path: Option<PathBuf>,
}

impl OcrExtractor {
    pub fn new(tessdata_path: Option<PathBuf>) -> Self {
        Self { tessdata_path }
    }

    /// 워드 단위 텍스트 + 사각형 + 신뢰도 검출 (비동기)
    ///
    /// 워드 박스마다 인식 영역을 좁혀 다시 인식하므로
    /// 각 검출은 자기 박스의 텍스트와 신뢰도를 가진다.
    pub async fn detect_words(&self, image: GrayImage) -> Result<Vec<Detection>, OcrError> {
        let (w, h) = (image.width(), image.height());
        if w == 0 || h == 0 {
            return Err(OcrError::EmptyImage);
        }

        let tessdata = self
            .tessdata_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());
        let raw_data = image.into_raw();

        tokio::task::spawn_blocking(move || {
            let mut lt = leptess::LepTess::new(tessdata.as_deref(), "eng")
                .map_err(|e| OcrError::Init(format!("{e}")))?;

            // 그레이스케일: 픽셀당 1바이트
            lt.set_image_from_mem(&raw_data, w as i32, h as i32, 1, w as i32)
                .map_err(|_| OcrError::ImageSetup("이미지 메모리 설정 실패".to_string()))?;

            // 글자가 없는 페이지는 박스 자체가 없음
            let Some(boxes) =
                lt.get_component_boxes(leptess::capi::TessPageIteratorLevel_RIL_WORD, true)
            else {
                debug!("Tesseract 워드 박스 없음");
                return Ok(Vec::new());
            };

            let geometries: Vec<_> = boxes.iter().map(|b| b.get_geometry()).collect();
            let mut detections = Vec::with_capacity(geometries.len());
            for geom in geometries {
                lt.set_rectangle(&geom);
                let text = lt
                    .get_utf8_text()
                    .map_err(|e| OcrError::Extraction(format!("{e}")))?;
                let rect = (geom.x, geom.y, geom.w, geom.h);
                if let Some(det) = word_detection(rect, &text, lt.mean_text_conf()) {
                    detections.push(det);
                }
            }

            debug!(count = detections.len(), "Tesseract 워드 검출");
            Ok(detections)
        })
        .await
        .map_err(|e| OcrError::Async(format!("작업 조인 실패: {e}")))?
    }

    /// tessdata 경로 반환
    pub fn tessdata_path(&self) -> Option<&PathBuf> {
        self.tessdata_path.as_ref()
    }
}

/// 박스 하나의 인식 결과 → 검출 (빈 텍스트는 None)
///
/// Tesseract 신뢰도(0~100, 인식 실패 시 음수)를 0~1로 정규화한다.
fn word_detection(rect: (i32, i32, i32, i32), text: &str, mean_conf: i32) -> Option<Detection> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let (x, y, w, h) = rect;
    let confidence = (mean_conf as f64 / 100.0).clamp(0.0, 1.0);
    Some(Detection::new(
        Quad::from_rect(x as f64, y as f64, w as f64, h as f64),
        text,
        confidence,
    ))
}
