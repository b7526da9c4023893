//! OCR 제공자 포트.
//!
//! 내장 Tesseract 또는 외부 OCR API를 추상화하는 인터페이스를 정의한다.
//! OCR 엔진 자체는 블랙박스로 취급한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::detection::Detection;

/// OCR 제공자 — 내장(Tesseract) 또는 외부 API
///
/// 구현체: `LocalOcrProvider` (Tesseract), `RemoteOcrProvider` (HTTP OCR 서비스)
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// 이미지 바이트에서 텍스트 영역 검출
    ///
    /// 이미지 디코딩 실패는 `CoreError::ImageDecode`로 반환해야 한다.
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<Detection>, CoreError>;

    /// 제공자 이름 (예: "local-tesseract", "remote-ocr")
    fn provider_name(&self) -> &str;
}
