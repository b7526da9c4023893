//! # notelens-vision
//!
//! 업로드 이미지 처리 크레이트.
//! 이미지 디코딩, OCR 전처리(축소·그레이스케일·Otsu 반전 이진화),
//! Tesseract 기반 로컬 OCR 제공자를 담당한다.
//!
//! ## Feature Flags
//!
//! - `ocr`: leptess(Tesseract) 로컬 OCR 활성화

pub mod local_ocr_provider;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod preprocess;
