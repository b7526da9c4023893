//! 포트 인터페이스 (trait).
//!
//! 외부 협력자(OCR 엔진, 교정 LLM, 노트 생성 LLM)를 추상화한다.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `notelens-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 모든 async trait은 `async_trait` 매크로를 사용하여
//! object safety를 보장한다.

pub mod correction_provider;
pub mod ocr_provider;
pub mod text_generator;
