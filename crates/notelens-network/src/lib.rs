//! # notelens-network
//!
//! 외부 AI 제공자 HTTP 어댑터.
//! 코어 포트(`CorrectionProvider`, `TextGenerator`, `OcrProvider`)를
//! reqwest 기반 클라이언트로 구현한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use notelens_network::ai_correction_client::RemoteCorrectionProvider;
//! use notelens_network::ai_text_client::RemoteTextGenerator;
//!
//! let primary = RemoteCorrectionProvider::new(&config.ai_provider.correction_api.unwrap())?;
//! ```

pub mod ai_correction_client;
pub mod ai_ocr_client;
pub mod ai_text_client;
pub mod provider_http;
