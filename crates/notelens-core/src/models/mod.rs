//! NoteLens 도메인 모델.
//!
//! OCR 검출 결과, 필터링된 텍스트 조각, 교정 배치/결과 등
//! 파이프라인 전 구간에서 공유하는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod correction;
pub mod detection;
pub mod fragment;
