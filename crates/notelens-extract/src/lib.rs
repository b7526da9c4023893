//! # notelens-extract
//!
//! 텍스트 추출 파이프라인.
//! OCR 검출 → 노이즈 필터 → 강조 점수 → 배치 분할 → 2단계 교정
//! → 인덱스 기반 결과 조립 → 면적순 정렬.
//! 노트/포맷 생성 릴레이(`StudyNotesComposer`)도 여기에 둔다.

pub mod assembler;
pub mod batcher;
pub mod correction;
pub mod emphasis;
pub mod filter;
pub mod notes;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;
