//! 텍스트 조각 모델.
//!
//! 노이즈 필터를 통과한 OCR 검출 결과에 면적·강조 점수와
//! (선택적) 자동 교정 결과를 덧붙인 응답 레코드.

use serde::{Deserialize, Serialize};

use super::correction::CorrectionGuess;

/// 텍스트 조각 (이미지 분석 응답의 한 항목)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// 바운딩 박스 면적 (픽셀², 음수 면적은 0으로 보정됨)
    pub size: i64,
    /// 인식된 텍스트
    pub text: String,
    /// OCR 인식 신뢰도
    pub confidence: f64,
    /// 직렬화된 꼭짓점 목록
    #[serde(rename = "pos")]
    pub position: String,
    /// 강조 점수 — 상대적 순서만 의미가 있음
    pub emphasis: f64,
    /// 자동 교정 결과 (교정 실패/누락 시 없음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocorrect: Option<CorrectionGuess>,
}
