//! 자동 교정 모델.
//!
//! 교정 서비스에 보내는 배치와, 배치 입력에 인덱스로 정렬된 교정 추정값.

use serde::{Deserialize, Deserializer, Serialize};

/// 교정 추정값 — OCR 텍스트가 원래 의도했을 법한 영어 구문
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionGuess {
    /// 추정 구문
    pub possibility: String,
    /// 추정 신뢰도 (0.0 ~ 1.0)
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: f64,
}

/// 모델이 신뢰도를 숫자/문자열/누락 등 제각각으로 돌려주므로 관대하게 파싱
fn lenient_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// 교정 요청 배치 (요청마다 생성, 사용 후 폐기)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionBatch {
    /// 전체 배치 중 순번 (0부터)
    pub index: usize,
    /// 교정할 텍스트 (원래 순서 유지)
    pub texts: Vec<String>,
    /// 교정 힌트로 쓰는 주제
    pub theme: String,
}

impl CorrectionBatch {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_numeric_confidence() {
        let g: CorrectionGuess =
            serde_json::from_str(r#"{"possibility": "Cell wall", "confidence": 0.8}"#).unwrap();
        assert_eq!(g.possibility, "Cell wall");
        assert!((g.confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn guess_string_confidence() {
        let g: CorrectionGuess =
            serde_json::from_str(r#"{"possibility": "Nucleus", "confidence": " 0.65 "}"#).unwrap();
        assert!((g.confidence - 0.65).abs() < f64::EPSILON);
    }

    #[test]
    fn guess_missing_or_null_confidence() {
        let g: CorrectionGuess = serde_json::from_str(r#"{"possibility": "Ribosome"}"#).unwrap();
        assert_eq!(g.confidence, 0.0);

        let g: CorrectionGuess =
            serde_json::from_str(r#"{"possibility": "Ribosome", "confidence": null}"#).unwrap();
        assert_eq!(g.confidence, 0.0);
    }

    #[test]
    fn guess_requires_possibility() {
        let result = serde_json::from_str::<CorrectionGuess>(r#"{"confidence": 0.5}"#);
        assert!(result.is_err());
    }
}
