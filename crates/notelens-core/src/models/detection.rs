//! OCR 검출 결과 모델.
//!
//! OCR 포트가 반환하는 텍스트 영역(사각형 꼭짓점 4개 + 문자열 + 신뢰도).
//! 생성 이후에는 변경되지 않는다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 이미지 좌표 (픽셀)
///
/// 직렬화 형식은 OCR 엔진 관례를 따라 `[x, y]` 배열이다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// 텍스트 영역 사각형 — 좌상단부터 시계 방향 꼭짓점 4개
///
/// 0번과 2번 꼭짓점이 대각선으로 마주 본다고 가정한다.
/// 회전/역순 좌표가 들어올 수 있으므로 면적은 음수가 될 수 있다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// 축 정렬 바운딩 박스에서 사각형 생성 (Tesseract 워드 박스 등)
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self([
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// 0번·2번 꼭짓점 기준 부호 있는 면적
    pub fn signed_area(&self) -> f64 {
        let [p0, _, p2, _] = self.0;
        (p2.x - p0.x) * (p2.y - p0.y)
    }
}

impl fmt::Display for Quad {
    /// `[[x0, y0], [x1, y1], [x2, y2], [x3, y3]]` 형식
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {}]", p.x, p.y)?;
        }
        write!(f, "]")
    }
}

/// OCR 검출 결과 (제공자 무관 표준 구조)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// 텍스트 영역 꼭짓점
    #[serde(alias = "pos", alias = "box")]
    pub quad: Quad,
    /// 인식된 텍스트
    pub text: String,
    /// 인식 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
}

impl Detection {
    pub fn new(quad: Quad, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_from_rect_area() {
        let quad = Quad::from_rect(10.0, 20.0, 50.0, 30.0);
        assert!((quad.signed_area() - 1_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quad_signed_area_can_be_negative() {
        let quad = Quad([
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 20.0),
            Point::new(10.0, 20.0),
        ]);
        assert!(quad.signed_area() < 0.0);
    }

    #[test]
    fn quad_display_matches_ocr_listing() {
        let quad = Quad([
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ]);
        assert_eq!(quad.to_string(), "[[0, 0], [0, 0], [10, 10], [10, 0]]");
    }

    #[test]
    fn detection_deserializes_nested_pairs() {
        let json = r#"{
            "pos": [[0, 0], [120, 0], [120, 30], [0, 30]],
            "text": "Photosynthesis",
            "confidence": 0.87
        }"#;
        let det: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(det.text, "Photosynthesis");
        assert_eq!(det.quad.0[2], Point::new(120.0, 30.0));
        assert!((det.quad.signed_area() - 3_600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn detection_serializes_quad_as_pairs() {
        let det = Detection::new(Quad::from_rect(0.0, 0.0, 2.0, 1.0), "ab", 0.5);
        let json = serde_json::to_value(&det).unwrap();
        assert_eq!(json["quad"][2], serde_json::json!([2.0, 1.0]));
    }
}
