//! 노이즈 필터.
//!
//! 작은 글자, 낱글자, 검출이 많은 페이지의 저신뢰 짧은 문자열을 버린다.
//! 판정은 (검출, 전체 검출 수 N)만의 순수 함수다.

use notelens_core::config::FilterConfig;
use notelens_core::models::detection::{Detection, Quad};

/// 0번·2번 꼭짓점 기준 바운딩 박스 면적 (음수/비유한 값은 0)
pub fn bbox_area(quad: &Quad) -> i64 {
    let area = quad.signed_area();
    if area.is_finite() && area > 0.0 {
        // 소수점 이하 버림
        area as i64
    } else {
        0
    }
}

/// 검출 결과 노이즈 필터
#[derive(Debug, Clone, Default)]
pub struct FragmentFilter {
    config: FilterConfig,
}

impl FragmentFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// 버릴 검출인지 판정
    ///
    /// - 면적 < `min_area` 이고 글자 수 < (N mod `length_modulus`) + `length_offset`
    /// - 또는 N > `crowded_count` 이고 글자 수 < `short_text_len` 이고 신뢰도 < `low_confidence`
    pub fn should_discard(&self, detection: &Detection, total: usize) -> bool {
        let c = &self.config;
        let size = bbox_area(&detection.quad);
        let text_len = detection.text.chars().count();

        let length_floor = total
            .checked_rem(c.length_modulus)
            .unwrap_or(total)
            .saturating_add(c.length_offset);
        let small_and_short = size < c.min_area && text_len < length_floor;

        let crowded_noise = total > c.crowded_count
            && text_len < c.short_text_len
            && detection.confidence < c.low_confidence;

        small_and_short || crowded_noise
    }

    /// 살아남은 검출만 원래 순서대로 반환
    pub fn apply<'a>(&self, detections: &'a [Detection]) -> Vec<&'a Detection> {
        let total = detections.len();
        detections
            .iter()
            .filter(|d| !self.should_discard(d, total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notelens_core::models::detection::Point;

    fn quad(points: [(f64, f64); 4]) -> Quad {
        Quad(points.map(|(x, y)| Point::new(x, y)))
    }

    fn det(w: f64, h: f64, text: &str, confidence: f64) -> Detection {
        Detection::new(Quad::from_rect(0.0, 0.0, w, h), text, confidence)
    }

    #[test]
    fn area_uses_diagonal_corners() {
        let q = quad([(0.0, 0.0), (0.0, 0.0), (10.0, 10.0), (10.0, 0.0)]);
        assert_eq!(bbox_area(&q), 100);
        assert_eq!(bbox_area(&Quad::from_rect(5.0, 5.0, 40.0, 30.0)), 1_200);
    }

    #[test]
    fn negative_and_nan_area_clamp_to_zero() {
        let reversed = quad([(10.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        assert_eq!(bbox_area(&reversed), 0);

        let nan = quad([(f64::NAN, 0.0), (0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert_eq!(bbox_area(&nan), 0);
    }

    #[test]
    fn small_cell_quad_is_discarded() {
        // 면적 100, "Cell"(4자) < 10 % 75 + 2 = 12
        let filter = FragmentFilter::default();
        let d = Detection::new(
            quad([(0.0, 0.0), (0.0, 0.0), (10.0, 10.0), (10.0, 0.0)]),
            "Cell",
            0.9,
        );
        assert!(filter.should_discard(&d, 10));
    }

    #[test]
    fn large_area_is_kept_regardless_of_length() {
        let filter = FragmentFilter::default();
        assert!(!filter.should_discard(&det(100.0, 20.0, "a", 0.9), 10));
    }

    #[test]
    fn small_but_long_text_is_kept() {
        // N=3 → 임계 5자
        let filter = FragmentFilter::default();
        assert!(!filter.should_discard(&det(10.0, 10.0, "mitosis", 0.9), 3));
        assert!(filter.should_discard(&det(10.0, 10.0, "cell", 0.9), 3));
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        // "세포막" 3자 (9바이트), N=2 → 임계 4자
        let filter = FragmentFilter::default();
        assert!(filter.should_discard(&det(10.0, 10.0, "세포막", 0.9), 2));
    }

    #[test]
    fn crowded_page_drops_short_low_confidence() {
        let filter = FragmentFilter::default();
        let big = det(200.0, 50.0, "abc", 0.1);
        assert!(filter.should_discard(&big, 76));
        // N=75 이면 해당 없음
        assert!(!filter.should_discard(&big, 75));
        // 신뢰도가 충분하면 유지
        assert!(!filter.should_discard(&det(200.0, 50.0, "abc", 0.3), 76));
    }

    #[test]
    fn modulus_wraps_threshold() {
        // N=76 → 76 % 75 + 2 = 3
        let filter = FragmentFilter::default();
        assert!(!filter.should_discard(&det(10.0, 10.0, "abc", 0.9), 76));
        assert!(filter.should_discard(&det(10.0, 10.0, "ab", 0.9), 76));
    }

    #[test]
    fn apply_preserves_order_and_is_pure() {
        let filter = FragmentFilter::default();
        let detections = vec![
            det(100.0, 20.0, "first", 0.9),
            det(1.0, 1.0, "x", 0.9),
            det(100.0, 20.0, "second", 0.9),
        ];
        let kept: Vec<&str> = filter
            .apply(&detections)
            .iter()
            .map(|d| d.text.as_str())
            .collect();
        assert_eq!(kept, vec!["first", "second"]);

        let again: Vec<&str> = filter
            .apply(&detections)
            .iter()
            .map(|d| d.text.as_str())
            .collect();
        assert_eq!(kept, again);
        assert_eq!(detections.len(), 3);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(FragmentFilter::default().apply(&[]).is_empty());
    }

    #[test]
    fn custom_thresholds() {
        let filter = FragmentFilter::new(FilterConfig {
            min_area: 10,
            ..FilterConfig::default()
        });
        assert!(!filter.should_discard(&det(10.0, 10.0, "a", 0.9), 10));
    }
}
