//! 강조 점수.
//!
//! 바운딩 박스 면적에서 강조 점수를 계산하고 검출을 `Fragment`로 만든다.
//! 점수 값 자체는 의미가 없고 상대 순서만 의미가 있다.

use notelens_core::config::EmphasisPolicy;
use notelens_core::models::detection::Detection;
use notelens_core::models::fragment::Fragment;

use crate::filter::bbox_area;

/// 정규화 계수 (면적 → 점수)
pub const NORMALIZED_SCALE: f64 = 0.00003;

#[derive(Debug, Clone, Copy, Default)]
pub struct EmphasisScorer {
    policy: EmphasisPolicy,
}

impl EmphasisScorer {
    pub fn new(policy: EmphasisPolicy) -> Self {
        Self { policy }
    }

    pub fn score(&self, size: i64) -> f64 {
        match self.policy {
            EmphasisPolicy::RawArea => size as f64,
            EmphasisPolicy::Normalized => size as f64 * NORMALIZED_SCALE,
        }
    }

    /// 필터를 통과한 검출 → 교정 전 `Fragment`
    pub fn to_fragment(&self, detection: &Detection) -> Fragment {
        let size = bbox_area(&detection.quad);
        Fragment {
            size,
            text: detection.text.clone(),
            confidence: detection.confidence,
            position: detection.quad.to_string(),
            emphasis: self.score(size),
            autocorrect: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notelens_core::models::detection::Quad;

    #[test]
    fn raw_area_is_identity() {
        assert_eq!(EmphasisScorer::new(EmphasisPolicy::RawArea).score(4_000), 4_000.0);
    }

    #[test]
    fn normalized_preserves_order() {
        let scorer = EmphasisScorer::default();
        assert!((scorer.score(10_000) - 0.3).abs() < 1e-12);
        assert!(scorer.score(4_000) > scorer.score(200));
    }

    #[test]
    fn fragment_carries_detection_fields() {
        let det = Detection::new(Quad::from_rect(0.0, 0.0, 40.0, 30.0), "Osmosis", 0.7);
        let fragment = EmphasisScorer::new(EmphasisPolicy::RawArea).to_fragment(&det);
        assert_eq!(fragment.size, 1_200);
        assert_eq!(fragment.text, "Osmosis");
        assert_eq!(fragment.emphasis, 1_200.0);
        assert_eq!(fragment.position, "[[0, 0], [40, 0], [40, 30], [0, 30]]");
        assert!(fragment.autocorrect.is_none());
    }
}
