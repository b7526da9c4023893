//! 교정 배치 분할.

use notelens_core::models::correction::CorrectionBatch;

/// 텍스트를 최대 `batch_size`개씩 연속 구간으로 나눈다
///
/// 빈 입력은 배치 0개. `batch_size`가 0이면 1로 취급한다.
pub fn partition(texts: &[String], batch_size: usize, theme: &str) -> Vec<CorrectionBatch> {
    texts
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(index, chunk)| CorrectionBatch {
            index,
            texts: chunk.to_vec(),
            theme: theme.to_string(),
        })
        .collect()
}
