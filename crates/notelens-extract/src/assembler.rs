//! 결과 조립.
//!
//! 이어 붙인 교정 결과를 인덱스 기준으로 조각에 붙이고, 필요하면 면적순 정렬한다.
//! 입력 슬라이스는 건드리지 않고 새 벡터를 반환한다.

use notelens_core::models::correction::CorrectionGuess;
use notelens_core::models::fragment::Fragment;

/// i < min(조각 수, 교정 수) 인 조각에 i번째 교정을 붙인다
pub fn attach_corrections(fragments: &[Fragment], corrections: &[CorrectionGuess]) -> Vec<Fragment> {
    fragments
        .iter()
        .enumerate()
        .map(|(i, fragment)| Fragment {
            autocorrect: corrections.get(i).cloned(),
            ..fragment.clone()
        })
        .collect()
}

/// 면적 내림차순 안정 정렬
pub fn rank_by_size(fragments: &[Fragment]) -> Vec<Fragment> {
    let mut ranked = fragments.to_vec();
    ranked.sort_by(|a, b| b.size.cmp(&a.size));
    ranked
}

/// 교정 부착 후 (선택적으로) 정렬
pub fn assemble(
    fragments: &[Fragment],
    corrections: &[CorrectionGuess],
    rank: bool,
) -> Vec<Fragment> {
    let attached = attach_corrections(fragments, corrections);
    if rank {
        rank_by_size(&attached)
    } else {
        attached
    }
}
