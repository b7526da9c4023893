//! 텍스트 생성 포트.
//!
//! 학습 노트 작성, 노트→JSON 변환 등 텍스트 입력/텍스트 출력 릴레이.
//! 재시도·폴백 없이 응답 텍스트를 그대로 돌려준다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 텍스트 생성기
///
/// 구현체: `RemoteTextGenerator` (completion / chat 형식)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 프롬프트에 대한 첫 번째 생성 결과 반환
    async fn generate(&self, prompt: &str) -> Result<String, CoreError>;

    /// 제공자 이름 (보통 모델명)
    fn provider_name(&self) -> &str;
}
