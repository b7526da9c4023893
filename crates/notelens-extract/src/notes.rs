//! 학습 노트 / JSON 포맷 릴레이.
//!
//! 프롬프트만 조립해서 외부 생성기에 넘기고 응답 텍스트를 그대로 돌려준다.
//! 재시도나 폴백은 없다.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use notelens_core::error::CoreError;
use notelens_core::ports::text_generator::TextGenerator;

/// 노트 → JSON 변환 기본 템플릿
pub const DEFAULT_FORMAT_TEMPLATE: &str = r#"Convert the study notes above into JSON with exactly this shape:
{
  "title": "<short title for the notes>",
  "sections": [
    {
      "heading": "<section heading>",
      "points": ["<one key point per entry>"]
    }
  ],
  "key_terms": [
    { "term": "<term>", "definition": "<one sentence definition>" }
  ]
}
Reply with the JSON only."#;

// ============================================================
// StudyNotesComposer
// ============================================================

pub struct StudyNotesComposer {
    notes: Option<Arc<dyn TextGenerator>>,
    format: Option<Arc<dyn TextGenerator>>,
    format_template: String,
}

impl StudyNotesComposer {
    pub fn new(
        notes: Option<Arc<dyn TextGenerator>>,
        format: Option<Arc<dyn TextGenerator>>,
        format_template: String,
    ) -> Self {
        Self {
            notes,
            format,
            format_template,
        }
    }

    /// 포맷 템플릿 로드 (경로 없으면 기본 템플릿)
    pub fn load_template(path: Option<&Path>) -> Result<String, CoreError> {
        let Some(path) = path else {
            return Ok(DEFAULT_FORMAT_TEMPLATE.to_string());
        };
        let template = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("포맷 템플릿 읽기 실패: {}: {}", path.display(), e))
        })?;
        info!("포맷 템플릿 로드: {}", path.display());
        Ok(template)
    }

    /// 학습 노트 프롬프트
    pub fn notes_prompt(topic: &str, description: &str, data: &str) -> String {
        let mut prompt = format!("Write clear, well organized study notes about \"{}\".\n", topic.trim());
        if !description.trim().is_empty() {
            prompt.push_str(&format!("What the notes should cover: {}\n", description.trim()));
        }
        if !data.trim().is_empty() {
            prompt.push_str("Use the following material, which was read from the student's own notes:\n");
            prompt.push_str(data.trim());
            prompt.push('\n');
        }
        prompt.push_str("Use short headings and bullet points.");
        prompt
    }

    /// 포맷 변환 프롬프트 (노트 + 템플릿)
    pub fn format_prompt(&self, notes: &str) -> String {
        format!("{}\n\n{}", notes.trim(), self.format_template)
    }

    /// 학습 노트 생성
    pub async fn generate_notes(
        &self,
        topic: &str,
        description: &str,
        data: &str,
    ) -> Result<String, CoreError> {
        if topic.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "topic".to_string(),
                message: "비어 있음".to_string(),
            });
        }
        let generator = self
            .notes
            .as_ref()
            .ok_or_else(|| CoreError::Config("노트 생성 API 미설정".to_string()))?;

        debug!(provider = generator.provider_name(), topic, "학습 노트 생성 요청");
        generator
            .generate(&Self::notes_prompt(topic, description, data))
            .await
    }

    /// 노트 → JSON 텍스트 변환
    pub async fn generate_json(&self, notes: &str) -> Result<String, CoreError> {
        if notes.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "notes".to_string(),
                message: "비어 있음".to_string(),
            });
        }
        let generator = self
            .format
            .as_ref()
            .ok_or_else(|| CoreError::Config("포맷 변환 API 미설정".to_string()))?;

        debug!(provider = generator.provider_name(), notes_len = notes.len(), "JSON 변환 요청");
        generator.generate(&self.format_prompt(notes)).await
    }
}
