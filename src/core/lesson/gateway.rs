//! AI Gateway
//!
//! Four one-shot capability calls against the generative backend, each with
//! a declared output schema that the response is validated against.
//! The gateway keeps no state between calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::Instrument;

use super::error::{GenerationError, Result};
use super::models::{CurriculumSuggestion, GraduateDimension, LessonPlanContent, LessonPlanRequest};
use super::parse::extract_json_payload;
use super::{prompts, schema};
use crate::config::{AiConfig, SuggestConfig};
use crate::core::llm::{GenerativeBackend, ImageData, ImageRequest, StructuredRequest};

const ILLUSTRATION_ASPECT_RATIO: &str = "16:9";

// ============================================================================
// Result Types
// ============================================================================

/// Outcome of an advisory call that degrades silently instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion<T> {
    Ready(T),
    Unavailable { reason: String },
}

impl<T: Default> Suggestion<T> {
    /// The value, or its empty default when unavailable.
    pub fn unwrap_or_empty(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::Unavailable { .. } => T::default(),
        }
    }
}

impl<T> Suggestion<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Illustration reference usable directly as an `<img src>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Image bytes produced by the model
    Inline(ImageData),
    /// Deterministic stand-in seeded by the topic
    Placeholder { url: String },
}

impl ImageRef {
    pub fn placeholder(topic: &str) -> Self {
        Self::Placeholder {
            url: format!(
                "https://picsum.photos/seed/{}/800/450",
                urlencoding::encode(topic)
            ),
        }
    }

    pub fn src(&self) -> String {
        match self {
            Self::Inline(data) => data.to_data_url(),
            Self::Placeholder { url } => url.clone(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

// ============================================================================
// Gateway Trait
// ============================================================================

/// The lesson-planning capabilities the form controller depends on.
#[async_trait]
pub trait LessonAssistant: Send + Sync {
    /// Advisory topic list for a subject and grade. Never fails.
    async fn suggest_topics(&self, subject: &str, grade: &str) -> Suggestion<Vec<String>>;

    /// CP/TP/dimension prefill for a topic.
    async fn suggest_curriculum(
        &self,
        subject: &str,
        material: &str,
        grade: &str,
    ) -> Result<CurriculumSuggestion>;

    /// Full lesson plan content.
    async fn generate_content(&self, request: &LessonPlanRequest) -> Result<LessonPlanContent>;

    /// Illustration for the topic. Falls back to a placeholder on any failure.
    async fn generate_illustration(&self, topic: &str) -> ImageRef;
}

/// Models and limits used by the gateway.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub text_model: String,
    pub image_model: String,
    pub suggestion_timeout: Duration,
    pub content_timeout: Duration,
    pub image_timeout: Duration,
    pub max_topics: usize,
}

impl GatewayOptions {
    pub fn from_config(ai: &AiConfig, suggest: &SuggestConfig) -> Self {
        Self {
            text_model: ai.text_model.clone(),
            image_model: ai.image_model.clone(),
            suggestion_timeout: ai.suggestion_timeout(),
            content_timeout: ai.content_timeout(),
            image_timeout: ai.image_timeout(),
            max_topics: suggest.max_topics,
        }
    }
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self::from_config(&AiConfig::default(), &SuggestConfig::default())
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Gateway backed by a `GenerativeBackend`.
pub struct AiGateway {
    backend: Arc<dyn GenerativeBackend>,
    options: GatewayOptions,
}

/// Curriculum response before label validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCurriculum {
    cp: String,
    tp: Vec<String>,
    dimensions: Vec<String>,
    suggested_meetings: i64,
    suggested_pedagogy: Vec<String>,
}

impl AiGateway {
    pub fn new(backend: Arc<dyn GenerativeBackend>, options: GatewayOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    /// Schema-constrained text call bounded by `timeout`, returning the extracted JSON value.
    async fn structured(
        &self,
        operation: &'static str,
        prompt: String,
        response_schema: serde_json::Value,
        timeout: Duration,
    ) -> Result<serde_json::Value> {
        let span = tracing::info_span!("ai_call", operation, model = %self.options.text_model);
        async move {
            let request = StructuredRequest::new(&self.options.text_model, prompt, response_schema);
            let text = tokio::time::timeout(timeout, self.backend.generate_json(request))
                .await
                .map_err(|_| GenerationError::Timeout {
                    operation,
                    after: timeout,
                })??;
            log::debug!("{operation}: received {} bytes", text.len());
            extract_json_payload(&text)
                .ok_or_else(|| GenerationError::schema(operation, "no JSON document in response"))
        }
        .instrument(span)
        .await
    }

    fn validate_curriculum(raw: RawCurriculum) -> Result<CurriculumSuggestion> {
        const OP: &str = "suggest_curriculum";

        let cp = raw.cp.trim().to_string();
        if cp.is_empty() {
            return Err(GenerationError::schema(OP, "cp is empty"));
        }

        let tp: Vec<String> = raw
            .tp
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if tp.len() < 3 {
            return Err(GenerationError::schema(
                OP,
                format!("expected at least 3 learning objectives, got {}", tp.len()),
            ));
        }

        let mut dimensions = Vec::with_capacity(raw.dimensions.len());
        for label in &raw.dimensions {
            let dimension = label
                .parse::<GraduateDimension>()
                .map_err(|e| GenerationError::schema(OP, e.to_string()))?;
            if !dimensions.contains(&dimension) {
                dimensions.push(dimension);
            }
        }
        if dimensions.len() < 3 {
            return Err(GenerationError::schema(
                OP,
                format!("expected at least 3 graduate dimensions, got {}", dimensions.len()),
            ));
        }

        let suggested_meetings = u32::try_from(raw.suggested_meetings)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                GenerationError::schema(
                    OP,
                    format!("suggestedMeetings must be positive, got {}", raw.suggested_meetings),
                )
            })?;

        Ok(CurriculumSuggestion {
            cp,
            tp,
            dimensions,
            suggested_meetings,
            suggested_pedagogy: raw.suggested_pedagogy,
        })
    }
}

#[async_trait]
impl LessonAssistant for AiGateway {
    async fn suggest_topics(&self, subject: &str, grade: &str) -> Suggestion<Vec<String>> {
        let prompt = prompts::topics_prompt(subject, grade, self.options.max_topics);
        let value = match self
            .structured("suggest_topics", prompt, schema::topics_schema(), self.options.suggestion_timeout)
            .await
        {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Topic suggestion unavailable: {e}");
                return Suggestion::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        match serde_json::from_value::<Vec<String>>(value) {
            Ok(topics) => Suggestion::Ready(
                topics
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .take(self.options.max_topics)
                    .collect(),
            ),
            Err(e) => {
                log::warn!("Topic suggestion did not match schema: {e}");
                Suggestion::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn suggest_curriculum(
        &self,
        subject: &str,
        material: &str,
        grade: &str,
    ) -> Result<CurriculumSuggestion> {
        let prompt = prompts::curriculum_prompt(subject, material, grade);
        let value = self
            .structured(
                "suggest_curriculum",
                prompt,
                schema::curriculum_schema(),
                self.options.suggestion_timeout,
            )
            .await?;
        let raw: RawCurriculum = serde_json::from_value(value)
            .map_err(|e| GenerationError::schema("suggest_curriculum", e.to_string()))?;
        Self::validate_curriculum(raw)
    }

    async fn generate_content(&self, request: &LessonPlanRequest) -> Result<LessonPlanContent> {
        let prompt = prompts::content_prompt(request);
        let value = self
            .structured(
                "generate_content",
                prompt,
                schema::content_schema(),
                self.options.content_timeout,
            )
            .await?;
        let content: LessonPlanContent = serde_json::from_value(value)
            .map_err(|e| GenerationError::schema("generate_content", e.to_string()))?;

        if content.meetings.len() != request.meeting_count as usize {
            log::warn!(
                "Requested {} meetings, model returned {}",
                request.meeting_count,
                content.meetings.len()
            );
        }
        log::info!(
            "Generated lesson plan: {} meetings, {} formative questions",
            content.meetings.len(),
            content.formative_questions.len()
        );
        Ok(content)
    }

    async fn generate_illustration(&self, topic: &str) -> ImageRef {
        let span = tracing::info_span!(
            "ai_call",
            operation = "generate_illustration",
            model = %self.options.image_model
        );
        let request = ImageRequest {
            model: self.options.image_model.clone(),
            prompt: prompts::illustration_prompt(topic),
            aspect_ratio: ILLUSTRATION_ASPECT_RATIO.to_string(),
        };
        let timeout = self.options.image_timeout;

        let result = tokio::time::timeout(timeout, self.backend.generate_image(request))
            .instrument(span)
            .await;

        match result {
            Ok(Ok(image)) => ImageRef::Inline(image),
            Ok(Err(e)) => {
                log::warn!("Illustration failed, using placeholder: {e}");
                ImageRef::placeholder(topic)
            }
            Err(_) => {
                log::warn!("Illustration timed out after {timeout:?}, using placeholder");
                ImageRef::placeholder(topic)
            }
        }
    }
}
