//! Stand-ins for the AI gateway and the PDF rasteriser
//!
//! `StubAssistant` answers every gateway call from canned data, counts calls,
//! and can be told to wait or fail. `FakePdf` writes a marker file instead of
//! shelling out.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::document::{ExportError, PageSetup, PdfRenderer};
use crate::core::lesson::error::Result as GenerationResult;
use crate::core::lesson::{
    CurriculumSuggestion, GenerationError, ImageRef, LessonAssistant, LessonPlanContent,
    LessonPlanRequest, Suggestion,
};
use crate::core::llm::{ImageData, LLMError};

use super::fixtures::{sample_content, sample_suggestion};

// =============================================================================
// Gateway stub
// =============================================================================

pub struct StubAssistant {
    pub topics: Vec<String>,
    /// `None` makes `suggest_curriculum` fail
    pub curriculum: Option<CurriculumSuggestion>,
    pub content_fails: AtomicBool,
    /// `None` stands for a failed image call, answered with the placeholder
    pub image: Option<ImageData>,
    pub delay: Duration,
    pub topic_calls: AtomicUsize,
    pub curriculum_calls: AtomicUsize,
    pub content_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    /// Material of every curriculum call, in order
    pub curriculum_materials: Mutex<Vec<String>>,
}

impl StubAssistant {
    pub fn new() -> Self {
        Self {
            topics: vec!["Pecahan".to_string(), "Bangun Datar".to_string()],
            curriculum: Some(sample_suggestion()),
            content_fails: AtomicBool::new(false),
            image: Some(ImageData {
                mime_type: "image/png".to_string(),
                data: "iVBORw0KGgo=".to_string(),
            }),
            delay: Duration::ZERO,
            topic_calls: AtomicUsize::new(0),
            curriculum_calls: AtomicUsize::new(0),
            content_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            curriculum_materials: Mutex::new(Vec::new()),
        }
    }

    /// Every call waits `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_content(self) -> Self {
        self.set_content_fails(true);
        self
    }

    /// Flip content failures on or off mid-test.
    pub fn set_content_fails(&self, fail: bool) {
        self.content_fails.store(fail, Ordering::SeqCst);
    }

    pub fn failing_curriculum(mut self) -> Self {
        self.curriculum = None;
        self
    }

    pub fn failing_image(mut self) -> Self {
        self.image = None;
        self
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for StubAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LessonAssistant for StubAssistant {
    async fn suggest_topics(&self, _subject: &str, _grade: &str) -> Suggestion<Vec<String>> {
        self.topic_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Suggestion::Ready(self.topics.clone())
    }

    async fn suggest_curriculum(
        &self,
        _subject: &str,
        material: &str,
        _grade: &str,
    ) -> GenerationResult<CurriculumSuggestion> {
        self.curriculum_calls.fetch_add(1, Ordering::SeqCst);
        self.curriculum_materials
            .lock()
            .unwrap()
            .push(material.to_string());
        self.pause().await;
        self.curriculum
            .clone()
            .ok_or_else(|| GenerationError::schema("suggest_curriculum", "stub failure"))
    }

    async fn generate_content(&self, request: &LessonPlanRequest) -> GenerationResult<LessonPlanContent> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.content_fails.load(Ordering::SeqCst) {
            return Err(GenerationError::Backend(LLMError::ApiError {
                status: 500,
                message: "internal".to_string(),
            }));
        }
        Ok(sample_content(request.meeting_count as usize, 10))
    }

    async fn generate_illustration(&self, topic: &str) -> ImageRef {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        match &self.image {
            Some(data) => ImageRef::Inline(data.clone()),
            None => ImageRef::placeholder(topic),
        }
    }
}

// =============================================================================
// PDF stub
// =============================================================================

/// Records each conversion and writes a minimal PDF header to the output.
#[derive(Default)]
pub struct FakePdf {
    pub fail: bool,
    pub rendered: Mutex<Vec<(PathBuf, PathBuf)>>,
}

#[async_trait]
impl PdfRenderer for FakePdf {
    fn is_available(&self) -> bool {
        !self.fail
    }

    async fn render_pdf(&self, html_path: &Path, output: &Path, _page: &PageSetup) -> Result<(), ExportError> {
        if self.fail {
            return Err(ExportError::PdfToolMissing("fake-pdf".to_string()));
        }
        // The staging page must exist while the renderer runs
        assert!(html_path.exists(), "staging html missing");
        tokio::fs::write(output, b"%PDF-1.4\n").await?;
        self.rendered
            .lock()
            .unwrap()
            .push((html_path.to_path_buf(), output.to_path_buf()));
        Ok(())
    }
}
