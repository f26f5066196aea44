//! Form State Manager
//!
//! All mutations of the generation session go through `LessonPlanController`,
//! which enforces the single in-flight generation rule and wires field edits
//! to the autosuggest watchers.

use std::sync::Arc;

use super::autosuggest::AutoSuggest;
use super::gateway::LessonAssistant;
use super::models::{FormField, LessonPlanRequest, Selection, UnknownLabel};
use super::session::{GenerationSession, SessionHandle};
use crate::config::SuggestConfig;

/// Result of a `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Content and illustration stored
    Completed,
    /// Generation failed; the session carries the user-facing message
    Failed,
    /// Nothing was sent
    Rejected(SubmitRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    MissingMaterial,
    AlreadyGenerating,
}

/// Add `value` if absent, remove it if present.
///
/// Insertion keeps the list in enumeration order, so on an ordered list a
/// second toggle restores the original exactly.
pub fn toggle_in<T: Ord>(items: &mut Vec<T>, value: T) {
    if let Some(pos) = items.iter().position(|v| *v == value) {
        items.remove(pos);
    } else {
        let at = items.partition_point(|v| *v < value);
        items.insert(at, value);
    }
}

#[derive(Clone)]
pub struct LessonPlanController {
    session: SessionHandle,
    assistant: Arc<dyn LessonAssistant>,
    autosuggest: Arc<AutoSuggest>,
}

impl LessonPlanController {
    pub fn new(
        assistant: Arc<dyn LessonAssistant>,
        request: LessonPlanRequest,
        suggest: SuggestConfig,
    ) -> Self {
        let default_meeting_count = request.meeting_count;
        let session = SessionHandle::new(GenerationSession::new(request));
        let autosuggest = Arc::new(AutoSuggest::new(
            session.clone(),
            Arc::clone(&assistant),
            suggest,
            default_meeting_count,
        ));
        Self {
            session,
            assistant,
            autosuggest,
        }
    }

    /// Kick off the initial topic fetch.
    pub fn start(&self) {
        self.autosuggest.refresh_topics();
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn snapshot(&self) -> GenerationSession {
        self.session.snapshot()
    }

    pub fn update_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let changed = self.session.update(|s| {
            let before = s.request.field_value(field);
            s.request.set_field(field, value);
            before != s.request.field_value(field)
        });
        if !changed {
            return;
        }

        if field.triggers_topics() {
            self.autosuggest.refresh_topics();
        }
        if field.triggers_prefill() {
            self.autosuggest.schedule_prefill();
        }
    }

    /// Update by camelCase field name, e.g. `"meetingCount"`.
    pub fn update_field_by_name(&self, name: &str, value: impl Into<String>) -> Result<(), UnknownLabel> {
        let field = name.parse::<FormField>()?;
        self.update_field(field, value);
        Ok(())
    }

    pub fn toggle_selection(&self, selection: Selection) {
        self.session.update(|s| match selection {
            Selection::Pedagogy(p) => toggle_in(&mut s.request.pedagogy, p),
            Selection::Dimension(d) => toggle_in(&mut s.request.dimensions, d),
        });
    }

    pub fn is_selected(&self, selection: Selection) -> bool {
        self.session.with(|s| match selection {
            Selection::Pedagogy(p) => s.request.pedagogy.contains(&p),
            Selection::Dimension(d) => s.request.dimensions.contains(&d),
        })
    }

    /// Generate content and illustration concurrently.
    ///
    /// A no-op while the material is blank or another generation is running.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = match self.session.update(|s| {
            if !s.request.is_ready() {
                return Err(SubmitRejection::MissingMaterial);
            }
            if s.generating {
                return Err(SubmitRejection::AlreadyGenerating);
            }
            s.generating = true;
            s.error = None;
            Ok(s.request.clone())
        }) {
            Ok(request) => request,
            Err(reason) => {
                log::debug!("Submit ignored: {reason:?}");
                return SubmitOutcome::Rejected(reason);
            }
        };

        log::info!(
            "Generating lesson plan: {} / {} / \"{}\"",
            request.subject,
            request.grade,
            request.material
        );

        let (content, image) = tokio::join!(
            self.assistant.generate_content(&request),
            self.assistant.generate_illustration(&request.material)
        );

        self.session.update(|s| {
            s.generating = false;
            match content {
                Ok(content) => {
                    s.content = Some(content);
                    s.image = Some(image);
                    s.error = None;
                    SubmitOutcome::Completed
                }
                Err(e) => {
                    log::error!("Lesson plan generation failed: {e}");
                    s.error = Some(e.user_message().to_string());
                    SubmitOutcome::Failed
                }
            }
        })
    }

    /// Spawn `submit` on the current runtime.
    pub fn submit_in_background(&self) -> Option<tokio::task::JoinHandle<SubmitOutcome>> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let this = self.clone();
        Some(runtime.spawn(async move { this.submit().await }))
    }

    pub fn clear_error(&self) {
        self.session.update(|s| s.error = None);
    }
}
