//! Autosuggestion Orchestrator
//!
//! Two background watchers over the session:
//!
//! - topic list: refreshed whenever subject or grade changes, advisory only
//! - curriculum prefill: debounced after edits to material, subject or grade,
//!   filling CP/TP (and the default meeting count) only where still empty
//!
//! Every request carries a token from a monotonically increasing counter and
//! its result is applied only while that token is still the latest one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::gateway::{LessonAssistant, Suggestion};
use super::models::{CurriculumSuggestion, LessonPlanRequest};
use super::session::SessionHandle;
use crate::config::SuggestConfig;

/// What a prefill cycle ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefillOutcome {
    /// Suggestion merged into the form
    Applied,
    /// Preconditions did not hold, no call made
    NotNeeded,
    /// A newer cycle started; result discarded
    Stale,
    /// Call failed; form left untouched
    Unavailable,
}

/// Merge a curriculum suggestion without overwriting anything the teacher typed.
///
/// CP and TP are filled only when blank, TP as numbered lines. The meeting
/// count is replaced only while it still equals `default_meeting_count`.
/// Returns whether anything changed.
pub fn apply_curriculum_suggestion(
    request: &mut LessonPlanRequest,
    suggestion: &CurriculumSuggestion,
    default_meeting_count: u32,
) -> bool {
    let mut changed = false;

    if request.cp.trim().is_empty() && !suggestion.cp.trim().is_empty() {
        request.cp = suggestion.cp.clone();
        changed = true;
    }

    if request.tp.trim().is_empty() && !suggestion.tp.is_empty() {
        request.tp = number_objectives(&suggestion.tp);
        changed = true;
    }

    if request.meeting_count == default_meeting_count
        && suggestion.suggested_meetings > 0
        && suggestion.suggested_meetings != request.meeting_count
    {
        request.meeting_count = suggestion.suggested_meetings;
        changed = true;
    }

    changed
}

/// `["Do X", "Do Y"]` → `"1. Do X\n2. Do Y"`
pub fn number_objectives(objectives: &[String]) -> String {
    objectives
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct AutoSuggest {
    session: SessionHandle,
    assistant: Arc<dyn LessonAssistant>,
    config: SuggestConfig,
    default_meeting_count: u32,
    topic_token: AtomicU64,
    prefill_token: AtomicU64,
    pending_prefill: Mutex<Option<JoinHandle<()>>>,
}

impl AutoSuggest {
    pub fn new(
        session: SessionHandle,
        assistant: Arc<dyn LessonAssistant>,
        config: SuggestConfig,
        default_meeting_count: u32,
    ) -> Self {
        Self {
            session,
            assistant,
            config,
            default_meeting_count,
            topic_token: AtomicU64::new(0),
            prefill_token: AtomicU64::new(0),
            pending_prefill: Mutex::new(None),
        }
    }

    // ========================================================================
    // Topic watcher
    // ========================================================================

    /// Fetch topics for the current subject and grade in the background.
    pub fn refresh_topics(self: &Arc<Self>) {
        let Ok(runtime) = Handle::try_current() else {
            log::debug!("No async runtime; skipping topic refresh");
            return;
        };

        let token = self.topic_token.fetch_add(1, Ordering::SeqCst) + 1;
        let (subject, grade) = self.session.update(|s| {
            s.fetching_topics = true;
            (s.request.subject.clone(), s.request.grade.clone())
        });

        let this = Arc::clone(self);
        runtime.spawn(async move {
            this.fetch_topics(token, &subject, &grade).await;
        });
    }

    /// Returns false when the response was superseded and discarded.
    pub(crate) async fn fetch_topics(&self, token: u64, subject: &str, grade: &str) -> bool {
        let suggestion = self.assistant.suggest_topics(subject, grade).await;

        if self.topic_token.load(Ordering::SeqCst) != token {
            log::debug!("Discarding stale topic list for {subject} / {grade}");
            return false;
        }

        self.session.update(|s| {
            s.fetching_topics = false;
            s.topics = match suggestion {
                Suggestion::Ready(topics) => topics,
                Suggestion::Unavailable { reason } => {
                    log::debug!("Topics unavailable: {reason}");
                    Vec::new()
                }
            };
        });
        true
    }

    // ========================================================================
    // Prefill watcher
    // ========================================================================

    /// Restart the debounce timer. The previously scheduled cycle, including
    /// a call already in flight, is aborted.
    pub fn schedule_prefill(self: &Arc<Self>) {
        let Ok(runtime) = Handle::try_current() else {
            log::debug!("No async runtime; skipping curriculum prefill");
            return;
        };

        let token = self.prefill_token.fetch_add(1, Ordering::SeqCst) + 1;
        let mut pending = self
            .pending_prefill
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // A replaced cycle may have exited as stale with the flag still set.
        // The new cycle sets it again only after the debounce.
        if let Some(previous) = pending.take() {
            previous.abort();
            self.session.update(|s| s.prefilling = false);
        }

        let this = Arc::clone(self);
        let debounce = self.config.debounce();
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            let outcome = this.run_prefill(token).await;
            log::debug!("Prefill cycle {token}: {outcome:?}");
        }));
    }

    /// Material must be longer than the threshold and CP or TP still blank.
    fn prefill_wanted(&self, request: &LessonPlanRequest) -> bool {
        request.material.trim().chars().count() > self.config.min_material_chars
            && !request.subject.trim().is_empty()
            && (request.cp.trim().is_empty() || request.tp.trim().is_empty())
    }

    fn is_latest_prefill(&self, token: u64) -> bool {
        self.prefill_token.load(Ordering::SeqCst) == token
    }

    /// One prefill cycle, after the debounce has elapsed.
    pub(crate) async fn run_prefill(&self, token: u64) -> PrefillOutcome {
        let request = self.session.with(|s| s.request.clone());
        if !self.prefill_wanted(&request) {
            return PrefillOutcome::NotNeeded;
        }
        if !self.is_latest_prefill(token) {
            return PrefillOutcome::Stale;
        }

        self.session.update(|s| s.prefilling = true);
        log::info!("Prefilling curriculum for \"{}\"", request.material);

        let result = self
            .assistant
            .suggest_curriculum(&request.subject, &request.material, &request.grade)
            .await;

        if !self.is_latest_prefill(token) {
            return PrefillOutcome::Stale;
        }

        let default_meeting_count = self.default_meeting_count;
        self.session.update(|s| {
            s.prefilling = false;
            match result {
                Ok(suggestion) => {
                    apply_curriculum_suggestion(&mut s.request, &suggestion, default_meeting_count);
                    PrefillOutcome::Applied
                }
                Err(e) => {
                    log::warn!("Curriculum prefill unavailable: {e}");
                    PrefillOutcome::Unavailable
                }
            }
        })
    }

    /// Stop any scheduled or in-flight prefill.
    pub fn cancel(&self) {
        self.prefill_token.fetch_add(1, Ordering::SeqCst);
        let pending = self
            .pending_prefill
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
        self.session.update(|s| s.prefilling = false);
    }
}

impl Drop for AutoSuggest {
    fn drop(&mut self) {
        if let Some(handle) = self
            .pending_prefill
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
