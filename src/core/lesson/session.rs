//! Generation session state
//!
//! The single mutable record behind the form. Only the controller and the
//! autosuggest orchestrator write to it; views read snapshots.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::gateway::ImageRef;
use super::models::{LessonPlanContent, LessonPlanRequest};

/// Transient state of one lesson plan being edited. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSession {
    pub request: LessonPlanRequest,
    pub content: Option<LessonPlanContent>,
    pub image: Option<ImageRef>,
    /// Advisory topic list for the current subject and grade
    pub topics: Vec<String>,
    pub generating: bool,
    pub prefilling: bool,
    pub fetching_topics: bool,
    /// User-facing error from the last generation attempt
    pub error: Option<String>,
    revision: u64,
}

impl GenerationSession {
    pub fn new(request: LessonPlanRequest) -> Self {
        Self {
            request,
            content: None,
            image: None,
            topics: Vec::new(),
            generating: false,
            prefilling: false,
            fetching_topics: false,
            error: None,
            revision: 0,
        }
    }

    /// Bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_busy(&self) -> bool {
        self.generating || self.prefilling || self.fetching_topics
    }
}

/// Shared handle to the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<GenerationSession>>,
}

impl SessionHandle {
    pub fn new(session: GenerationSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GenerationSession> {
        // A panic elsewhere must not wedge the form
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> GenerationSession {
        self.lock().clone()
    }

    /// Read without cloning the whole session.
    pub fn with<R>(&self, f: impl FnOnce(&GenerationSession) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate and bump the revision.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut GenerationSession) -> R) -> R {
        let mut guard = self.lock();
        let result = f(&mut guard);
        guard.revision += 1;
        result
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }
}
