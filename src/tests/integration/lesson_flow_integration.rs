//! Lesson Flow Integration Tests
//!
//! Controller, session and autosuggestion working together over a stub
//! gateway, on a paused clock:
//! - single generation in flight, failure handling, previous content kept
//! - debounced curriculum prefill and fill-only-if-empty
//! - stale prefill results are discarded

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::{SchoolConfig, SuggestConfig};
use crate::core::lesson::{
    AutoSuggest, FormField, ImageRef, LessonAssistant, PrefillOutcome, SessionHandle,
    SubmitOutcome, SubmitRejection, GENERATION_FAILED_MESSAGE,
};
use crate::core::lesson::{GenerationSession, LessonPlanRequest};
use crate::tests::common::{controller_sharing, StubAssistant};

fn count(counter: &std::sync::atomic::AtomicUsize) -> usize {
    StubAssistant::calls(counter)
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_only_one_generation_in_flight() {
    let stub = Arc::new(StubAssistant::new().with_delay(Duration::from_secs(2)));
    let controller = controller_sharing(&stub);
    controller.update_field(FormField::Material, "Pecahan Senilai");

    let (first, second) = tokio::join!(controller.submit(), controller.submit());

    assert_eq!(first, SubmitOutcome::Completed);
    assert_eq!(
        second,
        SubmitOutcome::Rejected(SubmitRejection::AlreadyGenerating)
    );
    assert_eq!(count(&stub.content_calls), 1);
    assert_eq!(count(&stub.image_calls), 1);

    let session = controller.snapshot();
    assert!(!session.generating);
    assert!(session.content.is_some());
    assert!(matches!(session.image, Some(ImageRef::Inline(_))));
}

#[tokio::test(start_paused = true)]
async fn test_blank_material_is_rejected_without_calls() {
    let stub = Arc::new(StubAssistant::new());
    let controller = controller_sharing(&stub);
    controller.update_field(FormField::Material, "   ");

    let outcome = controller.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(SubmitRejection::MissingMaterial)
    );
    assert_eq!(count(&stub.content_calls), 0);
    assert!(!controller.snapshot().generating);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_previous_content() {
    let stub = Arc::new(StubAssistant::new());
    let controller = controller_sharing(&stub);
    controller.update_field(FormField::Material, "Pecahan Senilai");

    assert_eq!(controller.submit().await, SubmitOutcome::Completed);
    let previous = controller.snapshot().content;

    stub.set_content_fails(true);
    assert_eq!(controller.submit().await, SubmitOutcome::Failed);

    let session = controller.snapshot();
    assert_eq!(session.error.as_deref(), Some(GENERATION_FAILED_MESSAGE));
    assert!(!session.generating);
    assert_eq!(session.content, previous);

    // A later success clears the error
    stub.set_content_fails(false);
    assert_eq!(controller.submit().await, SubmitOutcome::Completed);
    assert!(controller.snapshot().error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_image_failure_uses_placeholder() {
    let stub = Arc::new(StubAssistant::new().failing_image());
    let controller = controller_sharing(&stub);
    controller.update_field(FormField::Material, "Pecahan Senilai");

    assert_eq!(controller.submit().await, SubmitOutcome::Completed);
    assert_eq!(
        controller.snapshot().image,
        Some(ImageRef::placeholder("Pecahan Senilai"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_background_submit_reports_outcome() {
    let stub = Arc::new(StubAssistant::new().with_delay(Duration::from_millis(500)));
    let controller = controller_sharing(&stub);
    controller.update_field(FormField::Material, "Pecahan Senilai");

    let handle = controller.submit_in_background().unwrap();
    tokio::task::yield_now().await;
    assert!(controller.snapshot().generating);

    assert_eq!(handle.await.unwrap(), SubmitOutcome::Completed);
    assert!(!controller.snapshot().generating);
}

// =============================================================================
// Topics
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_start_loads_topics() {
    let stub = Arc::new(StubAssistant::new());
    let controller = controller_sharing(&stub);

    controller.start();
    sleep(Duration::from_millis(10)).await;

    let session = controller.snapshot();
    assert_eq!(session.topics, stub.topics);
    assert!(!session.fetching_topics);
    assert_eq!(count(&stub.topic_calls), 1);
}

#[tokio::test(start_paused = true)]
async fn test_grade_change_refreshes_topics() {
    let stub = Arc::new(StubAssistant::new());
    let controller = controller_sharing(&stub);

    controller.update_field(FormField::Grade, "Kelas 5");
    sleep(Duration::from_millis(10)).await;

    assert_eq!(count(&stub.topic_calls), 1);
    // Same value again: no refetch
    controller.update_field(FormField::Grade, "Kelas 5");
    sleep(Duration::from_millis(10)).await;
    assert_eq!(count(&stub.topic_calls), 1);
}

// =============================================================================
// Prefill
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_prefill_is_debounced() {
    let stub = Arc::new(StubAssistant::new());
    let controller = controller_sharing(&stub);

    for material in ["Pec", "Pecahan", "Pecahan Se", "Pecahan Seni", "Pecahan Senilai"] {
        controller.update_field(FormField::Material, material);
        sleep(Duration::from_millis(300)).await;
    }
    // 300ms already elapsed since the last edit
    sleep(Duration::from_millis(800)).await;
    assert_eq!(count(&stub.curriculum_calls), 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(count(&stub.curriculum_calls), 1);
    assert_eq!(
        *stub.curriculum_materials.lock().unwrap(),
        vec!["Pecahan Senilai".to_string()]
    );

    let request = controller.snapshot().request;
    assert_eq!(request.cp, "Peserta didik memahami pecahan senilai.");
    assert_eq!(
        request.tp,
        "1. Mengenal pecahan\n2. Membandingkan pecahan\n3. Menyederhanakan pecahan"
    );
    assert_eq!(request.meeting_count, 3);
    assert!(!controller.snapshot().prefilling);
}

#[tokio::test(start_paused = true)]
async fn test_prefill_never_overwrites_typed_fields() {
    let stub = Arc::new(StubAssistant::new());
    let controller = controller_sharing(&stub);

    controller.update_field(FormField::Cp, "CP tulisan guru");
    controller.update_field(FormField::MeetingCount, "4");
    controller.update_field(FormField::Material, "Pecahan Senilai");
    sleep(Duration::from_secs(2)).await;

    let request = controller.snapshot().request;
    assert_eq!(count(&stub.curriculum_calls), 1);
    assert_eq!(request.cp, "CP tulisan guru");
    assert!(request.tp.starts_with("1. Mengenal pecahan"));
    assert_eq!(request.meeting_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_short_material_skips_prefill() {
    let stub = Arc::new(StubAssistant::new());
    let controller = controller_sharing(&stub);

    controller.update_field(FormField::Material, "Data");
    sleep(Duration::from_secs(3)).await;

    assert_eq!(count(&stub.curriculum_calls), 0);
    assert!(controller.snapshot().request.cp.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_prefill_leaves_form_untouched() {
    let stub = Arc::new(StubAssistant::new().failing_curriculum());
    let controller = controller_sharing(&stub);

    controller.update_field(FormField::Material, "Pecahan Senilai");
    sleep(Duration::from_secs(2)).await;

    let session = controller.snapshot();
    assert_eq!(count(&stub.curriculum_calls), 1);
    assert!(session.request.cp.is_empty());
    assert!(session.request.tp.is_empty());
    assert!(!session.prefilling);
    assert!(session.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stale_prefill_result_is_discarded() {
    let stub = Arc::new(StubAssistant::new().with_delay(Duration::from_secs(5)));
    let mut request = LessonPlanRequest::from_school(&SchoolConfig::default());
    request.material = "Pecahan Senilai".to_string();
    let session = SessionHandle::new(GenerationSession::new(request));
    let autosuggest = Arc::new(AutoSuggest::new(
        session.clone(),
        Arc::clone(&stub) as Arc<dyn LessonAssistant>,
        SuggestConfig::default(),
        2,
    ));

    let task = {
        let autosuggest = Arc::clone(&autosuggest);
        tokio::spawn(async move { autosuggest.run_prefill(0).await })
    };
    sleep(Duration::from_millis(100)).await;
    assert!(session.snapshot().prefilling);
    assert_eq!(count(&stub.curriculum_calls), 1);

    autosuggest.cancel();
    assert_eq!(task.await.unwrap(), PrefillOutcome::Stale);

    let after = session.snapshot();
    assert!(after.request.cp.is_empty());
    assert!(after.request.tp.is_empty());
    assert_eq!(after.request.meeting_count, 2);
    assert!(!after.prefilling);
}
