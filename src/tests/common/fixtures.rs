//! Test Fixtures
//!
//! Sample form input, generated content and curriculum suggestions.

use std::sync::Arc;

use crate::config::{SchoolConfig, SuggestConfig};
use crate::core::lesson::{
    AnswerKey, AnswerOptions, Assessment, CurriculumSuggestion, FormativeQuestion,
    GraduateDimension, LearningStep, LessonPlanContent, LessonPlanController, LessonPlanRequest,
    Meeting, PedagogicalPractice,
};

use super::stubs::StubAssistant;

// =============================================================================
// Form Input
// =============================================================================

/// A filled-in form: Matematika, Kelas 4, Pecahan, two meetings.
pub fn sample_request() -> LessonPlanRequest {
    let mut request = LessonPlanRequest::from_school(&SchoolConfig::default());
    request.subject = "Matematika".to_string();
    request.grade = "Kelas 4".to_string();
    request.material = "Pecahan Senilai".to_string();
    request.cp = "Peserta didik dapat menunjukkan pemahaman pecahan.".to_string();
    request.tp = "1. Mengenal pecahan\n2. Membandingkan pecahan\n3. Menyederhanakan pecahan".to_string();
    request.meeting_count = 2;
    request.pedagogy = vec![PedagogicalPractice::ProjectBased];
    request.dimensions = vec![
        GraduateDimension::CriticalReasoning,
        GraduateDimension::Creativity,
        GraduateDimension::Collaboration,
    ];
    request
}

// =============================================================================
// Generated Content
// =============================================================================

fn learning_step(kind: &str, n: usize) -> LearningStep {
    LearningStep {
        kind: kind.to_string(),
        steps: format!("Langkah {kind} pertemuan {n}\nDiskusi kelompok"),
    }
}

/// Content with `meetings` meetings and `questions` formative questions.
pub fn sample_content(meetings: usize, questions: usize) -> LessonPlanContent {
    const KEYS: [AnswerKey; 4] = [AnswerKey::A, AnswerKey::B, AnswerKey::C, AnswerKey::D];

    LessonPlanContent {
        students: "Murid kelas 4 dengan gaya belajar beragam".to_string(),
        interdisciplinary: "Seni Rupa: membuat pizza pecahan".to_string(),
        partnership: "Orang tua membantu di rumah".to_string(),
        environment: "Ruang kelas dengan pojok baca".to_string(),
        digital_tools: "Video pembelajaran interaktif".to_string(),
        summary: "Pecahan senilai adalah pecahan yang nilainya sama.".to_string(),
        meetings: (1..=meetings)
            .map(|n| Meeting {
                understand: learning_step("Berkesadaran", n),
                apply: learning_step("Bermakna", n),
                reflect: learning_step("Menggembirakan", n),
            })
            .collect(),
        assessments: Assessment {
            initial: "Tanya jawab".to_string(),
            process: "Observasi".to_string(),
            final_: "Tes tertulis".to_string(),
        },
        lkpd: "Warnailah bagian pecahan berikut.".to_string(),
        formative_questions: (1..=questions)
            .map(|n| FormativeQuestion {
                question: format!("Soal nomor {n}?"),
                options: AnswerOptions {
                    a: "1/2".to_string(),
                    b: "2/4".to_string(),
                    c: "3/4".to_string(),
                    d: "4/8".to_string(),
                },
                answer: KEYS[n % KEYS.len()],
            })
            .collect(),
    }
}

/// A valid curriculum suggestion for "Pecahan".
pub fn sample_suggestion() -> CurriculumSuggestion {
    CurriculumSuggestion {
        cp: "Peserta didik memahami pecahan senilai.".to_string(),
        tp: vec![
            "Mengenal pecahan".to_string(),
            "Membandingkan pecahan".to_string(),
            "Menyederhanakan pecahan".to_string(),
        ],
        dimensions: vec![
            GraduateDimension::CriticalReasoning,
            GraduateDimension::Creativity,
            GraduateDimension::Communication,
        ],
        suggested_meetings: 3,
        suggested_pedagogy: vec!["Problem Based Learning (PBL)".to_string()],
    }
}

// =============================================================================
// Controllers
// =============================================================================

/// Controller over a blank form from the default school profile.
pub fn controller_with(assistant: StubAssistant) -> LessonPlanController {
    controller_sharing(&Arc::new(assistant))
}

/// Controller that shares `assistant`, so the test can read its counters.
pub fn controller_sharing(assistant: &Arc<StubAssistant>) -> LessonPlanController {
    LessonPlanController::new(
        Arc::clone(assistant) as Arc<dyn crate::core::lesson::LessonAssistant>,
        LessonPlanRequest::from_school(&SchoolConfig::default()),
        SuggestConfig::default(),
    )
}
