//! Lesson Plan Module
//!
//! Domain model, AI gateway, session state and the orchestration around it:
//!
//! - `models`: form input, generated content, fixed enumerations
//! - `schema` / `prompts` / `parse`: what is sent to the model and how answers are read
//! - `gateway`: the four capability calls (`LessonAssistant`, `AiGateway`)
//! - `session` / `controller`: form state and the generation lifecycle
//! - `autosuggest`: topic list and debounced curriculum prefill

pub mod autosuggest;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod models;
pub mod parse;
pub mod prompts;
pub mod schema;
pub mod session;

pub use autosuggest::{apply_curriculum_suggestion, number_objectives, AutoSuggest, PrefillOutcome};
pub use controller::{toggle_in, LessonPlanController, SubmitOutcome, SubmitRejection};
pub use error::{GenerationError, GENERATION_FAILED_MESSAGE};
pub use gateway::{AiGateway, GatewayOptions, ImageRef, LessonAssistant, Suggestion};
pub use models::{
    AnswerKey, AnswerOptions, Assessment, CurriculumSuggestion, FormField, FormativeQuestion,
    GraduateDimension, LearningStep, LessonPlanContent, LessonPlanRequest, Meeting,
    PedagogicalPractice, Selection, UnknownLabel, SD_GRADES, SD_SUBJECTS,
};
pub use session::{GenerationSession, SessionHandle};
