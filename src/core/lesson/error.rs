//! Lesson generation errors

use std::time::Duration;

use crate::core::llm::LLMError;

/// The only failure text ever shown to the teacher.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Gagal menghasilkan RPM. Silakan periksa koneksi atau API Key.";

/// Errors from the AI gateway
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("backend error: {0}")]
    Backend(#[from] LLMError),

    #[error("{operation}: response does not match schema: {detail}")]
    Schema {
        operation: &'static str,
        detail: String,
    },

    #[error("{operation}: timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl GenerationError {
    pub fn schema(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::Schema {
            operation,
            detail: detail.into(),
        }
    }

    /// Generic user-facing message; root causes stay in the logs.
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_MESSAGE
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
