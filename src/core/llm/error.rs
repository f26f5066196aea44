//! LLM Error Types
//!
//! Defines error types for calls to the generative model service.

/// Errors that can occur while talking to a generative backend
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response contained no image data")]
    NoImage,

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, LLMError>;
