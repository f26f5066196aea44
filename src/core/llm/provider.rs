//! Generative Backend Trait
//!
//! Defines the interface every generative model backend implements.

use async_trait::async_trait;

use super::error::Result;
use super::types::{ImageData, ImageRequest, StructuredRequest};

/// Remote generative model service.
///
/// Implementations only handle transport and envelope decoding; schema
/// validation of the returned JSON happens in the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Unique identifier for this backend
    fn id(&self) -> &str;

    /// Generate a JSON document for the given prompt and schema.
    /// Returns the raw text of the first candidate.
    async fn generate_json(&self, request: StructuredRequest) -> Result<String>;

    /// Generate a single image. Returns the first inline image part.
    async fn generate_image(&self, request: ImageRequest) -> Result<ImageData>;
}
