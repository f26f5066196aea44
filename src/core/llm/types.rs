//! Backend request/response types

use serde::{Deserialize, Serialize};

/// A text generation request whose answer must conform to a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    pub model: String,
    pub prompt: String,
    /// Response schema in the service's OpenAPI subset (uppercase type names).
    pub schema: serde_json::Value,
}

impl StructuredRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            schema,
        }
    }
}

/// An image generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    /// e.g. "16:9"
    pub aspect_ratio: String,
}

/// Inline image bytes as returned by the service (base64 payload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub mime_type: String,
    pub data: String,
}

impl ImageData {
    /// Self-contained `data:` URL suitable for embedding in HTML.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decoded size in bytes, or `None` if the payload is not valid base64.
    pub fn byte_len(&self) -> Option<usize> {
        use base64::Engine as _;
        base64::engine::general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .ok()
            .map(|bytes| bytes.len())
    }
}
