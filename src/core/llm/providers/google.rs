//! Google Provider Implementation (API Key-based)
//!
//! Talks to the Generative Language API `generateContent` endpoint for both
//! schema-constrained JSON text and inline image generation.

use crate::core::llm::error::{LLMError, Result};
use crate::core::llm::provider::GenerativeBackend;
use crate::core::llm::types::{ImageData, ImageRequest, StructuredRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Google provider (API key-based)
pub struct GoogleProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GoogleProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE.to_string(), Duration::from_secs(300))
    }

    /// Provider against a custom endpoint. `timeout` bounds a single HTTP exchange.
    pub fn with_base_url(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        // Trim the API key at construction to ensure consistency with validation
        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn json_body(request: &StructuredRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema
            }
        })
    }

    fn image_body(request: &ImageRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": { "aspectRatio": request.aspect_ratio }
            }
        })
    }

    async fn post(&self, model: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        if self.api_key.is_empty() {
            return Err(LLMError::NotConfigured("missing Gemini API key".to_string()));
        }

        let resp = self
            .client
            .post(self.endpoint(model))
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LLMError::Timeout
                } else {
                    LLMError::HttpError(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after_secs = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            let text = resp.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::AuthError(text),
                StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimited { retry_after_secs },
                _ => LLMError::ApiError {
                    status: status.as_u16(),
                    message: text,
                },
            });
        }

        Ok(resp.json().await?)
    }

    fn first_parts(json: &serde_json::Value) -> Option<&Vec<serde_json::Value>> {
        json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
    }
}

#[async_trait]
impl GenerativeBackend for GoogleProvider {
    fn id(&self) -> &str {
        "google"
    }

    async fn generate_json(&self, request: StructuredRequest) -> Result<String> {
        let body = Self::json_body(&request);
        let json = self.post(&request.model, &body).await?;

        let text = Self::first_parts(&json)
            .and_then(|parts| parts.iter().find_map(|p| p["text"].as_str()))
            .ok_or_else(|| LLMError::InvalidResponse("Missing content".to_string()))?;

        if text.trim().is_empty() {
            return Err(LLMError::InvalidResponse("Empty content".to_string()));
        }

        Ok(text.to_string())
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<ImageData> {
        let body = Self::image_body(&request);
        let json = self.post(&request.model, &body).await?;

        let parts = Self::first_parts(&json).ok_or(LLMError::NoImage)?;
        parts
            .iter()
            .find_map(|p| {
                let inline = p.get("inlineData")?;
                Some(ImageData {
                    mime_type: inline["mimeType"].as_str().unwrap_or("image/png").to_string(),
                    data: inline["data"].as_str()?.to_string(),
                })
            })
            .filter(|img| !img.data.is_empty())
            .ok_or(LLMError::NoImage)
    }
}
