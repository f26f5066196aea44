//! Gemini Backend Integration Tests
//!
//! The HTTP provider and the gateway against a local mock of the
//! `generateContent` endpoint:
//! - request shape (key header, schema config, image modality)
//! - response extraction (text parts, fenced JSON, inline image data)
//! - status mapping and the image placeholder fallback

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::lesson::{
    AiGateway, AnswerKey, GatewayOptions, GenerationError, ImageRef, LessonAssistant, Suggestion,
};
use crate::core::llm::{
    GenerativeBackend, GoogleProvider, ImageRequest, LLMError, StructuredRequest,
};
use crate::tests::common::{sample_content, sample_request};

const KEY: &str = "AIzaTestKey";
const TEXT_MODEL: &str = "gemini-text-test";
const IMAGE_MODEL: &str = "gemini-image-test";

fn text_path() -> String {
    format!("/v1beta/models/{TEXT_MODEL}:generateContent")
}

fn image_path() -> String {
    format!("/v1beta/models/{IMAGE_MODEL}:generateContent")
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

fn provider(server: &MockServer, key: &str) -> GoogleProvider {
    GoogleProvider::with_base_url(key.to_string(), server.uri(), Duration::from_secs(5)).unwrap()
}

fn gateway(server: &MockServer) -> AiGateway {
    let options = GatewayOptions {
        text_model: TEXT_MODEL.to_string(),
        image_model: IMAGE_MODEL.to_string(),
        suggestion_timeout: Duration::from_secs(5),
        content_timeout: Duration::from_secs(5),
        image_timeout: Duration::from_secs(5),
        max_topics: 3,
    };
    AiGateway::new(Arc::new(provider(server, KEY)), options)
}

// =============================================================================
// Provider
// =============================================================================

#[tokio::test]
async fn test_json_request_carries_key_and_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(text_path()))
        .and(header("x-goog-api-key", KEY))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "ARRAY" }
            }
        })))
        .respond_with(text_response("[\"Pecahan\"]"))
        .expect(1)
        .mount(&server)
        .await;

    let text = provider(&server, KEY)
        .generate_json(StructuredRequest::new(
            TEXT_MODEL,
            "topik?",
            json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
        ))
        .await
        .unwrap();

    assert_eq!(text, "[\"Pecahan\"]");
}

#[tokio::test]
async fn test_image_request_returns_inline_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(image_path()))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": { "aspectRatio": "16:9" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is your image" },
                { "inlineData": { "mimeType": "image/jpeg", "data": "AAAA" } }
            ] } }]
        })))
        .mount(&server)
        .await;

    let image = provider(&server, KEY)
        .generate_image(ImageRequest {
            model: IMAGE_MODEL.to_string(),
            prompt: "pecahan".to_string(),
            aspect_ratio: "16:9".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.data, "AAAA");
}

#[tokio::test]
async fn test_status_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(text_path()))
        .respond_with(ResponseTemplate::new(401).set_body_string("API key not valid"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(image_path()))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let p = provider(&server, KEY);
    let err = p
        .generate_json(StructuredRequest::new(TEXT_MODEL, "x", json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::AuthError(ref m) if m.contains("not valid")));

    let err = p
        .generate_image(ImageRequest {
            model: IMAGE_MODEL.to_string(),
            prompt: "x".to_string(),
            aspect_ratio: "16:9".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::RateLimited { retry_after_secs: 7 }));
}

#[tokio::test]
async fn test_missing_key_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server, "   ")
        .generate_json(StructuredRequest::new(TEXT_MODEL, "x", json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::NotConfigured(_)));
}

// =============================================================================
// Gateway over HTTP
// =============================================================================

#[tokio::test]
async fn test_topics_from_fenced_response_are_capped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(text_path()))
        .respond_with(text_response(
            "```json\n[\"Pecahan\", \" \", \"Bangun Datar\", \"Pengukuran\", \"Data\"]\n```",
        ))
        .mount(&server)
        .await;

    let topics = gateway(&server).suggest_topics("Matematika", "Kelas 4").await;
    assert_eq!(
        topics,
        Suggestion::Ready(vec![
            "Pecahan".to_string(),
            "Bangun Datar".to_string(),
            "Pengukuran".to_string()
        ])
    );
}

#[tokio::test]
async fn test_topics_unavailable_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let topics = gateway(&server).suggest_topics("Matematika", "Kelas 4").await;
    assert!(!topics.is_ready());
    assert!(topics.unwrap_or_empty().is_empty());
}

#[tokio::test]
async fn test_curriculum_with_too_few_objectives_is_rejected() {
    let server = MockServer::start().await;
    let body = json!({
        "cp": "CP",
        "tp": ["satu", "dua"],
        "dimensions": ["Kreativitas", "Kolaborasi", "Komunikasi"],
        "suggestedMeetings": 2,
        "suggestedPedagogy": []
    });
    Mock::given(method("POST"))
        .respond_with(text_response(&body.to_string()))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .suggest_curriculum("Matematika", "Pecahan", "Kelas 4")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Schema { .. }));
}

#[tokio::test]
async fn test_content_parses_lenient_answer_keys() {
    let server = MockServer::start().await;
    let mut body = serde_json::to_value(sample_content(2, 10)).unwrap();
    body["formativeQuestions"][0]["answer"] = json!(" b. ");
    Mock::given(method("POST"))
        .and(path(text_path()))
        .respond_with(text_response(&body.to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let content = gateway(&server)
        .generate_content(&sample_request())
        .await
        .unwrap();
    assert_eq!(content.meetings.len(), 2);
    assert_eq!(content.formative_questions.len(), 10);
    assert_eq!(content.formative_questions[0].answer, AnswerKey::B);
}

#[tokio::test]
async fn test_illustration_falls_back_to_placeholder() {
    let server = MockServer::start().await;
    // Text only, no inline image part
    Mock::given(method("POST"))
        .and(path(image_path()))
        .respond_with(text_response("sorry"))
        .mount(&server)
        .await;

    let image = gateway(&server).generate_illustration("Pecahan Senilai").await;
    assert_eq!(image, ImageRef::placeholder("Pecahan Senilai"));
    assert!(image.src().ends_with("/Pecahan%20Senilai/800/450"));
}
