//! Integration tests for `GeminiClient` using wiremock HTTP mocks.

use hyetaek_gemini::{GeminiClient, GeminiError, Part};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url("test-key", "gemini-2.5-flash", 30, "test-agent", base_url)
        .expect("client construction should not fail")
}

fn candidate(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] }, "finishReason": "STOP" }
        ]
    })
}

#[tokio::test]
async fn generate_json_returns_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("[\"a\"]")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let text = client
        .generate_json(vec![Part::text("hello")])
        .await
        .expect("should return text");

    assert_eq!(text, "[\"a\"]");
}

#[tokio::test]
async fn generate_json_sends_inline_image_as_base64() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(serde_json::json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": "image/jpeg", "data": "AQID" } },
                    { "text": "analyze" }
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let parts = vec![
        Part::inline_image("image/jpeg", &[1, 2, 3]),
        Part::text("analyze"),
    ];
    let text = client.generate_json(parts).await.expect("should return text");
    assert_eq!(text, "{}");
}

#[tokio::test]
async fn generate_json_maps_api_error_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .generate_json(vec![Part::text("x")])
        .await
        .expect_err("should fail");

    match err {
        GeminiError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn generate_json_reports_blocked_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .generate_json(vec![Part::text("x")])
        .await
        .expect_err("should fail");

    assert!(matches!(err, GeminiError::Blocked(reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn generate_json_reports_empty_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .generate_json(vec![Part::text("x")])
        .await
        .expect_err("should fail");

    assert!(matches!(err, GeminiError::EmptyResponse));
}

#[tokio::test]
async fn generate_json_rejects_malformed_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .generate_json(vec![Part::text("x")])
        .await
        .expect_err("should fail");

    assert!(matches!(err, GeminiError::Deserialize { .. }));
}
