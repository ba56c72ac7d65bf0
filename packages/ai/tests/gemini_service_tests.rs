// ABOUTME: Integration tests for the Gemini client against a mock HTTP server
// ABOUTME: Covers request shape, text extraction, usage, model listing and error surfacing

use codementor_ai::{AIServiceError, GeminiConfig, GeminiService, LanguageModel};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer, api_key: Option<&str>) -> GeminiService {
    GeminiService::new(GeminiConfig {
        api_key: api_key.map(str::to_string),
        model: "gemini-test".to_string(),
        api_base: server.uri(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_generate_sends_prompt_and_reads_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .and(header("x-goog-api-key", "secret"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "review this"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Looks "}, {"text": "good"}]}
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service(&server, Some("secret"));
    let response = service.generate("review this").await.unwrap();

    assert_eq!(response.data, "Looks good");
    assert_eq!(response.usage.input_tokens, 12);
    assert_eq!(response.usage.output_tokens, 3);
    assert_eq!(response.usage.total_tokens(), 15);
    assert_eq!(service.model(), "gemini-test");
}

#[tokio::test]
async fn test_system_instruction_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "be brief"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service =
        service(&server, Some("secret")).with_system_instruction(Some("be brief".to_string()));
    let response = service.generate("hi").await.unwrap();

    assert_eq!(response.data, "ok");
    assert_eq!(response.usage.total_tokens(), 0);
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let result = service(&server, Some("secret")).generate("hi").await;

    match result {
        Err(AIServiceError::ApiError(message)) => {
            assert!(message.contains("429"));
            assert!(message.contains("quota exceeded"));
        }
        other => panic!("expected ApiError, got {:?}", other.map(|r| r.data)),
    }
}

#[tokio::test]
async fn test_blocked_prompt_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let result = service(&server, Some("secret")).generate("hi").await;
    assert!(matches!(result, Err(AIServiceError::ApiError(m)) if m.contains("SAFETY")));
}

#[tokio::test]
async fn test_missing_candidate_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let result = service(&server, Some("secret")).generate("hi").await;
    assert!(matches!(result, Err(AIServiceError::InvalidResponse)));
}

#[tokio::test]
async fn test_missing_api_key_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = service(&server, None).generate("hi").await;
    assert!(matches!(result, Err(AIServiceError::NoApiKey)));
}

#[tokio::test]
async fn test_list_models() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(header("x-goog-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {
                    "name": "models/gemini-2.0-flash",
                    "displayName": "Gemini 2.0 Flash",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {"name": "models/embedding-001"}
            ]
        })))
        .mount(&server)
        .await;

    let models = service(&server, Some("secret")).list_models().await.unwrap();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].display_name.as_deref(), Some("Gemini 2.0 Flash"));
    assert!(models[0]
        .supported_generation_methods
        .contains(&"generateContent".to_string()));
    assert!(models[1].supported_generation_methods.is_empty());
}
