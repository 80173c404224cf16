//! HTTP-level tests for the puzzle generation gateway
//!
//! These run the real adapters against a wiremock server, asserting the wire
//! shapes sent to each provider family and that every failure path collapses
//! to the sentinel puzzle.

use emoji_oracle::gateway::google::GoogleAdapter;
use emoji_oracle::gateway::{
    Language, ModelConfig, Provider, ProviderAdapter, PuzzleData, PuzzleGateway, Topic,
};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALIEN_JSON: &str = r#"{"emojis":"🎬👽","answer":"Alien","acceptable_answers":["Alien (1979)"],"hint":"A horror film in space"}"#;

fn alien_puzzle() -> PuzzleData {
    PuzzleData {
        emojis: "🎬👽".to_string(),
        answer: "Alien".to_string(),
        acceptable_answers: vec!["Alien (1979)".to_string()],
        hint: "A horror film in space".to_string(),
    }
}

fn config(server: &MockServer, provider: Provider, api_key: &str) -> ModelConfig {
    let mut config = ModelConfig::for_provider(provider, "test");
    config.api_key = api_key.to_string();
    config.base_url = server.uri();
    config
}

fn gateway() -> PuzzleGateway {
    PuzzleGateway::new(None).expect("gateway construction failed")
}

// ============================================================================
// Chat-completion adapter (openai, deepseek, ollama, groq)
// ============================================================================

#[tokio::test]
async fn test_chat_completion_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": ALIEN_JSON } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let puzzle = gateway()
        .generate_puzzle(
            Topic::Movies,
            Language::En,
            0.7,
            &config(&server, Provider::OpenAi, "test-key"),
        )
        .await;

    assert_eq!(puzzle, alien_puzzle());
}

#[tokio::test]
async fn test_temperature_floor_reaches_the_wire() {
    let server = MockServer::start().await;

    // creativity 0.2 is below the floor, so the body must carry 0.7.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "temperature": 0.7 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": ALIEN_JSON } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let puzzle = gateway()
        .generate_puzzle(
            Topic::Food,
            Language::En,
            0.2,
            &config(&server, Provider::DeepSeek, "k"),
        )
        .await;

    assert!(!puzzle.is_error());
}

#[tokio::test]
async fn test_temperature_above_floor_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "temperature": 0.9 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": ALIEN_JSON } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let puzzle = gateway()
        .generate_puzzle(
            Topic::Food,
            Language::En,
            0.9,
            &config(&server, Provider::Groq, "k"),
        )
        .await;

    assert!(!puzzle.is_error());
}

#[tokio::test]
async fn test_http_401_yields_sentinel_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid API key" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let puzzle = gateway()
        .generate_puzzle(
            Topic::Movies,
            Language::En,
            0.7,
            &config(&server, Provider::OpenAi, "bad-key"),
        )
        .await;

    assert!(puzzle.is_error());
    assert_eq!(puzzle.emojis, "⚠️🤖");
    assert_eq!(puzzle.answer, "Error");
    assert!(puzzle.acceptable_answers.is_empty());
    assert!(puzzle.hint.contains("401"));
}

#[tokio::test]
async fn test_missing_content_yields_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        })))
        .mount(&server)
        .await;

    let puzzle = gateway()
        .generate_puzzle(
            Topic::Animals,
            Language::En,
            0.7,
            &config(&server, Provider::OpenAi, "k"),
        )
        .await;

    assert!(puzzle.is_error());
    assert!(puzzle.hint.contains("No valid response from model"));
}

#[tokio::test]
async fn test_non_json_content_yields_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Sure! Here is a puzzle:" } }]
        })))
        .mount(&server)
        .await;

    let puzzle = gateway()
        .generate_puzzle(
            Topic::Actions,
            Language::En,
            0.7,
            &config(&server, Provider::OpenAi, "k"),
        )
        .await;

    assert!(puzzle.is_error());
}

#[tokio::test]
async fn test_unauthenticated_endpoint_gets_no_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": ALIEN_JSON } }]
        })))
        .mount(&server)
        .await;

    // Ollama-style local endpoint with an empty credential.
    let puzzle = gateway()
        .generate_puzzle(
            Topic::DailyObjects,
            Language::En,
            0.7,
            &config(&server, Provider::Ollama, ""),
        )
        .await;
    assert!(!puzzle.is_error());

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("Authorization"));
}

// ============================================================================
// Anthropic messages adapter
// ============================================================================

#[tokio::test]
async fn test_anthropic_round_trip_with_versioned_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({ "max_tokens": 1024, "temperature": 0.8 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": ALIEN_JSON }],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let puzzle = gateway()
        .generate_puzzle(
            Topic::Movies,
            Language::En,
            0.8,
            &config(&server, Provider::Anthropic, "sk-ant-test"),
        )
        .await;

    assert_eq!(puzzle, alien_puzzle());
}

#[tokio::test]
async fn test_anthropic_server_error_yields_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let puzzle = gateway()
        .generate_puzzle(
            Topic::Movies,
            Language::ZhCn,
            0.7,
            &config(&server, Provider::Anthropic, ""),
        )
        .await;

    assert!(puzzle.is_error());
    assert!(puzzle.hint.contains("529"));
}

// ============================================================================
// Google adapter
// ============================================================================

#[tokio::test]
async fn test_google_round_trip_with_declared_schema() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", "g-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": 0.7
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": ALIEN_JSON }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = GoogleAdapter::new(Client::new(), None).with_endpoint(server.uri());
    let mut config = ModelConfig::for_provider(Provider::Google, "test");
    config.api_key = "g-key".to_string();

    let raw = adapter
        .invoke("prompt", 0.7, &config)
        .await
        .expect("invoke failed");
    let puzzle: PuzzleData = serde_json::from_str(&raw).expect("payload parse failed");
    assert_eq!(puzzle, alien_puzzle());
}

#[tokio::test]
async fn test_google_without_any_credential_yields_sentinel() {
    // Fails during credential resolution, before any network I/O.
    let puzzle = gateway()
        .generate_puzzle(
            Topic::Movies,
            Language::En,
            0.7,
            &ModelConfig::default_gemini(),
        )
        .await;

    assert!(puzzle.is_error());
    assert!(puzzle.hint.contains("API key not configured"));
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_unreachable_endpoint_yields_sentinel() {
    let mut config = ModelConfig::for_provider(Provider::OpenAi, "test");
    config.base_url = "http://127.0.0.1:1".to_string();

    let puzzle = gateway()
        .generate_puzzle(Topic::Movies, Language::En, 0.7, &config)
        .await;

    assert!(puzzle.is_error());
    assert_eq!(puzzle.answer, "Error");
}
