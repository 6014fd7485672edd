//! Integration tests for `POST /ai/generate` and `GET /ai/health`

use super::*;
use focusflow_ai::client::{Client, ClientError};
use focusflow_ai::model::{HealthStatus, Message};
use nonempty::nonempty;
use serde_json::json;
use wiremock::matchers::body_partial_json;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn test_generate_success() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/generate")
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "You are a study assistant."},
                {"role": "user", "content": "Summarise photosynthesis."}
            ],
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "Plants turn light into sugar.",
            "model": "gpt-5-mini",
            "finish_reason": "stop"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .chat(nonempty![
            Message::system("You are a study assistant."),
            Message::user("Summarise photosynthesis.")
        ])
        .await
        .unwrap();

    assert_eq!(response.content, "Plants turn light into sugar.");
    assert_eq!(response.model, "gpt-5-mini");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_generate_timeout_status_message() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/generate")
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .chat(nonempty![Message::user("Hi")])
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(504));
    assert_eq!(err.to_string(), "The AI request timed out. Try again.");
}

#[tokio::test]
async fn test_generate_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/generate")
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .chat(nonempty![Message::user("Hi")])
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn test_health_available() {
    let server = MockServer::start().await;
    mock_with_auth("GET", "/api/ai/health")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enabled": true,
            "available": true,
            "default_model": "gpt-5-mini"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).health().await;

    assert!(status.enabled);
    assert!(status.available);
    assert_eq!(status.default_model.as_deref(), Some("gpt-5-mini"));
}

#[tokio::test]
async fn test_health_failure_degrades_to_unavailable() {
    let server = MockServer::start().await;
    mock_with_auth("GET", "/api/ai/health")
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let status = client_for(&server).health().await;

    assert_eq!(status, HealthStatus::unavailable());
}

#[tokio::test]
async fn test_health_garbage_degrades_to_unavailable() {
    let server = MockServer::start().await;
    mock_with_auth("GET", "/api/ai/health")
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let status = client_for(&server).health().await;

    assert_eq!(status, HealthStatus::unavailable());
}
