//! Integration tests for `POST /ai/stream`

use super::*;
use focusflow_ai::client::{ClientError, StreamingClient};
use focusflow_ai::model::Message;
use focusflow_ai::options::ModelOptions;
use focusflow_ai::stream::{StreamCallbacks, StreamEnd};
use nonempty::nonempty;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header};
use wiremock::ResponseTemplate;

#[tokio::test]
async fn test_stream_delivers_fragments_then_completes() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .and(header("Accept", "text/event-stream"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "Hi"}],
            "stream": true
        })))
        .respond_with(sse_response(
            "data: {\"content\":\"Cześć\"}\n\n: keep-alive\n\ndata: {\"content\":\", jak\"}\n\ndata: [DONE]\n\n",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut fragments = Vec::new();
    let mut completed = 0;
    let mut errors = Vec::new();

    let callbacks = StreamCallbacks::new(|text| fragments.push(text.to_string()))
        .on_complete(|| completed += 1)
        .on_error(|e| errors.push(e.to_string()));
    let end = client
        .chat_stream(nonempty![Message::user("Hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Completed);
    assert_eq!(fragments, vec!["Cześć", ", jak"]);
    assert_eq!(completed, 1);
    assert!(errors.is_empty());
}

#[tokio::test]
async fn test_stream_sends_model_and_timeout() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .and(body_partial_json(json!({
            "model": "gpt-5-nano",
            "timeout": 30.0,
            "stream": true
        })))
        .respond_with(sse_response("data: {\"done\":true}\n\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = ModelOptions::default()
        .with_model("gpt-5-nano".to_string())
        .with_timeout(Duration::from_secs(30));

    let end = client
        .chat_stream_with_options(
            nonempty![Message::user("Hi")],
            &options,
            StreamCallbacks::new(|_| {}),
            None,
        )
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Completed);
}

#[tokio::test]
async fn test_stream_implicit_completion_drops_trailing_fragment() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(sse_response("data: {\"content\":\"Y\"}\n\ndata: {\"conte"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut fragments = Vec::new();
    let mut completed = false;

    let callbacks = StreamCallbacks::new(|text| fragments.push(text.to_string()))
        .on_complete(|| completed = true);
    client
        .chat_stream(nonempty![Message::user("Hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(fragments, vec!["Y"]);
    assert!(completed);
}

#[tokio::test]
async fn test_stream_in_band_error_goes_to_handler() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(sse_response(
            "data: {\"content\":\"partial\"}\n\ndata: {\"error\":\"rate limited\"}\n\ndata: [DONE]\n\n",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut fragments = Vec::new();
    let mut completed = false;
    let mut errors = Vec::new();

    let callbacks = StreamCallbacks::new(|text| fragments.push(text.to_string()))
        .on_complete(|| completed = true)
        .on_error(|e| errors.push(e.to_string()));
    let end = client
        .chat_stream(nonempty![Message::user("Hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Failed);
    assert_eq!(fragments, vec!["partial"]);
    assert_eq!(errors, vec!["rate limited"]);
    assert!(!completed);
}

#[tokio::test]
async fn test_stream_refused_without_handler_returns_error() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"detail": "AI request limit exceeded"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .chat_stream(nonempty![Message::user("Hi")], StreamCallbacks::new(|_| {}))
        .await;

    match result {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "AI request limit exceeded");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_refused_with_handler_reports_once() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut errors = Vec::new();
    let mut completed = false;

    let callbacks = StreamCallbacks::new(|_| {})
        .on_complete(|| completed = true)
        .on_error(|e| errors.push(e.status()));
    let end = client
        .chat_stream(nonempty![Message::user("Hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Failed);
    assert_eq!(errors, vec![Some(503)]);
    assert!(!completed);
}

#[tokio::test]
async fn test_stream_no_content_is_missing_body() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .chat_stream(nonempty![Message::user("Hi")], StreamCallbacks::new(|_| {}))
        .await;

    assert!(matches!(result, Err(ClientError::MissingBody)));
}

#[tokio::test]
async fn test_invalid_request_never_reaches_server() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(sse_response("data: [DONE]\n\n"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .chat_stream(nonempty![Message::user("")], StreamCallbacks::new(|_| {}))
        .await;

    assert!(matches!(result, Err(ClientError::Validation(_))));
}

#[tokio::test]
async fn test_cancelled_before_refused_open_is_silent() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();
    token.cancel();
    let mut errors = 0;
    let mut completed = false;

    let callbacks = StreamCallbacks::new(|_| {})
        .on_complete(|| completed = true)
        .on_error(|_| errors += 1);
    let end = client
        .chat_stream_with_options(
            nonempty![Message::user("Hi")],
            &ModelOptions::default(),
            callbacks,
            Some(token),
        )
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Cancelled);
    assert_eq!(errors, 0);
    assert!(!completed);
}

#[tokio::test]
async fn test_cancellation_interrupts_slow_open() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(sse_response("data: [DONE]\n\n").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let end = client
        .chat_stream_with_options(
            nonempty![Message::user("Hi")],
            &ModelOptions::default(),
            StreamCallbacks::new(|_| {}).on_complete(|| panic!("cancelled stream completed")),
            Some(token),
        )
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_cancelled_stream_is_silent() {
    let server = MockServer::start().await;
    mock_with_auth("POST", "/api/ai/stream")
        .respond_with(sse_response("data: {\"content\":\"x\"}\n\ndata: [DONE]\n\n"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();
    token.cancel();
    let mut fragments = 0;
    let mut completed = false;
    let mut failed = false;

    let callbacks = StreamCallbacks::new(|_| fragments += 1)
        .on_complete(|| completed = true)
        .on_error(|_| failed = true);
    let end = client
        .chat_stream_with_options(
            nonempty![Message::user("Hi")],
            &ModelOptions::default(),
            callbacks,
            Some(token),
        )
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Cancelled);
    assert_eq!(fragments, 0);
    assert!(!completed);
    assert!(!failed);
}
