//! Integration tests against a mock FocusFlow API (WireMock).
//!
//! These cover the HTTP boundary: request shape, authentication, status
//! handling and the full decode/frame/dispatch path over a real response body.

mod generate;
mod streaming;

use focusflow_ai::options::{HttpTransport, ModelOptions, TransportOptions};
use focusflow_ai::providers::FocusFlowClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

/// Client pointed at the mock server's `/api` prefix.
pub fn client_for(server: &MockServer) -> FocusFlowClient {
    FocusFlowClient::new(
        ModelOptions::default(),
        TransportOptions::new(
            HttpTransport::new(TEST_TOKEN).with_base_url(format!("{}/api", server.uri())),
        ),
    )
}

/// Mock for an authenticated call to `path_matcher`.
pub fn mock_with_auth(method_matcher: &str, path_matcher: &str) -> wiremock::MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher))
        .and(header("Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
}

/// 200 response carrying an SSE body.
pub fn sse_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/event-stream")
}
