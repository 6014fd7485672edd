//! HTTP client utilities for the FocusFlow API.
//!
//! Client construction, header helpers and the mapping from failed
//! responses to user-facing [`ClientError::Status`] messages.

use itertools::Itertools;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::client::ClientError;
use crate::options::{CredentialProvider, HttpTransport, TransportOptions};

/// Build a configured HTTP client from transport options.
pub fn build_http_client(
    transport_options: &TransportOptions<HttpTransport>,
) -> Result<Client, ClientError> {
    let mut builder = Client::builder();

    if let Some(timeout) = transport_options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &transport_options.provider.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| ClientError::Config(format!("invalid proxy {}: {}", proxy_url, e)))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

/// Add extra headers to a request if specified in transport options.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}

/// Attach the bearer token, if the provider has one.
pub fn authorize(request: RequestBuilder, credentials: &dyn CredentialProvider) -> RequestBuilder {
    match credentials.bearer_token() {
        Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret())),
        None => request,
    }
}

/// Fixed message for statuses the back-end does not explain.
pub fn status_message(status: StatusCode) -> Option<&'static str> {
    let message = match status.as_u16() {
        400 => "Request rejected. Check the submitted fields and try again.",
        401 => "Session expired. Please sign in again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested data was not found.",
        409 => "This data already exists. Try a different value.",
        422 => "Some fields are invalid. Correct them and try again.",
        429 => "Too many requests. Wait a moment and try again.",
        500 => "The server is temporarily unavailable. Try again later.",
        503 => "The AI service is temporarily unavailable. Try again later.",
        504 => "The AI request timed out. Try again.",
        _ => return None,
    };
    Some(message)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Turn a non-success response body into a [`ClientError::Status`].
///
/// Prefers the server's `detail` (a string, or a list of validation errors
/// with `msg` fields), then the fixed per-status message, then `HTTP <code>`.
pub fn error_from_body(status: StatusCode, body: &str) -> ClientError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| detail_message(&b.detail));

    let message = detail
        .or_else(|| status_message(status).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    ClientError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Read the body of a failed response and map it with [`error_from_body`].
pub async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, &body)
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|item| match item.get("msg") {
                    Some(Value::String(msg)) => msg.clone(),
                    Some(other) => other.to_string(),
                    None => item.to_string(),
                })
                .join("; "),
        ),
        _ => None,
    }
}
