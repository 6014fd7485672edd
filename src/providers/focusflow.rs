//! FocusFlow back-end client.
//!
//! Talks to the AI routes of the FocusFlow API:
//! - `POST /ai/generate` - full completion in one response
//! - `POST /ai/stream`   - completion streamed as Server-Sent Events
//! - `GET  /ai/health`   - capability probe

use async_trait::async_trait;
use nonempty::NonEmpty;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::client::{Client, ClientError, StreamingClient};
use crate::http::{add_extra_headers, authorize, build_http_client, error_from_response};
use crate::model::{GenerateRequest, GenerateResponse, HealthStatus, Message};
use crate::options::{HttpTransport, ModelOptions, TransportOptions};
use crate::source::ResponseSource;

/// FocusFlow client using HTTP transport.
pub struct FocusFlowClient {
    model_options: ModelOptions,
    transport_options: TransportOptions<HttpTransport>,
}

impl FocusFlowClient {
    /// Create a new client with default options.
    pub fn new(
        model_options: ModelOptions,
        transport_options: TransportOptions<HttpTransport>,
    ) -> Self {
        Self {
            model_options,
            transport_options,
        }
    }

    /// Client configured from `FOCUSFLOW_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(
            ModelOptions::default(),
            TransportOptions::new(HttpTransport::from_env()),
        )
    }

    fn endpoint(transport_options: &TransportOptions<HttpTransport>, path: &str) -> String {
        format!("{}{}", transport_options.provider.api_base(), path)
    }

    fn post(
        transport_options: &TransportOptions<HttpTransport>,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let http_client = build_http_client(transport_options)?;
        let provider = &transport_options.provider;

        let req = http_client
            .post(Self::endpoint(transport_options, path))
            .header(CONTENT_TYPE, "application/json");
        let req = authorize(req, provider.credentials.as_ref());
        Ok(add_extra_headers(req, &provider.extra_headers))
    }

    async fn fetch_health(
        transport_options: &TransportOptions<HttpTransport>,
    ) -> Result<HealthStatus, ClientError> {
        let http_client = build_http_client(transport_options)?;
        let provider = &transport_options.provider;

        let req = http_client.get(Self::endpoint(transport_options, "/ai/health"));
        let req = authorize(req, provider.credentials.as_ref());
        let response = add_extra_headers(req, &provider.extra_headers).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }
}

impl Default for FocusFlowClient {
    fn default() -> Self {
        Self::new(
            ModelOptions::default(),
            TransportOptions::new(HttpTransport::default()),
        )
    }
}

#[async_trait]
impl Client for FocusFlowClient {
    type TransportProvider = HttpTransport;

    async fn request(
        messages: NonEmpty<Message>,
        model_options: &ModelOptions,
        transport_options: &TransportOptions<Self::TransportProvider>,
    ) -> Result<GenerateResponse, ClientError> {
        let request_body = GenerateRequest::single(messages, model_options);
        request_body.validate()?;

        let response = Self::post(transport_options, "/ai/generate")?
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = error_from_response(response).await;
            warn!(error = %err, messages = request_body.messages.len(), "AI generate failed");
            return Err(err);
        }

        let body = response.text().await?;
        let generated: GenerateResponse = serde_json::from_str(&body)?;
        debug!(model = %generated.model, chars = generated.content.len(), "AI generate finished");
        Ok(generated)
    }

    async fn probe(transport_options: &TransportOptions<Self::TransportProvider>) -> HealthStatus {
        match Self::fetch_health(transport_options).await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "AI health probe failed, reporting unavailable");
                HealthStatus::unavailable()
            }
        }
    }

    fn new(
        model_options: ModelOptions,
        transport_options: TransportOptions<Self::TransportProvider>,
    ) -> Self {
        Self {
            model_options,
            transport_options,
        }
    }

    fn model_options(&self) -> &ModelOptions {
        &self.model_options
    }

    fn transport_options(&self) -> &TransportOptions<Self::TransportProvider> {
        &self.transport_options
    }
}

#[async_trait]
impl StreamingClient for FocusFlowClient {
    type Source = ResponseSource;

    async fn request_stream(
        request: GenerateRequest,
        transport_options: &TransportOptions<Self::TransportProvider>,
    ) -> Result<Self::Source, ClientError> {
        let request = GenerateRequest {
            stream: true,
            ..request
        };
        request.validate()?;

        let response = Self::post(transport_options, "/ai/stream")?
            .header(ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = error_from_response(response).await;
            warn!(error = %err, messages = request.messages.len(), "AI stream refused");
            return Err(err);
        }
        if matches!(
            response.status(),
            StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT
        ) {
            return Err(ClientError::MissingBody);
        }

        info!(messages = request.messages.len(), model = ?request.model, "AI stream opened");
        Ok(ResponseSource::new(response))
    }
}
