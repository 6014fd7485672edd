//! Core client traits and error types.

use async_trait::async_trait;
use nonempty::NonEmpty;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::model::{GenerateRequest, GenerateResponse, HealthStatus, Message};
use crate::options::{ModelOptions, TransportOptions};
use crate::source::ChunkSource;
use crate::stream::{StreamCallbacks, StreamEnd, StreamSession};

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection-level failure: refused, reset, TLS, timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status. `message` is already fit to show a user.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("No response body")]
    MissingBody,

    /// Error reported by the server inside the event stream.
    #[error("{0}")]
    InBand(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Stream cancelled")]
    StreamCancelled,

    #[error("Stream session already finished")]
    SessionFinished,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status behind this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Main client trait for the AI back-end.
///
/// # Required Methods
/// - `request`: Static method that sends a non-streaming request with explicit options
/// - `probe`: Static capability check
/// - `new`, `model_options`, `transport_options`: construction and accessors
///
/// # Provided Methods
/// - `chat`: Uses default options
/// - `chat_with_options`: Overrides model options
/// - `health`: Probe using the stored transport options
#[async_trait]
pub trait Client: Send + Sync + Sized {
    /// Provider-specific transport options type.
    type TransportProvider: Send + Sync;

    /// Send a non-streaming generation request.
    async fn request(
        messages: NonEmpty<Message>,
        model_options: &ModelOptions,
        transport_options: &TransportOptions<Self::TransportProvider>,
    ) -> Result<GenerateResponse, ClientError>;

    /// Ask whether generation is enabled and which model is the default.
    ///
    /// Never fails: any error degrades to [`HealthStatus::unavailable`].
    async fn probe(transport_options: &TransportOptions<Self::TransportProvider>) -> HealthStatus;

    fn new(
        model_options: ModelOptions,
        transport_options: TransportOptions<Self::TransportProvider>,
    ) -> Self;

    fn model_options(&self) -> &ModelOptions;

    fn transport_options(&self) -> &TransportOptions<Self::TransportProvider>;

    async fn chat(&self, messages: NonEmpty<Message>) -> Result<GenerateResponse, ClientError> {
        Self::request(messages, self.model_options(), self.transport_options()).await
    }

    async fn chat_with_options(
        &self,
        messages: NonEmpty<Message>,
        model_options: &ModelOptions,
    ) -> Result<GenerateResponse, ClientError> {
        Self::request(messages, model_options, self.transport_options()).await
    }

    async fn health(&self) -> HealthStatus {
        Self::probe(self.transport_options()).await
    }
}

/// Extension trait for streaming support.
///
/// Implementors only open the stream; decoding, framing and dispatch are
/// shared in [`StreamSession`].
///
/// # Example
/// ```rust,ignore
/// let callbacks = StreamCallbacks::new(|text| print!("{}", text))
///     .on_complete(|| println!())
///     .on_error(|e| eprintln!("{}", e));
///
/// client.chat_stream(messages, callbacks).await?;
/// ```
#[async_trait]
pub trait StreamingClient: Client {
    /// Byte source produced for an open stream.
    type Source: ChunkSource + 'static;

    /// Validate and open the stream. Fails before any chunk if the request
    /// is invalid or the server refuses it.
    async fn request_stream(
        request: GenerateRequest,
        transport_options: &TransportOptions<Self::TransportProvider>,
    ) -> Result<Self::Source, ClientError>;

    /// Stream with default options.
    ///
    /// Errors go to `on_error` when one is set; otherwise they are returned.
    async fn chat_stream(
        &self,
        messages: NonEmpty<Message>,
        callbacks: StreamCallbacks<'_>,
    ) -> Result<StreamEnd, ClientError> {
        self.chat_stream_with_options(messages, self.model_options(), callbacks, None)
            .await
    }

    /// Stream with explicit model options and an optional cancellation token.
    ///
    /// The token is honoured while the stream is being opened as well as
    /// while it is read.
    async fn chat_stream_with_options(
        &self,
        messages: NonEmpty<Message>,
        model_options: &ModelOptions,
        callbacks: StreamCallbacks<'_>,
        cancel: Option<CancellationToken>,
    ) -> Result<StreamEnd, ClientError> {
        let request = GenerateRequest::streaming(messages, model_options);
        let opened = match &cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Ok(StreamEnd::Cancelled),
                    opened = Self::request_stream(request, self.transport_options()) => opened,
                }
            }
            None => Self::request_stream(request, self.transport_options()).await,
        };
        let source = match opened {
            Ok(source) => source,
            Err(_) if cancel.as_ref().is_some_and(|t| t.is_cancelled()) => {
                return Ok(StreamEnd::Cancelled)
            }
            Err(e) => return callbacks.finish(Err(e)),
        };

        let mut session = StreamSession::new();
        if let Some(token) = cancel {
            session = session.with_cancellation(token);
        }
        callbacks.drive(&mut session, source).await
    }
}
