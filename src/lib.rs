//! # focusflow-ai - FocusFlow AI chat client
//!
//! Async client for the FocusFlow study assistant API, built around an
//! incremental decoder for the streamed chat completion.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Streaming via Server-Sent Events, delivered fragment by fragment
//! - Chunk-boundary safe: multi-byte characters and events may be split anywhere
//! - Callback or `Result` error delivery, explicit cancellation
//! - Non-streaming generation and a health probe
//!
//! ## Architecture
//!
//! A stream is consumed by one [`StreamSession`](stream::StreamSession) in a
//! single pull loop:
//!
//! 1. **[`decoder`]** turns raw body chunks into text
//! 2. **[`sse`]** frames the text into blank-line delimited events
//! 3. **[`payload`]** classifies each `data: ` event
//! 4. **[`stream`]** dispatches fragments and decides the terminal outcome
//!
//! The [`source`] module abstracts the body being read and guarantees it is
//! released exactly once.
//!
//! ## Example
//! ```no_run
//! use focusflow_ai::client::StreamingClient;
//! use focusflow_ai::model::Message;
//! use focusflow_ai::options::{HttpTransport, ModelOptions, TransportOptions};
//! use focusflow_ai::providers::FocusFlowClient;
//! use focusflow_ai::stream::StreamCallbacks;
//! use nonempty::nonempty;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FocusFlowClient::new(
//!         ModelOptions::default(),
//!         TransportOptions::new(HttpTransport::new("your-token")),
//!     );
//!
//!     let messages = nonempty![Message::user("Explain spaced repetition in two sentences.")];
//!     let callbacks = StreamCallbacks::new(|text| print!("{}", text)).on_complete(|| println!());
//!
//!     client.chat_stream(messages, callbacks).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod decoder;
pub mod http;
pub mod model;
pub mod options;
pub mod payload;
pub mod providers;
pub mod source;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use client::{Client, ClientError, StreamingClient};
pub use model::{GenerateRequest, GenerateResponse, HealthStatus, Message, Role};
pub use stream::{StreamCallbacks, StreamEnd, StreamSession};
