//! Streaming chat example against a running FocusFlow API.
//!
//! Run with:
//! ```bash
//! export FOCUSFLOW_API_BASE="http://localhost:8000/api"
//! export FOCUSFLOW_TOKEN="your-access-token"
//! RUST_LOG=focusflow_ai=debug cargo run --example streaming_chat
//! ```
//!
//! Press Ctrl-C while the answer is streaming to cancel it.

use std::io::Write;

use focusflow_ai::client::{Client, StreamingClient};
use focusflow_ai::model::Message;
use focusflow_ai::options::ModelOptions;
use focusflow_ai::providers::FocusFlowClient;
use focusflow_ai::stream::{StreamCallbacks, StreamEnd};
use nonempty::nonempty;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let client = FocusFlowClient::from_env();

    let health = client.health().await;
    if !health.available {
        eprintln!("AI is not available on this server: {:?}", health);
        return Ok(());
    }

    let model_options = ModelOptions {
        model: health.default_model.clone(),
        ..ModelOptions::default()
    };

    let messages = nonempty![
        Message::system("You are a concise study assistant."),
        Message::user("Give me three tips for preparing for an exam.")
    ];

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    println!("Streaming response...\n");

    let mut received = 0usize;
    let callbacks = StreamCallbacks::new(|text| {
        received += text.len();
        print!("{}", text);
        // Flush stdout to show text immediately
        let _ = std::io::stdout().flush();
    })
    .on_complete(|| println!("\n\n=== Stream Complete ==="))
    .on_error(|e| eprintln!("\nError in stream: {}", e));

    let end = client
        .chat_stream_with_options(messages, &model_options, callbacks, Some(cancel))
        .await?;

    if end == StreamEnd::Cancelled {
        println!("\n\n=== Cancelled ===");
    }
    println!("Received {} bytes of text", received);

    Ok(())
}
