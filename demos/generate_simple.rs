//! Non-streaming generation example.
//!
//! Run with:
//! ```bash
//! export FOCUSFLOW_TOKEN="your-access-token"
//! cargo run --example generate_simple
//! ```

use std::time::Duration;

use focusflow_ai::client::Client;
use focusflow_ai::model::Message;
use focusflow_ai::options::{HttpTransport, ModelOptions, TransportOptions};
use focusflow_ai::providers::FocusFlowClient;
use nonempty::nonempty;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let model_options = ModelOptions::default().with_timeout(Duration::from_secs(60));
    let transport_options =
        TransportOptions::new(HttpTransport::from_env()).with_timeout(Duration::from_secs(90));

    let client = FocusFlowClient::new(model_options, transport_options);

    let messages = nonempty![Message::user("Explain the Pomodoro technique in one paragraph.")];

    match client.chat(messages).await {
        Ok(response) => {
            println!("Model: {}", response.model);
            if let Some(reason) = &response.finish_reason {
                println!("Finish reason: {}", reason);
            }
            println!("\n{}", response.content);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
